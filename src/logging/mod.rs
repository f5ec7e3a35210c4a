//! Pluggable logging backends, resolved at runtime by name.
//!
//! # Main Components
//!
//! - [`Logger`] - A named logger instance
//! - [`LogFactory`] - Backend capability producing named loggers
//! - [`FactoryCatalog`] - Identifier → constructor table; [`FactoryCatalog::resolve`]
//! - [`LogResolver`] - Facade that looks the published factory up and never fails loudly
//! - [`pipe_command`], [`framework_command`], [`cache_command`] - Log-line templates
//!
//! # Flow
//!
//! 1. At startup a factory is resolved from the configured identifier and
//!    published in the [`ResourceRegistry`](crate::registry::ResourceRegistry)
//!    under [`LOG_FACTORY_KEY`].
//! 2. Components ask the [`LogResolver`] for a logger by category name.
//! 3. Resolution problems go to the [`FailureSink`](crate::failure::FailureSink),
//!    never up the caller's stack.
//!
//! # Testing
//!
//! See the [`mock`](crate::mock) module for a scriptable factory.

pub mod backends;
pub mod catalog;
pub mod factory;
pub mod format;
pub mod logger;
pub mod resolver;

pub use backends::*;
pub use catalog::*;
pub use factory::*;
pub use format::*;
pub use logger::*;
pub use resolver::*;
