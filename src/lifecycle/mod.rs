//! # Process Lifecycle & Wiring
//!
//! This module replaces implicit global lookups with one explicit context
//! object that is built at startup and passed to every component.
//!
//! ## Startup Sequence
//!
//! ```rust,ignore
//! setup_tracing();
//! let config = PipelineConfig::from_env()?;
//!
//! // 1. Shared state: registry + failure sink
//! let ctx = Arc::new(PipelineContext::default());
//!
//! // 2. Resolve the configured log backend and publish it
//! let catalog = FactoryCatalog::with_builtin_backends();
//! ctx.install_log_factory(&catalog, config.log_factory_identifier())?;
//!
//! // 3. Hand the context to the stages and run
//! let system = PipelineSystem::new(&config.pipeline_name, ctx, stages);
//! system.run(batches).await?;
//! ```
//!
//! ## Cycle Boundaries
//!
//! Workers never raise fatal errors across threads. They report them to the
//! [`FailureSink`](crate::failure::FailureSink) and the orchestrator checks
//! `has_fatal()` once per cycle. Shutdown is cooperative: after observing a
//! failure, [`PipelineSystem::run`] stops issuing batches.
//!
//! ## Observability
//!
//! See the [`tracing`] module for subscriber setup and `RUST_LOG` usage.

pub mod config;
pub mod context;
pub mod pipeline;
pub mod tracing;

pub use config::*;
pub use context::*;
pub use pipeline::*;
pub use self::tracing::*;
