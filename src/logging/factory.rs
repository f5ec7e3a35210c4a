//! # LogFactory Trait
//!
//! A `LogFactory` is the pluggable half of logging: one live instance per
//! process (per [`PipelineContext`](crate::lifecycle::PipelineContext)),
//! published in the [`ResourceRegistry`](crate::registry::ResourceRegistry)
//! under [`LOG_FACTORY_KEY`], producing named [`Logger`]s on request.
//!
//! Which implementation is live is decided at runtime by a configured
//! identifier, see [`FactoryCatalog`](super::FactoryCatalog).

use super::logger::SharedLogger;
use crate::failure::InitializationError;
use std::any::type_name;
use std::fmt;
use std::sync::Arc;

/// Registry slot under which the active factory is published.
pub const LOG_FACTORY_KEY: &str = "LogFactory";

/// Produces named logger instances.
///
/// Once published, a factory is treated as a read-only capability object:
/// every method takes `&self` and the factory may be called from any thread.
pub trait LogFactory: Send + Sync + fmt::Debug {
    /// Returns the logger for category `name`.
    ///
    /// `None` signals "no usable logger"; callers route that condition to the
    /// failure sink rather than treating it as an error here.
    fn logger(&self, name: &str) -> Option<SharedLogger>;

    /// The backend's default logger, for callers that predate named categories.
    fn default_logger(&self) -> Result<SharedLogger, InitializationError>;
}

impl dyn LogFactory {
    /// Returns the logger for a type, normalized to its fully qualified name.
    pub fn logger_for<T: ?Sized>(&self) -> Option<SharedLogger> {
        self.logger(type_name::<T>())
    }
}

/// How the active factory is stored in the registry.
pub type SharedLogFactory = Arc<dyn LogFactory>;
