//! # Log Resolver
//!
//! The single access point components use to obtain a logger.
//!
//! [`LogResolver::logger`] looks the active [`LogFactory`] up in the
//! [`ResourceRegistry`] and asks it for a named logger. It never returns an
//! error: logging code calls it too, and must stay usable while reporting its
//! own failure. Every failure path is reported to the [`FailureSink`] as an
//! [`InitializationError`] and the caller receives `None`.
//!
//! | Situation | Reported message | Result |
//! |-----------|------------------|--------|
//! | no factory published | `No log factory found` | `None` |
//! | something else published under the key | `LogFactory resource is not a SharedLogFactory` | `None` |
//! | factory has no logger for the name | `unable to load logger. Resource not found` | `None` |
//! | otherwise | nothing | `Some(logger)` |
//!
//! [`FailureSink`]: crate::failure::FailureSink

use super::backends::{TracingLogger, DEFAULT_LOGGER_NAME};
use super::factory::{LogFactory, SharedLogFactory, LOG_FACTORY_KEY};
use super::logger::SharedLogger;
use crate::failure::{InitializationError, SharedFailureSink};
use crate::registry::ResourceRegistry;
use std::any::type_name;
use std::sync::Arc;
use tracing::{trace, warn};

pub const NO_FACTORY_MESSAGE: &str = "No log factory found";
pub const NO_LOGGER_MESSAGE: &str = "unable to load logger. Resource not found";
pub const WRONG_FACTORY_TYPE_MESSAGE: &str = "LogFactory resource is not a SharedLogFactory";

/// Resolves named loggers through the registry, routing failures to the sink.
///
/// ```rust
/// use pipeline_failsafe::failure::FailureSink;
/// use pipeline_failsafe::logging::LogResolver;
/// use pipeline_failsafe::registry::ResourceRegistry;
/// use std::sync::Arc;
///
/// let sink = FailureSink::shared();
/// let resolver = LogResolver::new(Arc::new(ResourceRegistry::new()), sink.clone());
///
/// // Nothing published yet
/// assert!(resolver.logger("Pipeline.Rating").is_none());
/// assert_eq!(sink.drain()[0].message(), "No log factory found");
/// ```
#[derive(Debug, Clone)]
pub struct LogResolver {
    registry: Arc<ResourceRegistry>,
    sink: SharedFailureSink,
}

impl LogResolver {
    pub fn new(registry: Arc<ResourceRegistry>, sink: SharedFailureSink) -> Self {
        Self { registry, sink }
    }

    /// Returns the logger for category `name`, or `None` after reporting why not.
    pub fn logger(&self, name: &str) -> Option<SharedLogger> {
        let Some(factory) = self.registry.get::<SharedLogFactory>(LOG_FACTORY_KEY) else {
            // A concrete `Arc<F>` under the key fails the downcast but is not "missing"
            let message = if self.registry.contains(LOG_FACTORY_KEY) {
                WRONG_FACTORY_TYPE_MESSAGE
            } else {
                NO_FACTORY_MESSAGE
            };
            warn!(logger = name, reason = message, "No usable log factory published");
            self.sink.report(InitializationError::new(message));
            return None;
        };

        match factory.logger(name) {
            Some(logger) => {
                trace!(logger = name, "Logger resolved");
                Some(logger)
            }
            None => {
                warn!(logger = name, ?factory, "Log factory has no such logger");
                self.sink.report(InitializationError::new(NO_LOGGER_MESSAGE));
                None
            }
        }
    }

    /// Returns the logger for a type, normalized to its fully qualified name.
    pub fn logger_for<T: ?Sized>(&self) -> Option<SharedLogger> {
        self.logger(type_name::<T>())
    }

    /// A logger that is always available, independent of the registry.
    ///
    /// Lets failures inside the logging setup itself still be logged.
    pub fn default_logger(&self) -> SharedLogger {
        Arc::new(TracingLogger::new(DEFAULT_LOGGER_NAME))
    }

    /// The currently published factory, if any. Does not report.
    pub fn factory(&self) -> Option<Arc<dyn LogFactory>> {
        self.registry.get::<SharedLogFactory>(LOG_FACTORY_KEY)
    }
}
