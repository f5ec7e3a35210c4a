//! Log factory backends shipped with the crate.
//!
//! - [`TracingLogFactory`] (`"tracing"`) forwards every line to the `tracing`
//!   subscriber installed by [`setup_tracing`](crate::lifecycle::setup_tracing),
//!   tagging it with a `logger` field.
//! - [`NullLogFactory`] (`"null"`) hands out loggers that drop everything.

use super::factory::LogFactory;
use super::logger::{LogLevel, Logger, SharedLogger};
use crate::failure::InitializationError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info, warn};

/// Name of the logger returned by `default_logger()`.
pub const DEFAULT_LOGGER_NAME: &str = "default";

/// A logger that emits `tracing` events.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    name: String,
}

impl TracingLogger {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Logger for TracingLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn log(&self, level: LogLevel, message: &str) {
        let logger = self.name.as_str();
        match level {
            LogLevel::Fatal => error!(logger, fatal = true, "{message}"),
            LogLevel::Error => error!(logger, "{message}"),
            LogLevel::Warning => warn!(logger, "{message}"),
            LogLevel::Info => info!(logger, "{message}"),
            LogLevel::Debug => debug!(logger, "{message}"),
        }
    }
}

/// Factory for [`TracingLogger`]s; one cached instance per category.
#[derive(Debug, Default)]
pub struct TracingLogFactory {
    loggers: Mutex<HashMap<String, SharedLogger>>,
}

impl LogFactory for TracingLogFactory {
    fn logger(&self, name: &str) -> Option<SharedLogger> {
        if name.trim().is_empty() {
            return None;
        }
        let mut loggers = self.loggers.lock().unwrap_or_else(PoisonError::into_inner);
        let logger = loggers
            .entry(name.to_owned())
            .or_insert_with(|| Arc::new(TracingLogger::new(name)) as SharedLogger);
        Some(Arc::clone(logger))
    }

    fn default_logger(&self) -> Result<SharedLogger, InitializationError> {
        self.logger(DEFAULT_LOGGER_NAME)
            .ok_or_else(|| InitializationError::new("default logger unavailable"))
    }
}

#[derive(Debug, Clone)]
pub struct NullLogger {
    name: String,
}

impl Logger for NullLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn log(&self, _level: LogLevel, _message: &str) {}

    fn is_enabled(&self, _level: LogLevel) -> bool {
        false
    }
}

/// Factory whose loggers discard every line.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogFactory;

impl LogFactory for NullLogFactory {
    fn logger(&self, name: &str) -> Option<SharedLogger> {
        Some(Arc::new(NullLogger {
            name: name.to_owned(),
        }))
    }

    fn default_logger(&self) -> Result<SharedLogger, InitializationError> {
        Ok(Arc::new(NullLogger {
            name: DEFAULT_LOGGER_NAME.to_owned(),
        }))
    }
}
