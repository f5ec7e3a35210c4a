//! # Mock Logging & Testing Guide
//!
//! [`MockLogFactory`] stands in for a real backend: you script which logger
//! names it will be asked for and what it answers, then publish it in a
//! registry like any other factory. [`RecordingLogger`] captures every line
//! so tests can assert on what was logged.
//!
//! ## When to use the mock vs a real backend
//!
//! | Feature | MockLogFactory | TracingLogFactory |
//! |---------|----------------|-------------------|
//! | **Answers** | Scripted, per call | Always a logger for non-empty names |
//! | **"No logger" path** | Easy (`return_none`) | Only for empty names |
//! | **Output** | Captured in memory | Goes to the subscriber |
//! | **Use Case** | Resolver and failure-routing tests | Demo and integration runs |
//!
//! ## Example
//!
//! ```rust
//! use pipeline_failsafe::lifecycle::PipelineContext;
//! use pipeline_failsafe::mock::MockLogFactory;
//! use std::sync::Arc;
//!
//! let mock = Arc::new(MockLogFactory::new());
//! mock.expect_logger("Pipeline.Rating").return_logger();
//! mock.expect_logger("Pipeline.Audit").return_none();
//!
//! let ctx = PipelineContext::default();
//! ctx.publish_log_factory(mock.clone());
//!
//! assert!(ctx.logger("Pipeline.Rating").is_some());
//! assert!(ctx.logger("Pipeline.Audit").is_none());
//! assert_eq!(ctx.sink().len(), 1);
//!
//! mock.verify();
//! ```

use crate::failure::InitializationError;
use crate::logging::{LogFactory, LogLevel, Logger, SharedLogger, DEFAULT_LOGGER_NAME};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// =============================================================================
// RECORDING LOGGER
// =============================================================================

/// A logger that keeps every line in memory.
#[derive(Debug)]
pub struct RecordingLogger {
    name: String,
    lines: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingLogger {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the captured lines, oldest first.
    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().unwrap().clone()
    }

    /// Captured messages at exactly `level`.
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Logger for RecordingLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn log(&self, level: LogLevel, message: &str) {
        self.lines.lock().unwrap().push((level, message.to_owned()));
    }
}

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

struct Expectation {
    name: String,
    response: Option<SharedLogger>,
}

/// A log factory with expectation tracking for fluent testing.
///
/// Expectations are consumed in order. A call that does not match the next
/// expectation (or arrives when none is left) panics.
#[derive(Default)]
pub struct MockLogFactory {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl MockLogFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects a `logger(name)` call.
    pub fn expect_logger(&self, name: impl Into<String>) -> LoggerExpectationBuilder {
        LoggerExpectationBuilder {
            name: name.into(),
            expectations: self.expectations.clone(),
        }
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

impl std::fmt::Debug for MockLogFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let remaining = self.expectations.lock().map(|e| e.len()).unwrap_or(0);
        f.debug_struct("MockLogFactory")
            .field("remaining", &remaining)
            .finish()
    }
}

impl LogFactory for MockLogFactory {
    fn logger(&self, name: &str) -> Option<SharedLogger> {
        let expectation = self.expectations.lock().unwrap().pop_front();
        match expectation {
            Some(exp) if exp.name == name => exp.response,
            Some(exp) => panic!("Unexpected logger request '{name}', expected '{}'", exp.name),
            None => panic!("Unexpected logger request '{name}', no expectations left"),
        }
    }

    fn default_logger(&self) -> Result<SharedLogger, InitializationError> {
        Ok(Arc::new(RecordingLogger::new(DEFAULT_LOGGER_NAME)))
    }
}

/// Builder for `logger` expectations.
pub struct LoggerExpectationBuilder {
    name: String,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl LoggerExpectationBuilder {
    /// Answers with a fresh [`RecordingLogger`] named after the request.
    ///
    /// The returned handle sees every line written through that logger.
    pub fn return_logger(self) -> Arc<RecordingLogger> {
        let logger = Arc::new(RecordingLogger::new(self.name.clone()));
        self.push(Some(logger.clone() as SharedLogger));
        logger
    }

    /// Answers with the given logger.
    pub fn return_with(self, logger: SharedLogger) {
        self.push(Some(logger));
    }

    /// Answers "no logger".
    pub fn return_none(self) {
        self.push(None);
    }

    fn push(self, response: Option<SharedLogger>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation {
            name: self.name,
            response,
        });
    }
}
