//! # Records and Record Errors
//!
//! A [`RecordError`] is attached to one in-flight [`Record`]. It is never
//! fatal and never routed to the [`FailureSink`](crate::failure::FailureSink):
//! downstream stages read it off the record and decide what to do, e.g. write
//! the record to an error output instead of the main one.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Severity / category of a record error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Catch-all used when no better category applies.
    #[default]
    Special,
    Warning,
    DataValidation,
    LookupFailed,
    DataNotFound,
    /// The record cannot be processed further, but the pipeline continues.
    Fatal,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorType::Special => "SPECIAL",
            ErrorType::Warning => "WARNING",
            ErrorType::DataValidation => "DATA_VALIDATION",
            ErrorType::LookupFailed => "LOOKUP_FAILED",
            ErrorType::DataNotFound => "DATA_NOT_FOUND",
            ErrorType::Fatal => "FATAL",
        };
        f.write_str(name)
    }
}

/// An error attached to a single record.
///
/// Immutable once built; the `with_*` methods consume and return the value.
///
/// ```rust
/// use pipeline_failsafe::record::{ErrorType, RecordError};
///
/// let err = RecordError::new("unknown tariff", ErrorType::LookupFailed)
///     .with_module("RateLookup")
///     .with_description("tariff 'GOLD' has no rate for zone 7");
///
/// assert_eq!(err.module_name(), Some("RateLookup"));
/// assert_eq!(err.error_type(), ErrorType::LookupFailed);
/// ```
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct RecordError {
    message: String,
    error_type: ErrorType,
    module_name: Option<String>,
    description: Option<String>,
}

impl RecordError {
    pub fn new(message: impl Into<String>, error_type: ErrorType) -> Self {
        Self {
            message: message.into(),
            error_type,
            module_name: None,
            description: None,
        }
    }

    /// A record error of type [`ErrorType::Special`].
    pub fn special(message: impl Into<String>) -> Self {
        Self::new(message, ErrorType::Special)
    }

    /// Names the stage that raised the error.
    pub fn with_module(mut self, module_name: impl Into<String>) -> Self {
        self.module_name = Some(module_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    pub fn module_name(&self) -> Option<&str> {
        self.module_name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A unit of work flowing through the pipeline.
///
/// The error list is append-only: stages add to it, terminal stages read it.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T> {
    payload: T,
    errors: Vec<RecordError>,
}

impl<T> Record<T> {
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            errors: Vec::new(),
        }
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut T {
        &mut self.payload
    }

    pub fn into_payload(self) -> T {
        self.payload
    }

    pub fn add_error(&mut self, error: RecordError) {
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[RecordError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
