//! # Failure Taxonomy
//!
//! Every problem the pipeline can hit falls into one of three kinds:
//!
//! | Kind | Type | Fatal | Routed to the sink |
//! |------|------|-------|--------------------|
//! | Initialization | [`InitializationError`] | yes | yes |
//! | Processing | [`ProcessingError`] | yes | yes |
//! | Record | [`RecordError`] | no | no, stays on its record |
//!
//! [`Failure`] is the sum type over all three. It is what the
//! [`FailureSink`](super::FailureSink) stores, and its conversion to the
//! pipeline-fatal kind ([`Failure::into_processing`]) is total.
//!
//! All failure values are `Clone`: a chained cause is held behind an `Arc`
//! so the sink can hand out independent snapshots.

use crate::record::RecordError;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A shared, cloneable underlying cause.
pub type ErrorCause = Arc<dyn StdError + Send + Sync + 'static>;

/// Configuration, resolution or environment problem.
///
/// Always fatal to the component that raised it.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct InitializationError {
    message: String,
    #[source]
    cause: Option<ErrorCause>,
}

impl InitializationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    /// Builds an error chained onto `cause`.
    pub fn with_cause(
        message: impl Into<String>,
        cause: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            cause: Some(Arc::new(cause)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&ErrorCause> {
        self.cause.as_ref()
    }

    /// Downcasts the chained cause to a concrete error type.
    ///
    /// ```rust
    /// use pipeline_failsafe::failure::InitializationError;
    /// use pipeline_failsafe::logging::ResolveError;
    ///
    /// let err = InitializationError::with_cause("resolution failed", ResolveError::Unset);
    /// assert!(matches!(err.cause_as::<ResolveError>(), Some(ResolveError::Unset)));
    /// ```
    pub fn cause_as<E: StdError + 'static>(&self) -> Option<&E> {
        self.cause.as_deref()?.downcast_ref::<E>()
    }
}

/// A pipeline stage could not continue.
///
/// Always fatal to the pipeline.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ProcessingError {
    message: String,
    #[source]
    cause: Option<ErrorCause>,
}

impl ProcessingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(
        message: impl Into<String>,
        cause: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            cause: Some(Arc::new(cause)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&ErrorCause> {
        self.cause.as_ref()
    }

    pub fn cause_as<E: StdError + 'static>(&self) -> Option<&E> {
        self.cause.as_deref()?.downcast_ref::<E>()
    }
}

/// Discriminant of a [`Failure`], handy for structured log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Initialization,
    Processing,
    Record,
}

impl FailureKind {
    /// Initialization and Processing failures stop the pipeline; record errors do not.
    pub fn is_fatal(self) -> bool {
        !matches!(self, FailureKind::Record)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Initialization => "initialization",
            FailureKind::Processing => "processing",
            FailureKind::Record => "record",
        };
        f.write_str(name)
    }
}

/// Any reported problem, of one of the three kinds.
#[derive(Debug, Clone, Error)]
pub enum Failure {
    #[error(transparent)]
    Initialization(#[from] InitializationError),
    #[error(transparent)]
    Processing(#[from] ProcessingError),
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// The failure kinds that may be reported to the
/// [`FailureSink`](super::FailureSink).
///
/// Record errors have no conversion into this type, so they cannot stop the
/// pipeline by accident.
#[derive(Debug, Clone, Error)]
pub enum FatalFailure {
    #[error(transparent)]
    Initialization(#[from] InitializationError),
    #[error(transparent)]
    Processing(#[from] ProcessingError),
}

impl From<FatalFailure> for Failure {
    fn from(fatal: FatalFailure) -> Self {
        match fatal {
            FatalFailure::Initialization(e) => Failure::Initialization(e),
            FatalFailure::Processing(e) => Failure::Processing(e),
        }
    }
}

impl Failure {
    pub fn kind(&self) -> FailureKind {
        match self {
            Failure::Initialization(_) => FailureKind::Initialization,
            Failure::Processing(_) => FailureKind::Processing,
            Failure::Record(_) => FailureKind::Record,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Failure::Initialization(e) => e.message(),
            Failure::Processing(e) => e.message(),
            Failure::Record(e) => e.message(),
        }
    }

    /// Converts this failure into the pipeline-fatal kind.
    ///
    /// A `Processing` failure is returned as-is. Any other kind keeps its
    /// message and is chained as the cause of the new `ProcessingError`, so
    /// the original kind is still reachable through `source()`.
    pub fn into_processing(self) -> ProcessingError {
        match self {
            Failure::Processing(e) => e,
            other => ProcessingError::with_cause(other.message().to_owned(), other),
        }
    }
}
