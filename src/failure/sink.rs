//! # Shared Failure Sink
//!
//! Worker threads cannot propagate a fatal error up a call stack that
//! belongs to another thread. They deposit it here instead, and the
//! orchestrator polls [`FailureSink::has_fatal`] once per cycle boundary.
//!
//! The sink is a mailbox, not an interrupt: detection latency is bounded by
//! the cycle period, not by report time. It never raises on its own;
//! [`FailureSink::rethrow_first`] is the only way stored state turns back
//! into an error, and only when the orchestrator asks for it.
//!
//! ## Locking
//!
//! One `Mutex` guards the failure list and the fatal flag together, so the
//! flag is true if and only if the list is non-empty at every observable
//! point. Every critical section is a push, a flag write or a clone of the
//! list; nothing is logged while the lock is held.

use super::error::{Failure, FatalFailure, InitializationError, ProcessingError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct SinkState {
    failures: Vec<Failure>,
    has_fatal: bool,
}

/// Thread-safe aggregator of fatal failures.
///
/// Shared between all threads of one pipeline run via [`SharedFailureSink`].
///
/// ```rust
/// use pipeline_failsafe::failure::{FailureSink, ProcessingError};
/// use std::thread;
///
/// let sink = FailureSink::shared();
///
/// let worker = {
///     let sink = sink.clone();
///     thread::spawn(move || sink.report(ProcessingError::new("rating table missing")))
/// };
/// worker.join().unwrap();
///
/// // Cycle boundary
/// assert!(sink.has_fatal());
/// assert_eq!(sink.drain().len(), 1);
/// assert!(sink.rethrow_first().is_err());
///
/// sink.clear();
/// assert!(!sink.has_fatal());
/// ```
#[derive(Debug, Default)]
pub struct FailureSink {
    state: Mutex<SinkState>,
}

/// Shared ownership handle; lives as long as the pipeline run.
pub type SharedFailureSink = Arc<FailureSink>;

impl FailureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty sink behind an `Arc`, ready to be cloned into workers.
    pub fn shared() -> SharedFailureSink {
        Arc::new(Self::new())
    }

    // Poison is ignored: the list and the flag are only ever written together.
    fn lock(&self) -> MutexGuard<'_, SinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `failure` and raises the fatal flag.
    ///
    /// Callable from any number of threads at once. Never fails.
    ///
    /// Only the fatal kinds are accepted. A record error stays on its record:
    ///
    /// ```compile_fail
    /// use pipeline_failsafe::failure::FailureSink;
    /// use pipeline_failsafe::record::RecordError;
    ///
    /// FailureSink::new().report(RecordError::special("bad field"));
    /// ```
    pub fn report(&self, failure: impl Into<FatalFailure>) {
        let failure = Failure::from(failure.into());
        let kind = failure.kind();
        let message = failure.message().to_owned();

        let pending = {
            let mut state = self.lock();
            state.failures.push(failure);
            state.has_fatal = true;
            state.failures.len()
        };

        warn!(%kind, error = %message, pending, "Fatal failure reported");
    }

    /// Reports an [`InitializationError`] built from `message`.
    pub fn report_initialization(&self, message: impl Into<String>) {
        self.report(InitializationError::new(message));
    }

    /// Reports a [`ProcessingError`] built from `message`.
    pub fn report_processing(&self, message: impl Into<String>) {
        self.report(ProcessingError::new(message));
    }

    /// Returns whether any failure has been reported since the last [`clear`](Self::clear).
    pub fn has_fatal(&self) -> bool {
        self.lock().has_fatal
    }

    /// Independent snapshot of the stored failures, in report order.
    pub fn drain(&self) -> Vec<Failure> {
        let snapshot = self.lock().failures.clone();
        debug!(count = snapshot.len(), "Drained failure snapshot");
        snapshot
    }

    /// Empties the list and resets the flag.
    ///
    /// Meant for the orchestrator between cycles or runs, not for reporters.
    pub fn clear(&self) {
        let cleared = {
            let mut state = self.lock();
            let cleared = state.failures.len();
            state.failures.clear();
            state.has_fatal = false;
            cleared
        };
        if cleared > 0 {
            info!(cleared, "Failure sink cleared");
        }
    }

    /// Re-raises the first reported failure as a [`ProcessingError`].
    ///
    /// The first reported failure is always treated as the pipeline-fatal
    /// kind regardless of its original kind; see [`Failure::into_processing`].
    /// Returns `Ok(())` when nothing has been reported.
    pub fn rethrow_first(&self) -> Result<(), ProcessingError> {
        let first = {
            let state = self.lock();
            if !state.has_fatal {
                return Ok(());
            }
            state.failures.first().cloned()
        };

        match first {
            Some(failure) => Err(failure.into_processing()),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().failures.is_empty()
    }
}
