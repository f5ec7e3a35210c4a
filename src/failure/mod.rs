//! Fatal failure reporting across threads.
//!
//! # Main Components
//!
//! - [`Failure`] - Sum type over the three failure kinds
//! - [`InitializationError`] / [`ProcessingError`] - The two fatal kinds
//! - [`FatalFailure`] - What the sink accepts: either fatal kind, nothing else
//! - [`FailureSink`] - Mailbox polled by the orchestrator at each cycle boundary
//!
//! Record errors live in [`crate::record`]; they ride along with their record
//! and are never routed here.

pub mod error;
pub mod sink;

pub use error::*;
pub use sink::*;
