//! # Pipeline Failsafe
//!
//! > **Cross-thread fatal-error reporting and pluggable logging for multi-threaded pipelines.**
//!
//! Worker threads run independent processing stages. When one of them hits an
//! unrecoverable condition it cannot unwind into the orchestrator's stack, so it
//! deposits the failure in a shared [`FailureSink`](failure::FailureSink). The
//! orchestrator polls that sink once per cycle and decides whether to shut down.
//!
//! Logging backends are chosen at runtime by a configured identifier, built from a
//! [`FactoryCatalog`](logging::FactoryCatalog), and published in a
//! [`ResourceRegistry`](registry::ResourceRegistry). Components get their loggers
//! through a [`LogResolver`](logging::LogResolver) that never fails loudly: if no
//! logger can be found, the failure goes to the sink and the caller gets `None`.
//!
//! ## 🏗️ Design Notes
//!
//! ### 1. A Mailbox, Not an Interrupt
//! Reporting is fire-and-forget and never blocks beyond a short critical section.
//! Detection latency equals the cycle length. Shutdown is cooperative: the
//! orchestrator stops issuing work once it sees `has_fatal() == true`.
//!
//! ### 2. One Taxonomy
//! [`Failure`](failure::Failure) is a sum type over Initialization, Processing and
//! Record failures. Only the first two are fatal and routed to the sink; record
//! errors stay on their [`Record`](record::Record).
//!
//! ### 3. Construction by Name, Without Reflection
//! The catalog maps identifiers to constructor functions registered at startup.
//! Resolution distinguishes four failure causes (unset, not found, construction
//! failed, type mismatch) and wraps each in one uniform `InitializationError`.
//!
//! ### 4. Explicit Context Instead of Globals
//! [`PipelineContext`](lifecycle::PipelineContext) bundles the registry, the sink
//! and a lazily-built resolver. It is created once and passed to every component.
//!
//! ## 🗺️ Module Tour
//!
//! - [`failure`] - Failure taxonomy and the shared sink
//! - [`record`] - Records and their non-fatal errors
//! - [`registry`] - Key → singleton lookup
//! - [`logging`] - Logger / LogFactory traits, catalog, resolver, formatting helpers
//! - [`lifecycle`] - Context object, configuration, tracing setup, demo orchestrator
//! - [`mock`] - Scriptable log factory for tests
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo pipeline with the tracing backend
//! RUST_LOG=info cargo run -- --log-factory tracing
//!
//! # Watch an unknown backend get reported instead of crashing
//! RUST_LOG=info cargo run -- --log-factory log4rs
//! ```

pub mod failure;
pub mod lifecycle;
pub mod logging;
pub mod mock;
pub mod record;
pub mod registry;
