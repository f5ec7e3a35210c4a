//! # Observability & Tracing
//!
//! Two kinds of log output share one subscriber:
//!
//! - the crate's own diagnostics (`Fatal failure reported`, `Log factory resolved`, ...),
//!   emitted with `tracing` macros and structured fields;
//! - lines written through pipeline [`Logger`](crate::logging::Logger)s obtained from the
//!   `"tracing"` backend, which carry a `logger` field naming their category.
//!
//! ## Usage
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info cargo run
//!
//! # Include registry and sink internals
//! RUST_LOG=debug cargo run
//!
//! # Only this crate
//! RUST_LOG=pipeline_failsafe=debug cargo run
//! ```
//!
//! ## Example Output
//!
//! **With `RUST_LOG=info`**:
//!
//! ```text
//! INFO resolve: Log factory resolved identifier="tracing" factory=TracingLogFactory { .. }
//! INFO Log factory installed identifier="tracing"
//! INFO Command <Start> handled by <Framework> with parameter <rating> logger="Pipeline"
//! WARN Fatal failure reported kind=processing error="rate plan missing for record 7" pending=1
//! ERROR Pipeline failure kind=processing error="rate plan missing for record 7"
//! ```

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Panics if one is already installed.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

/// Like [`setup_tracing`], but returns `false` instead of panicking when a
/// subscriber is already installed. Safe to call from every test.
pub fn try_setup_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .with_test_writer()
        .try_init()
        .is_ok()
}
