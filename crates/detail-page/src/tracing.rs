//! # Tracing Setup
//!
//! Structured logging for applications built on the page framework.

/// Initializes the tracing/logging infrastructure for the application.
///
/// Log verbosity is controlled through the `RUST_LOG` environment variable:
/// - `RUST_LOG=info` - page lifecycle events (loads, saves, deletes)
/// - `RUST_LOG=debug` - child registration, dropped completions, full detail
/// - `RUST_LOG=detail_page=debug` - debug only for this crate
///
/// # Example
///
/// ```ignore
/// setup_tracing();
/// tracing::info!("Application started");
/// ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
