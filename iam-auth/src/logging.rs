//! Structured logging setup, filling in what `main.rs` calls at startup.

/// Initializes the global `tracing` subscriber: JSON output, level from
/// `RUST_LOG`, defaulting to `info` when unset.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .init();
}
