/// Initializes structured logging for the whole application.
///
/// Verbosity is controlled through `RUST_LOG`:
/// - `RUST_LOG=info` — lifecycle and workflow milestones
/// - `RUST_LOG=debug` — every dispatched event and store request
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
