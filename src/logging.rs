use tracing_subscriber::EnvFilter;

/// Diagnostics go to stderr so stdout stays the command's output.
/// Verbosity comes from `TALLY_LOG` (e.g. `TALLY_LOG=debug`), default `warn`.
pub fn init() {
    let filter = EnvFilter::try_from_env("TALLY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
