use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber. `RUST_LOG` wins; otherwise `info`, or `debug`
/// when `verbose` is set. Calling it twice is harmless.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
