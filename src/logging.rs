use tracing_subscriber::EnvFilter;

/// Installs a stderr `tracing` subscriber. `RUST_LOG` takes precedence over `default_filter`. Calling
/// this more than once is harmless.
pub fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}
