use tracing_subscriber::EnvFilter;

/// Installs the JSON log formatter. `RUST_LOG` overrides the default `info`
/// filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_target(false)
        .with_current_span(false)
        .init();
}
