use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging(service: &str, default_level: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }

    // Keep reqwest/hyper internals quiet unless RUST_LOG says otherwise.
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_level},hyper=warn,reqwest=warn")));

    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(service, "logging initialised");
}
