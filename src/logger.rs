use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// Logs go to stderr, stdout carries the Json output
pub fn init_logging() {
    let level = if cfg!(debug_assertions) { "trace" } else { "info" };

    let (filter, defaulted) = match EnvFilter::try_from_default_env() {
        Ok(f) => (f, false),
        Err(_) => (EnvFilter::new(level), true),
    };

    let fmt_layer = fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .init();

    if defaulted {
        info!("\"RUST_LOG\" variable not set, defaulting to {level}");
    }
}
