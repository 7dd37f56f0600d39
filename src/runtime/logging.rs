use tracing_subscriber::EnvFilter;

use crate::config::LogSettings;

/// `RUST_LOG` wins over the configured filter; an unparsable filter falls back to `info`.
pub fn filter_for(settings: &LogSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init_tracing(settings: &LogSettings) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(settings))
        .with_writer(std::io::stderr)
        .try_init();
}
