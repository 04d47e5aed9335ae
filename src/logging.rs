//! Tracing subscriber set-up for the server binary.

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Install a compact fmt subscriber filtered by `RUST_LOG`, falling back to
/// the configured `log_level`. Calling it again is a no-op.
pub fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .is_err()
    {
        tracing::debug!("Global tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let config = AppConfig::default();
        init_logging(&config);
        init_logging(&config);
    }
}
