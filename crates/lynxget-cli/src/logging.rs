//! Logging initialization, switched from the teacher CLI's `env_logger` to
//! `tracing_subscriber::EnvFilter` for consistency with the rest of the
//! workspace.

use lynxget_config::RuntimeConfig;

pub fn init(config: &RuntimeConfig) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.as_tracing_filter().to_string());

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if config.pretty_logs {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}
