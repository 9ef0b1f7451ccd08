use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::LoggingConfig;

/// Installs the global subscriber. `RUST_LOG` wins over the config file.
pub fn init_tracing(logging: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(logging.directive()))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    // A second call (tests, embedding) keeps the first subscriber.
    let _ = Registry::default().with(env_filter).with(fmt_layer).try_init();
}
