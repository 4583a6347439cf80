use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::{LogFormat, LoggingConfig};

/// Noisy dependencies kept at `warn` unless RUST_LOG says otherwise
const QUIET_TARGETS: &[&str] = &["sqlx=warn", "hyper=warn", "tower_http=info"];

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives = std::iter::once(level)
            .chain(QUIET_TARGETS.iter().copied())
            .collect::<Vec<_>>()
            .join(",");
        EnvFilter::new(directives)
    })
}

/// Installs the global subscriber; a second call is a no-op
pub fn init_logging(config: &LoggingConfig) {
    let filter = build_filter(&config.level);

    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init(),
    };

    if installed.is_ok() {
        tracing::info!(level = %config.level, format = ?config.format, "Logging initialized");
    }
}
