use crate::config::LoggingConfig;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(thiserror::Error, Debug)]
#[error("failed to initialize tracing: {0}")]
pub struct LoggingError(#[from] tracing_subscriber::util::TryInitError);

/// Installs the global tracing subscriber and, when a DSN is configured,
/// the Sentry client. The returned guard flushes Sentry on drop and must be
/// held for the lifetime of the process.
pub fn init(config: &LoggingConfig) -> Result<Option<sentry::ClientInitGuard>, LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let guard = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(guard.as_ref().map(|_| sentry_tracing::layer()))
        .try_init()?;

    Ok(guard)
}
