use crate::config::MetricsConfig;
use metrics_exporter_statsd::{StatsdBuilder, StatsdError};
use shared::metrics_defs::describe_all;

#[derive(thiserror::Error, Debug)]
pub enum StatsdSetupError {
    #[error("could not build statsd recorder: {0}")]
    Statsd(#[from] StatsdError),
    #[error("a metrics recorder is already installed")]
    AlreadyInstalled,
}

/// Installs a statsd recorder for the `metrics` facade. Without a config,
/// metrics are discarded.
pub fn init(config: Option<&MetricsConfig>) -> Result<(), StatsdSetupError> {
    let Some(config) = config else {
        tracing::info!("no metrics backend configured");
        return Ok(());
    };

    let recorder = StatsdBuilder::from(config.statsd_host.as_str(), config.statsd_port)
        .build(Some(config.prefix.as_str()))?;
    metrics::set_global_recorder(recorder).map_err(|_| StatsdSetupError::AlreadyInstalled)?;
    describe_all(catalog::metrics_defs::ALL_METRICS);

    tracing::info!(
        host = %config.statsd_host,
        port = config.statsd_port,
        "sending metrics to statsd"
    );
    Ok(())
}
