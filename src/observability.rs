//! Prometheus recorder for the cache's `metrics` counters.

use anyhow::Context;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

use crate::config::ObservabilityConfig;

/// Installs the global recorder when metrics are enabled.
pub fn install_recorder(config: &ObservabilityConfig) -> anyhow::Result<Option<PrometheusHandle>> {
    if !config.metrics_enabled {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    info!("Prometheus metrics recorder initialized");
    Ok(Some(handle))
}

/// Prints everything recorded so far in Prometheus text format.
pub fn report(handle: &PrometheusHandle) {
    eprint!("{}", handle.render());
}
