use async_trait::async_trait;

use lpa_core::ports::{ClientError, MetricUnit, Metrics, MetricsClient};

/// Emits metrics as log lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMetricsClient;

#[async_trait]
impl MetricsClient for TracingMetricsClient {
    async fn put_metrics(&self, metrics: &Metrics) -> Result<(), ClientError> {
        for datum in &metrics.data {
            let unit = match datum.unit {
                MetricUnit::Count => "Count",
                MetricUnit::Milliseconds => "Milliseconds",
            };

            tracing::info!(
                namespace = metrics.namespace,
                metric = datum.name,
                unit,
                value = datum.value,
                "Metric"
            );
        }
        Ok(())
    }
}
