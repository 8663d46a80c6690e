use async_trait::async_trait;

use super::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricUnit {
    Count,
    Milliseconds,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricDatum {
    pub name: &'static str,
    pub unit: MetricUnit,
    pub value: f64,
}

/// A batch of measurements under one namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub namespace: &'static str,
    pub data: Vec<MetricDatum>,
}

#[async_trait]
pub trait MetricsClient: Send + Sync {
    async fn put_metrics(&self, metrics: &Metrics) -> Result<(), ClientError>;
}
