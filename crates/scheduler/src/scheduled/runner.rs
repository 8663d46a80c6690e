//! Drains the schedule, dispatching each due event to its action.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::time::Instant;

use lpa_core::ports::{Clock, MetricDatum, MetricUnit, Metrics, MetricsClient};
use lpa_core::scheduled::{Action, Event};
use lpa_core::storage::Result as StoreResult;

use super::error::{RunnerError, StepError};
use super::store::ScheduleStore;
use super::waiter::Waiter;

const METRICS_NAMESPACE: &str = "schedule-runner";

/// Source of due events.
#[async_trait]
pub trait EventQueue: Send + Sync {
    /// Claims the next event due by `as_of`, or fails with `NotFound`.
    async fn pop(&self, as_of: DateTime<Utc>) -> StoreResult<Event>;
}

#[async_trait]
impl EventQueue for ScheduleStore {
    async fn pop(&self, as_of: DateTime<Utc>) -> StoreResult<Event> {
        ScheduleStore::pop(self, as_of).await
    }
}

/// Performs the business operation a scheduled event asks for.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn execute(&self, event: &Event) -> Result<(), StepError>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Counts {
    processed: u64,
    ignored: u64,
    errored: u64,
}

impl Counts {
    fn any(&self) -> bool {
        self.processed + self.ignored + self.errored > 0
    }
}

/// Drains the queue of due events.
///
/// One `run` pops until nothing is due, running each event's action in
/// turn. Handler failures are logged and counted without stopping the
/// drain; storage failures back off through the [`Waiter`] and end the
/// drain once it gives up.
pub struct Runner {
    queue: Arc<dyn EventQueue>,
    waiter: Box<dyn Waiter>,
    clock: Arc<dyn Clock>,
    actions: HashMap<Action, Arc<dyn ActionHandler>>,
    metrics_client: Arc<dyn MetricsClient>,
    metrics_enabled: bool,
}

impl Runner {
    pub fn new(
        queue: Arc<dyn EventQueue>,
        waiter: Box<dyn Waiter>,
        clock: Arc<dyn Clock>,
        actions: HashMap<Action, Arc<dyn ActionHandler>>,
        metrics_client: Arc<dyn MetricsClient>,
        metrics_enabled: bool,
    ) -> Self {
        Self {
            queue,
            waiter,
            clock,
            actions,
            metrics_client,
            metrics_enabled,
        }
    }

    /// Processes every due event, returning once the queue is drained.
    pub async fn run(&mut self) -> Result<(), RunnerError> {
        let started = Instant::now();
        let mut counts = Counts::default();

        self.waiter.reset();

        loop {
            let event = match self.queue.pop(self.clock.now()).await {
                Ok(event) => event,
                Err(err) if err.is_not_found() => {
                    tracing::info!("no scheduled tasks to process");

                    if self.metrics_enabled && counts.any() {
                        self.put_metrics(counts, started.elapsed()).await?;
                    }

                    return Ok(());
                }
                Err(err) => {
                    tracing::error!(error = %err, "error getting scheduled task");
                    self.waiter.wait().await?;
                    continue;
                }
            };

            self.waiter.reset();
            self.dispatch(&event, &mut counts).await;
        }
    }

    async fn dispatch(&self, event: &Event, counts: &mut Counts) {
        let Some(handler) = self.actions.get(&event.action) else {
            tracing::debug!(action = %event.action, "no handler for action");
            counts.processed += 1;
            return;
        };

        tracing::info!(action = %event.action, "runner action");

        let target_pk = &event.target_lpa_key;
        let target_sk = &event.target_lpa_owner_key;

        match handler.execute(event).await {
            Ok(()) => {
                tracing::info!(
                    action = %event.action,
                    %target_pk,
                    %target_sk,
                    "runner action success"
                );
                counts.processed += 1;
            }
            Err(StepError::Ignored) => {
                tracing::info!(
                    action = %event.action,
                    %target_pk,
                    %target_sk,
                    "runner action ignored"
                );
                counts.ignored += 1;
            }
            Err(err) => {
                tracing::error!(
                    action = %event.action,
                    %target_pk,
                    %target_sk,
                    error = %err,
                    "runner action error"
                );
                counts.errored += 1;
            }
        }
    }

    async fn put_metrics(&self, counts: Counts, elapsed: Duration) -> Result<(), RunnerError> {
        let metrics = Metrics {
            namespace: METRICS_NAMESPACE,
            data: vec![
                MetricDatum {
                    name: "TasksProcessed",
                    unit: MetricUnit::Count,
                    value: counts.processed as f64,
                },
                MetricDatum {
                    name: "TasksIgnored",
                    unit: MetricUnit::Count,
                    value: counts.ignored as f64,
                },
                MetricDatum {
                    name: "Errors",
                    unit: MetricUnit::Count,
                    value: counts.errored as f64,
                },
                MetricDatum {
                    name: "ProcessingTime",
                    unit: MetricUnit::Milliseconds,
                    value: elapsed.as_millis() as f64,
                },
            ],
        };

        if let Err(err) = self.metrics_client.put_metrics(&metrics).await {
            tracing::error!(error = %err, "error putting metrics");
            return Err(err.into());
        }

        Ok(())
    }
}
