//! Outbound clients for the local runtime.
//!
//! Email delivery, event publishing and metrics are external systems; the
//! clients here record each request through `tracing` so a run can be
//! inspected from its logs.

mod event;
mod localize;
mod metrics;
mod notify;

pub use event::TracingEventClient;
pub use localize::StaticBundle;
pub use metrics::TracingMetricsClient;
pub use notify::TracingNotifyClient;
