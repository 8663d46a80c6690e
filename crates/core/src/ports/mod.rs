//! Collaborators consumed by the scheduler.
//!
//! The scheduler only depends on these traits; the services behind them
//! (notification delivery, event publishing, translations, metrics) live
//! elsewhere.

mod clock;
mod error;
mod event;
mod localize;
mod metrics;
mod notify;
mod stores;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::ClientError;
pub use event::{EventClient, LetterRequested, NotificationSent};
pub use localize::{Bundle, Localizer};
pub use metrics::{MetricDatum, MetricUnit, Metrics, MetricsClient};
pub use notify::{Email, EmailRecipient, NotifyClient};
pub use stores::{AttorneyStore, CertificateProviderStore, DonorStore, LpaResolver};
