use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::keys::{LpaKey, LpaOwnerKey, ScheduledDayKey, ScheduledKey};

use super::Action;

/// A scheduled unit of work.
///
/// The keys are derived from the due time: the partition is the day bucket
/// of `at`, the sort key combines `at`, the action and a unique id. The target
/// keys point at the aggregate the action reads; nothing else in the event is
/// trusted when the action runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "PK")]
    pub pk: ScheduledDayKey,
    #[serde(rename = "SK")]
    pub sk: ScheduledKey,
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "At")]
    pub at: DateTime<Utc>,
    #[serde(rename = "Action")]
    pub action: Action,
    #[serde(rename = "TargetLpaKey")]
    pub target_lpa_key: LpaKey,
    #[serde(rename = "TargetLpaOwnerKey")]
    pub target_lpa_owner_key: LpaOwnerKey,
    #[serde(rename = "LpaUID", default, skip_serializing_if = "String::is_empty")]
    pub lpa_uid: String,
}

impl Event {
    /// Builds an event due at `at`, deriving both keys.
    ///
    /// `created_at` is left at `at`; the schedule store stamps the real
    /// creation time when the event is persisted.
    pub fn new(
        at: DateTime<Utc>,
        action: Action,
        target_lpa_key: LpaKey,
        target_lpa_owner_key: LpaOwnerKey,
        lpa_uid: impl Into<String>,
        id: Uuid,
    ) -> Self {
        Self {
            pk: ScheduledDayKey::for_time(at),
            sk: ScheduledKey::new(at, action, id),
            created_at: at,
            at,
            action,
            target_lpa_key,
            target_lpa_owner_key,
            lpa_uid: lpa_uid.into(),
        }
    }
}
