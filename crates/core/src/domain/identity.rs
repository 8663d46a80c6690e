use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of an identity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdentityStatus {
    #[default]
    Unknown,
    Confirmed,
    Failed,
    InsufficientEvidence,
    Expired,
}

/// What is known about an actor's identity check.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IdentityUserData {
    pub status: IdentityStatus,
    #[serde(default)]
    pub checked_at: Option<DateTime<Utc>>,
}

impl IdentityUserData {
    pub fn confirmed(checked_at: DateTime<Utc>) -> Self {
        Self {
            status: IdentityStatus::Confirmed,
            checked_at: Some(checked_at),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == IdentityStatus::Confirmed
    }
}
