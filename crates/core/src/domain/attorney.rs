use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::keys::{AttorneyKey, LpaKey};

use super::Language;

/// What an attorney or trust corporation has provided about themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttorneyProvided {
    #[serde(rename = "PK")]
    pub pk: LpaKey,
    #[serde(rename = "SK")]
    pub sk: AttorneyKey,
    #[serde(rename = "LpaID")]
    pub lpa_id: String,
    #[serde(rename = "LpaUID", default, skip_serializing_if = "String::is_empty")]
    pub lpa_uid: String,
    #[serde(rename = "UID")]
    pub uid: Uuid,
    #[serde(default)]
    pub is_replacement: bool,
    #[serde(default)]
    pub is_trust_corporation: bool,
    #[serde(default)]
    pub contact_language_preference: Option<Language>,
    #[serde(default)]
    pub signed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl AttorneyProvided {
    pub fn signed(&self) -> bool {
        self.signed_at.is_some()
    }
}
