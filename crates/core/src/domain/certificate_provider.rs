use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::keys::{CertificateProviderKey, LpaKey};

use super::{Language, TaskState};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CertificateProviderTasks {
    #[serde(default)]
    pub confirm_your_identity: TaskState,
    #[serde(default)]
    pub provide_the_certificate: TaskState,
}

/// What the certificate provider has provided about themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CertificateProviderProvided {
    #[serde(rename = "PK")]
    pub pk: LpaKey,
    #[serde(rename = "SK")]
    pub sk: CertificateProviderKey,
    #[serde(rename = "LpaID")]
    pub lpa_id: String,
    #[serde(rename = "LpaUID", default, skip_serializing_if = "String::is_empty")]
    pub lpa_uid: String,
    #[serde(rename = "UID")]
    pub uid: Uuid,
    #[serde(default)]
    pub contact_language_preference: Option<Language>,
    #[serde(default)]
    pub tasks: CertificateProviderTasks,
    #[serde(default)]
    pub signed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn provided(lpa_uid: &str) -> CertificateProviderProvided {
        CertificateProviderProvided {
            pk: LpaKey::new("lpa-1"),
            sk: CertificateProviderKey::new("cp"),
            lpa_id: "lpa-1".to_string(),
            lpa_uid: lpa_uid.to_string(),
            uid: Uuid::from_u128(2),
            contact_language_preference: None,
            tasks: CertificateProviderTasks::default(),
            signed_at: None,
            updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_lpa_uid_written_when_known() {
        let value = serde_json::to_value(provided("M-1")).unwrap();
        assert_eq!(value["LpaUID"], json!("M-1"));
    }

    #[test]
    fn test_lpa_uid_omitted_when_empty() {
        let value = serde_json::to_value(provided("")).unwrap();
        assert!(value.get("LpaUID").is_none());
        assert_eq!(
            serde_json::from_value::<CertificateProviderProvided>(value).unwrap(),
            provided("")
        );
    }
}
