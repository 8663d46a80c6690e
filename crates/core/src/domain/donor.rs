use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::keys::{LpaKey, LpaOwnerKey};

use super::{
    Attorneys, CertificateProvider, Correspondent, Donor, IdentityUserData, LpaType, TaskState,
};

/// Progress on the donor's task list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DonorTasks {
    #[serde(default)]
    pub confirm_your_identity: TaskState,
    #[serde(default)]
    pub sign_the_lpa: TaskState,
}

/// Everything the donor (or their organisation) has provided about an lpa.
///
/// Stored under `LPA#<id>` / the owner key, versioned for optimistic locking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DonorProvided {
    #[serde(rename = "PK")]
    pub pk: LpaKey,
    #[serde(rename = "SK")]
    pub sk: LpaOwnerKey,
    #[serde(rename = "LpaID")]
    pub lpa_id: String,
    #[serde(rename = "LpaUID", default, skip_serializing_if = "String::is_empty")]
    pub lpa_uid: String,
    #[serde(rename = "Type", default)]
    pub lpa_type: LpaType,
    pub donor: Donor,
    #[serde(default)]
    pub correspondent: Option<Correspondent>,
    #[serde(default)]
    pub certificate_provider: CertificateProvider,
    #[serde(default)]
    pub attorneys: Attorneys,
    #[serde(default)]
    pub replacement_attorneys: Attorneys,
    #[serde(default)]
    pub identity_user_data: IdentityUserData,
    #[serde(default)]
    pub tasks: DonorTasks,
    #[serde(default)]
    pub signed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub certificate_provider_invited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attorneys_invited_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub version: u64,
}

impl DonorProvided {
    /// A fresh, unsigned lpa.
    pub fn new(
        lpa_key: LpaKey,
        owner_key: LpaOwnerKey,
        lpa_uid: impl Into<String>,
        donor: Donor,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            lpa_id: lpa_key.id().to_string(),
            pk: lpa_key,
            sk: owner_key,
            lpa_uid: lpa_uid.into(),
            lpa_type: LpaType::default(),
            donor,
            correspondent: None,
            certificate_provider: CertificateProvider::default(),
            attorneys: Attorneys::default(),
            replacement_attorneys: Attorneys::default(),
            identity_user_data: IdentityUserData::default(),
            tasks: DonorTasks::default(),
            signed_at: None,
            submitted_at: None,
            certificate_provider_invited_at: None,
            attorneys_invited_at: None,
            updated_at: now,
            version: 0,
        }
    }

    pub fn signed(&self) -> bool {
        self.signed_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::DonorKey;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_donor_provided_document_shape() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let provided = DonorProvided::new(
            LpaKey::new("lpa-1"),
            LpaOwnerKey::donor(DonorKey::new("s")),
            "M-1",
            Donor::default(),
            now,
        );

        let value = serde_json::to_value(&provided).unwrap();
        assert_eq!(value["PK"], json!("LPA#lpa-1"));
        assert_eq!(value["SK"], json!("DONOR#s"));
        assert_eq!(value["LpaID"], json!("lpa-1"));
        assert_eq!(value["LpaUID"], json!("M-1"));
        assert_eq!(value["Version"], json!(0));
        assert!(!provided.signed());

        assert_eq!(
            serde_json::from_value::<DonorProvided>(value).unwrap(),
            provided
        );
    }

    #[test]
    fn test_donor_provided_omits_missing_lpa_uid() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let provided = DonorProvided::new(
            LpaKey::new("lpa-1"),
            LpaOwnerKey::donor(DonorKey::new("s")),
            "",
            Donor::default(),
            now,
        );

        let value = serde_json::to_value(&provided).unwrap();
        assert!(value.get("LpaUID").is_none());
        assert_eq!(
            serde_json::from_value::<DonorProvided>(value).unwrap().lpa_uid,
            ""
        );
    }
}
