use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use super::{Attorneys, CertificateProvider, Correspondent, Donor};

/// How long a signed lpa has to be completed before it is submitted.
const UNSUBMITTED_EXPIRY: Months = Months::new(6);
/// How long a submitted lpa has to be registered.
const SUBMITTED_EXPIRY: Months = Months::new(24);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LpaType {
    #[default]
    PropertyAndAffairs,
    PersonalWelfare,
}

impl LpaType {
    /// The translation key for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            LpaType::PropertyAndAffairs => "property-and-affairs",
            LpaType::PersonalWelfare => "personal-welfare",
        }
    }
}

/// A consistent view of an lpa across the donor's and other actors' data.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Lpa {
    #[serde(rename = "LpaID")]
    pub lpa_id: String,
    #[serde(rename = "LpaUID")]
    pub lpa_uid: String,
    #[serde(rename = "Type")]
    pub lpa_type: LpaType,
    pub donor: Donor,
    pub correspondent: Option<Correspondent>,
    pub certificate_provider: CertificateProvider,
    pub attorneys: Attorneys,
    pub replacement_attorneys: Attorneys,
    pub signed_at: Option<DateTime<Utc>>,
    pub submitted: bool,
    pub certificate_provider_invited_at: Option<DateTime<Utc>>,
    pub attorneys_invited_at: Option<DateTime<Utc>>,
}

impl Lpa {
    /// When the lpa can no longer be completed. `None` until it is signed.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let months = if self.submitted {
            SUBMITTED_EXPIRY
        } else {
            UNSUBMITTED_EXPIRY
        };

        self.signed_at?.checked_add_months(months)
    }

    /// The correspondent, if they should receive letters in place of the donor.
    pub fn postal_correspondent(&self) -> Option<&Correspondent> {
        self.correspondent
            .as_ref()
            .filter(|correspondent| !correspondent.address.line1.is_empty())
    }
}
