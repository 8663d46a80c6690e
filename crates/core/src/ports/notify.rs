use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Language, Lpa};

use super::ClientError;

/// Where and in which language an email goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRecipient {
    pub email: String,
    pub language: Language,
}

impl EmailRecipient {
    pub fn new(email: impl Into<String>, language: Language) -> Self {
        Self {
            email: email.into(),
            language,
        }
    }
}

/// The templated emails scheduled actions send, with their personalisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "template", rename_all = "camelCase")]
pub enum Email {
    DonorIdentityCheckExpired,
    #[serde(rename_all = "camelCase")]
    AdviseCertificateProviderToSignOrOptOut {
        donor_full_name: String,
        lpa_type: String,
        certificate_provider_full_name: String,
        invited_date: String,
        deadline_date: String,
        certificate_provider_start_page_url: String,
    },
    #[serde(rename_all = "camelCase")]
    InformDonorCertificateProviderHasNotActed {
        greeting: String,
        certificate_provider_full_name: String,
        lpa_type: String,
        invited_date: String,
        deadline_date: String,
    },
    #[serde(rename_all = "camelCase")]
    AdviseCertificateProviderToConfirmIdentity {
        donor_full_name: String,
        donor_full_name_possessive: String,
        lpa_type: String,
        certificate_provider_full_name: String,
        deadline_date: String,
        certificate_provider_start_page_url: String,
    },
    #[serde(rename_all = "camelCase")]
    InformDonorCertificateProviderHasNotConfirmedIdentity {
        greeting: String,
        certificate_provider_full_name: String,
        lpa_type: String,
        deadline_date: String,
    },
    #[serde(rename_all = "camelCase")]
    AdviseAttorneyToSignOrOptOut {
        donor_full_name: String,
        donor_full_name_possessive: String,
        lpa_type: String,
        attorney_full_name: String,
        invited_date: String,
        deadline_date: String,
        attorney_start_page_url: String,
    },
    #[serde(rename_all = "camelCase")]
    InformDonorAttorneyHasNotActed {
        greeting: String,
        attorney_full_name: String,
        lpa_type: String,
        invited_date: String,
        deadline_date: String,
        attorney_start_page_url: String,
    },
}

impl Email {
    /// The template name, used for logging and delivery lookups.
    pub fn template(&self) -> &'static str {
        match self {
            Email::DonorIdentityCheckExpired => "donorIdentityCheckExpired",
            Email::AdviseCertificateProviderToSignOrOptOut { .. } => {
                "adviseCertificateProviderToSignOrOptOut"
            }
            Email::InformDonorCertificateProviderHasNotActed { .. } => {
                "informDonorCertificateProviderHasNotActed"
            }
            Email::AdviseCertificateProviderToConfirmIdentity { .. } => {
                "adviseCertificateProviderToConfirmIdentity"
            }
            Email::InformDonorCertificateProviderHasNotConfirmedIdentity { .. } => {
                "informDonorCertificateProviderHasNotConfirmedIdentity"
            }
            Email::AdviseAttorneyToSignOrOptOut { .. } => "adviseAttorneyToSignOrOptOut",
            Email::InformDonorAttorneyHasNotActed { .. } => "informDonorAttorneyHasNotActed",
        }
    }
}

/// Sends notifications to actors.
#[async_trait]
pub trait NotifyClient: Send + Sync {
    async fn send_actor_email(
        &self,
        to: &EmailRecipient,
        lpa_uid: &str,
        email: &Email,
    ) -> Result<(), ClientError>;

    /// The opening line of an email to the donor, which depends on who is
    /// receiving correspondence for them.
    fn email_greeting(&self, lpa: &Lpa) -> String;
}
