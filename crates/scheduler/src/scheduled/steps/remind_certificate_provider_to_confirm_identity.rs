use std::sync::Arc;

use async_trait::async_trait;

use lpa_core::domain::{ActorType, CertificateProviderProvided};
use lpa_core::ports::{Email, EmailRecipient};
use lpa_core::scheduled::Event;

use super::{StepDeps, CERTIFICATE_PROVIDER_START_PATH};
use crate::scheduled::error::{StepContext, StepError};
use crate::scheduled::runner::ActionHandler;

/// Chases a certificate provider who signed but has not confirmed their
/// identity.
pub struct RemindCertificateProviderToConfirmIdentity {
    deps: Arc<StepDeps>,
}

impl RemindCertificateProviderToConfirmIdentity {
    pub fn new(deps: Arc<StepDeps>) -> Self {
        Self { deps }
    }
}

#[async_trait]
impl ActionHandler for RemindCertificateProviderToConfirmIdentity {
    async fn execute(&self, event: &Event) -> Result<(), StepError> {
        let deps = &self.deps;

        let provided: Option<CertificateProviderProvided> =
            match deps.certificate_provider_store.one(&event.target_lpa_key).await {
                Ok(provided) => Some(provided),
                Err(err) if err.is_not_found() => None,
                Err(err) => return Err(err).context("error retrieving certificate provider"),
            };

        if provided
            .as_ref()
            .is_some_and(|provided| provided.tasks.confirm_your_identity.is_completed())
        {
            return Err(StepError::Ignored);
        }

        let donor = deps
            .donor_store
            .one(&event.target_lpa_key, &event.target_lpa_owner_key)
            .await
            .context("error retrieving donor")?;

        let lpa = deps
            .lpa_resolver
            .resolve(&donor)
            .await
            .context("error resolving lpa")?;

        let Some(expires_at) = lpa.expires_at() else {
            return Err(StepError::Ignored);
        };
        if !deps.reminder_due(lpa.certificate_provider.signed_at, expires_at) {
            return Err(StepError::Ignored);
        }

        let certificate_provider = &lpa.certificate_provider;

        if certificate_provider.channel.is_paper() {
            deps.request_letter(
                &lpa,
                "ADVISE_CERTIFICATE_PROVIDER_TO_CONFIRM_IDENTITY",
                ActorType::CertificateProvider,
                certificate_provider.uid,
                "could not send certificate provider letter request",
            )
            .await?;
        } else {
            let language = provided
                .as_ref()
                .and_then(|provided| provided.contact_language_preference)
                .or(certificate_provider.contact_language_preference);
            let localizer = deps.localizer(language);
            let donor_full_name = lpa.donor.full_name();

            deps.notify_client
                .send_actor_email(
                    &EmailRecipient::new(
                        certificate_provider.email.clone(),
                        language.unwrap_or_default(),
                    ),
                    &lpa.lpa_uid,
                    &Email::AdviseCertificateProviderToConfirmIdentity {
                        donor_full_name_possessive: localizer.possessive(&donor_full_name),
                        donor_full_name,
                        lpa_type: localizer.t(lpa.lpa_type.as_str()),
                        certificate_provider_full_name: certificate_provider.full_name(),
                        deadline_date: localizer.format_date(expires_at),
                        certificate_provider_start_page_url: format!(
                            "{}{}",
                            deps.app_public_url, CERTIFICATE_PROVIDER_START_PATH
                        ),
                    },
                )
                .await
                .context("could not send certificate provider email")?;
        }

        let localizer = deps.localizer(Some(lpa.donor.contact_language_preference));
        deps.inform_donor(
            &lpa,
            "INFORM_DONOR_CERTIFICATE_PROVIDER_HAS_NOT_CONFIRMED_IDENTITY",
            Email::InformDonorCertificateProviderHasNotConfirmedIdentity {
                greeting: deps.notify_client.email_greeting(&lpa),
                certificate_provider_full_name: certificate_provider.full_name(),
                lpa_type: localizer.t(lpa.lpa_type.as_str()),
                deadline_date: localizer.format_date(expires_at),
            },
        )
        .await
    }
}
