use std::sync::Arc;

use async_trait::async_trait;

use lpa_core::domain::{ActorType, CertificateProviderProvided};
use lpa_core::ports::{Email, EmailRecipient};
use lpa_core::scheduled::Event;

use super::{StepDeps, CERTIFICATE_PROVIDER_START_PATH};
use crate::scheduled::error::{StepContext, StepError};
use crate::scheduled::runner::ActionHandler;

/// Chases a certificate provider who has not provided their certificate.
pub struct RemindCertificateProviderToComplete {
    deps: Arc<StepDeps>,
}

impl RemindCertificateProviderToComplete {
    pub fn new(deps: Arc<StepDeps>) -> Self {
        Self { deps }
    }
}

#[async_trait]
impl ActionHandler for RemindCertificateProviderToComplete {
    async fn execute(&self, event: &Event) -> Result<(), StepError> {
        let deps = &self.deps;

        let donor = deps
            .donor_store
            .one(&event.target_lpa_key, &event.target_lpa_owner_key)
            .await
            .context("error retrieving donor")?;

        let provided: Option<CertificateProviderProvided> =
            match deps.certificate_provider_store.one(&event.target_lpa_key).await {
                Ok(provided) => Some(provided),
                Err(err) if err.is_not_found() => None,
                Err(err) => return Err(err).context("error retrieving certificate provider"),
            };

        if provided
            .as_ref()
            .is_some_and(|provided| provided.tasks.provide_the_certificate.is_completed())
        {
            return Err(StepError::Ignored);
        }

        let lpa = deps
            .lpa_resolver
            .resolve(&donor)
            .await
            .context("error resolving lpa")?;

        let Some(expires_at) = lpa.expires_at() else {
            return Err(StepError::Ignored);
        };
        if !deps.reminder_due(lpa.certificate_provider_invited_at, expires_at) {
            return Err(StepError::Ignored);
        }
        let invited_at = lpa.certificate_provider_invited_at.unwrap_or(expires_at);

        let certificate_provider = &lpa.certificate_provider;
        let start_page_url = format!("{}{}", deps.app_public_url, CERTIFICATE_PROVIDER_START_PATH);

        if certificate_provider.channel.is_paper() {
            deps.request_letter(
                &lpa,
                "ADVISE_CERTIFICATE_PROVIDER_TO_SIGN_OR_OPT_OUT",
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

            deps.notify_client
                .send_actor_email(
                    &EmailRecipient::new(
                        certificate_provider.email.clone(),
                        language.unwrap_or_default(),
                    ),
                    &lpa.lpa_uid,
                    &Email::AdviseCertificateProviderToSignOrOptOut {
                        donor_full_name: lpa.donor.full_name(),
                        lpa_type: localizer.t(lpa.lpa_type.as_str()),
                        certificate_provider_full_name: certificate_provider.full_name(),
                        invited_date: localizer.format_date(invited_at),
                        deadline_date: localizer.format_date(expires_at),
                        certificate_provider_start_page_url: start_page_url,
                    },
                )
                .await
                .context("could not send certificate provider email")?;
        }

        let localizer = deps.localizer(Some(lpa.donor.contact_language_preference));
        deps.inform_donor(
            &lpa,
            "INFORM_DONOR_CERTIFICATE_PROVIDER_HAS_NOT_ACTED",
            Email::InformDonorCertificateProviderHasNotActed {
                greeting: deps.notify_client.email_greeting(&lpa),
                certificate_provider_full_name: certificate_provider.full_name(),
                lpa_type: localizer.t(lpa.lpa_type.as_str()),
                invited_date: localizer.format_date(invited_at),
                deadline_date: localizer.format_date(expires_at),
            },
        )
        .await
    }
}
