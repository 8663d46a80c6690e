use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use lpa_core::domain::{ActorType, AttorneyProvided, Attorneys, Channel, Language, Lpa};
use lpa_core::ports::{Email, EmailRecipient};
use lpa_core::scheduled::Event;

use super::{StepDeps, ATTORNEY_START_PATH};
use crate::scheduled::error::{StepContext, StepError};
use crate::scheduled::runner::ActionHandler;

/// Chases every attorney, replacement attorney and trust corporation that
/// has not signed, telling the donor about each one.
pub struct RemindAttorneyToComplete {
    deps: Arc<StepDeps>,
}

/// One attorney or trust corporation to remind.
struct Counterparty {
    actor_type: ActorType,
    uid: Uuid,
    full_name: String,
    email: String,
    channel: Channel,
    email_context: &'static str,
    letter_context: &'static str,
}

impl Counterparty {
    fn of(
        actor_type: ActorType,
        trust_corporation_type: ActorType,
        attorneys: &Attorneys,
    ) -> Vec<Self> {
        let mut counterparties: Vec<Self> = attorneys
            .attorneys
            .iter()
            .map(|attorney| Self {
                actor_type,
                uid: attorney.uid,
                full_name: attorney.full_name(),
                email: attorney.email.clone(),
                channel: attorney.channel,
                email_context: "could not send attorney email",
                letter_context: "could not send attorney letter request",
            })
            .collect();

        if let Some(trust_corporation) = attorneys
            .trust_corporation
            .as_ref()
            .filter(|trust_corporation| !trust_corporation.uid.is_nil())
        {
            counterparties.push(Self {
                actor_type: trust_corporation_type,
                uid: trust_corporation.uid,
                full_name: trust_corporation.name.clone(),
                email: trust_corporation.email.clone(),
                channel: trust_corporation.channel,
                email_context: "could not send trust corporation email",
                letter_context: "could not send trust corporation letter request",
            });
        }

        counterparties
    }
}

impl RemindAttorneyToComplete {
    pub fn new(deps: Arc<StepDeps>) -> Self {
        Self { deps }
    }

    async fn remind(
        &self,
        lpa: &Lpa,
        counterparty: &Counterparty,
        provided: Option<&AttorneyProvided>,
        invited_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StepError> {
        let deps = &self.deps;
        let start_page_url = format!("{}{}", deps.app_public_url, ATTORNEY_START_PATH);

        if counterparty.channel.is_paper() {
            deps.request_letter(
                lpa,
                "ADVISE_ATTORNEY_TO_SIGN_OR_OPT_OUT",
                counterparty.actor_type,
                counterparty.uid,
                counterparty.letter_context,
            )
            .await?;
        } else {
            let language: Language = provided
                .and_then(|provided| provided.contact_language_preference)
                .unwrap_or_default();
            let localizer = deps.localizer(Some(language));
            let donor_full_name = lpa.donor.full_name();

            deps.notify_client
                .send_actor_email(
                    &EmailRecipient::new(counterparty.email.clone(), language),
                    &lpa.lpa_uid,
                    &Email::AdviseAttorneyToSignOrOptOut {
                        donor_full_name_possessive: localizer.possessive(&donor_full_name),
                        donor_full_name,
                        lpa_type: localizer.t(lpa.lpa_type.as_str()),
                        attorney_full_name: counterparty.full_name.clone(),
                        invited_date: localizer.format_date(invited_at),
                        deadline_date: localizer.format_date(expires_at),
                        attorney_start_page_url: start_page_url.clone(),
                    },
                )
                .await
                .context(counterparty.email_context)?;
        }

        let localizer = deps.localizer(Some(lpa.donor.contact_language_preference));
        deps.inform_donor(
            lpa,
            "INFORM_DONOR_ATTORNEY_HAS_NOT_ACTED",
            Email::InformDonorAttorneyHasNotActed {
                greeting: deps.notify_client.email_greeting(lpa),
                attorney_full_name: counterparty.full_name.clone(),
                lpa_type: localizer.t(lpa.lpa_type.as_str()),
                invited_date: localizer.format_date(invited_at),
                deadline_date: localizer.format_date(expires_at),
                attorney_start_page_url: start_page_url,
            },
        )
        .await
    }
}

#[async_trait]
impl ActionHandler for RemindAttorneyToComplete {
    async fn execute(&self, event: &Event) -> Result<(), StepError> {
        let deps = &self.deps;

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
        if !deps.reminder_due(lpa.attorneys_invited_at, expires_at) {
            return Err(StepError::Ignored);
        }
        let invited_at = lpa.attorneys_invited_at.unwrap_or(expires_at);

        let provided = match deps.attorney_store.all(&donor.lpa_uid).await {
            Ok(provided) => provided,
            Err(err) if err.is_not_found() => Vec::new(),
            Err(err) => return Err(err).context("error retrieving attorney"),
        };
        let provided: HashMap<Uuid, &AttorneyProvided> = provided
            .iter()
            .map(|attorney| (attorney.uid, attorney))
            .collect();

        let counterparties = Counterparty::of(
            ActorType::Attorney,
            ActorType::TrustCorporation,
            &lpa.attorneys,
        )
        .into_iter()
        .chain(Counterparty::of(
            ActorType::ReplacementAttorney,
            ActorType::ReplacementTrustCorporation,
            &lpa.replacement_attorneys,
        ));

        let mut ran = false;
        for counterparty in counterparties {
            let attorney = provided.get(&counterparty.uid).copied();
            if attorney.is_some_and(AttorneyProvided::signed) {
                continue;
            }

            ran = true;
            self.remind(&lpa, &counterparty, attorney, invited_at, expires_at)
                .await?;
        }

        if !ran {
            return Err(StepError::Ignored);
        }

        Ok(())
    }
}
