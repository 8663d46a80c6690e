//! The actions scheduled events trigger.
//!
//! Every action re-reads the aggregates it needs and re-checks its
//! preconditions against the current time, answering [`StepError::Ignored`]
//! when there is nothing (left) to do. This makes redelivery harmless.

mod expire_donor_identity;
mod remind_attorney_to_complete;
mod remind_certificate_provider_to_complete;
mod remind_certificate_provider_to_confirm_identity;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Months, Utc};

use lpa_core::domain::{ActorType, Language, Lpa};
use lpa_core::ports::{
    AttorneyStore, Bundle, CertificateProviderStore, Clock, DonorStore, Email, EmailRecipient,
    EventClient, LetterRequested, Localizer, LpaResolver, NotifyClient,
};
use lpa_core::scheduled::Action;

use super::error::{StepContext, StepError};
use super::runner::ActionHandler;

pub use expire_donor_identity::ExpireDonorIdentity;
pub use remind_attorney_to_complete::RemindAttorneyToComplete;
pub use remind_certificate_provider_to_complete::RemindCertificateProviderToComplete;
pub use remind_certificate_provider_to_confirm_identity::RemindCertificateProviderToConfirmIdentity;

/// How long after being asked to act a counterparty is reminded, and how
/// close to expiry the reminder window opens.
const REMINDER_DELAY: Months = Months::new(3);

const CERTIFICATE_PROVIDER_START_PATH: &str = "/certificate-provider-start";
const ATTORNEY_START_PATH: &str = "/attorney-start";

/// Collaborators shared by every action.
pub struct StepDeps {
    pub donor_store: Arc<dyn DonorStore>,
    pub certificate_provider_store: Arc<dyn CertificateProviderStore>,
    pub attorney_store: Arc<dyn AttorneyStore>,
    pub lpa_resolver: Arc<dyn LpaResolver>,
    pub notify_client: Arc<dyn NotifyClient>,
    pub event_client: Arc<dyn EventClient>,
    pub bundle: Arc<dyn Bundle>,
    pub clock: Arc<dyn Clock>,
    pub app_public_url: String,
}

/// The dispatch table of every known action.
pub fn action_handlers(deps: Arc<StepDeps>) -> HashMap<Action, Arc<dyn ActionHandler>> {
    let mut actions: HashMap<Action, Arc<dyn ActionHandler>> = HashMap::new();
    actions.insert(
        Action::ExpireDonorIdentity,
        Arc::new(ExpireDonorIdentity::new(deps.clone())),
    );
    actions.insert(
        Action::RemindCertificateProviderToComplete,
        Arc::new(RemindCertificateProviderToComplete::new(deps.clone())),
    );
    actions.insert(
        Action::RemindCertificateProviderToConfirmIdentity,
        Arc::new(RemindCertificateProviderToConfirmIdentity::new(deps.clone())),
    );
    actions.insert(
        Action::RemindAttorneyToComplete,
        Arc::new(RemindAttorneyToComplete::new(deps)),
    );
    actions
}

impl StepDeps {
    fn localizer(&self, language: Option<Language>) -> Arc<dyn Localizer> {
        self.bundle.for_language(language.unwrap_or_default())
    }

    /// Whether a reminder about something started at `since` is due: three
    /// months must have passed, and the lpa must expire within three months.
    fn reminder_due(&self, since: Option<DateTime<Utc>>, expires_at: DateTime<Utc>) -> bool {
        let now = self.clock.now();

        let Some(after_start) = since.and_then(|since| since.checked_add_months(REMINDER_DELAY))
        else {
            return false;
        };
        let Some(before_expiry) = expires_at.checked_sub_months(REMINDER_DELAY) else {
            return false;
        };

        now >= after_start && now >= before_expiry
    }

    async fn request_letter(
        &self,
        lpa: &Lpa,
        letter_type: &'static str,
        actor_type: ActorType,
        actor_uid: uuid::Uuid,
        context: &'static str,
    ) -> Result<(), StepError> {
        self.event_client
            .send_letter_requested(&LetterRequested {
                uid: lpa.lpa_uid.clone(),
                letter_type,
                actor_type,
                actor_uid,
            })
            .await
            .context(context)
    }

    /// Tells the donor about a counterparty who has not acted: by letter,
    /// to their correspondent when they have a postal one, when the donor
    /// is on paper, otherwise by email.
    async fn inform_donor(
        &self,
        lpa: &Lpa,
        letter_type: &'static str,
        email: Email,
    ) -> Result<(), StepError> {
        if lpa.donor.channel.is_paper() {
            let (actor_type, actor_uid) = match lpa.postal_correspondent() {
                Some(correspondent) => (ActorType::Correspondent, correspondent.uid),
                None => (ActorType::Donor, lpa.donor.uid),
            };

            return self
                .request_letter(
                    lpa,
                    letter_type,
                    actor_type,
                    actor_uid,
                    "could not send donor letter request",
                )
                .await;
        }

        self.notify_client
            .send_actor_email(&donor_recipient(lpa), &lpa.lpa_uid, &email)
            .await
            .context("could not send donor email")
    }
}

/// Where emails for the donor go: their correspondent if they gave an email
/// address, the donor otherwise.
fn donor_recipient(lpa: &Lpa) -> EmailRecipient {
    let email = match &lpa.correspondent {
        Some(correspondent) if !correspondent.email.is_empty() => correspondent.email.clone(),
        _ => lpa.donor.email.clone(),
    };

    EmailRecipient::new(email, lpa.donor.contact_language_preference)
}
