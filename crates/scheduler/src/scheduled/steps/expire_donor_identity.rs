use std::sync::Arc;

use async_trait::async_trait;

use lpa_core::domain::{IdentityStatus, TaskState};
use lpa_core::ports::{Email, EmailRecipient};
use lpa_core::scheduled::Event;

use super::StepDeps;
use crate::scheduled::error::{StepContext, StepError};
use crate::scheduled::runner::ActionHandler;

/// Expires a confirmed identity the donor did not sign with in time.
pub struct ExpireDonorIdentity {
    deps: Arc<StepDeps>,
}

impl ExpireDonorIdentity {
    pub fn new(deps: Arc<StepDeps>) -> Self {
        Self { deps }
    }
}

#[async_trait]
impl ActionHandler for ExpireDonorIdentity {
    async fn execute(&self, event: &Event) -> Result<(), StepError> {
        let mut provided = self
            .deps
            .donor_store
            .one(&event.target_lpa_key, &event.target_lpa_owner_key)
            .await
            .context("error retrieving donor")?;

        if !provided.identity_user_data.is_confirmed() || provided.signed() {
            return Err(StepError::Ignored);
        }

        provided.identity_user_data.status = IdentityStatus::Expired;
        provided.tasks.confirm_your_identity = TaskState::NotStarted;

        let to = EmailRecipient::new(
            provided.donor.email.clone(),
            provided.donor.contact_language_preference,
        );
        self.deps
            .notify_client
            .send_actor_email(&to, &provided.lpa_uid, &Email::DonorIdentityCheckExpired)
            .await
            .context("could not send donor email")?;

        self.deps
            .donor_store
            .put(&provided)
            .await
            .context("error updating donor")?;

        Ok(())
    }
}
