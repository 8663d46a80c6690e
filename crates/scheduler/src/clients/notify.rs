use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use lpa_core::domain::Lpa;
use lpa_core::ports::{
    Bundle, ClientError, Email, EmailRecipient, EventClient, NotificationSent, NotifyClient,
};

/// Records emails in the log and reports each one as sent.
pub struct TracingNotifyClient {
    event_client: Arc<dyn EventClient>,
    bundle: Arc<dyn Bundle>,
    new_id: fn() -> Uuid,
}

impl TracingNotifyClient {
    pub fn new(event_client: Arc<dyn EventClient>, bundle: Arc<dyn Bundle>) -> Self {
        Self {
            event_client,
            bundle,
            new_id: Uuid::new_v4,
        }
    }
}

#[async_trait]
impl NotifyClient for TracingNotifyClient {
    async fn send_actor_email(
        &self,
        to: &EmailRecipient,
        lpa_uid: &str,
        email: &Email,
    ) -> Result<(), ClientError> {
        let notification_id = (self.new_id)();
        let personalisation =
            serde_json::to_string(email).map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        tracing::info!(
            %lpa_uid,
            %notification_id,
            template = email.template(),
            language = %to.language,
            personalisation = %personalisation,
            "Email sent"
        );

        self.event_client
            .send_notification_sent(&NotificationSent {
                uid: lpa_uid.to_string(),
                notification_id,
            })
            .await
    }

    fn email_greeting(&self, lpa: &Lpa) -> String {
        let localizer = self
            .bundle
            .for_language(lpa.donor.contact_language_preference);

        match &lpa.correspondent {
            Some(correspondent) if !correspondent.first_names.is_empty() => format!(
                "{} {}. {} {} {} ({} {}).",
                localizer.t("dear"),
                correspondent.full_name(),
                localizer.t("thisEmailIsAbout"),
                localizer.possessive(&lpa.donor.full_name()),
                localizer.t(lpa.lpa_type.as_str()),
                localizer.t("lpaReference"),
                lpa.lpa_uid,
            ),
            _ => format!("{} {}", localizer.t("dear"), lpa.donor.full_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{StaticBundle, TracingEventClient};
    use lpa_core::domain::{Correspondent, Donor, Language, LpaType};

    fn client() -> TracingNotifyClient {
        TracingNotifyClient::new(Arc::new(TracingEventClient), Arc::new(StaticBundle::new()))
    }

    fn lpa() -> Lpa {
        Lpa {
            lpa_uid: "M-1111-2222-3333".to_string(),
            lpa_type: LpaType::PersonalWelfare,
            donor: Donor {
                first_names: "Sam".to_string(),
                last_name: "Smith".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_greeting_for_donor() {
        assert_eq!(client().email_greeting(&lpa()), "Dear Sam Smith");
    }

    #[test]
    fn test_greeting_for_correspondent() {
        let mut lpa = lpa();
        lpa.correspondent = Some(Correspondent {
            first_names: "Cal".to_string(),
            last_name: "Jones".to_string(),
            ..Default::default()
        });

        assert_eq!(
            client().email_greeting(&lpa),
            "Dear Cal Jones. This email is about Sam Smith’s personal welfare (LPA reference number M-1111-2222-3333)."
        );
    }

    #[test]
    fn test_greeting_in_welsh() {
        let mut lpa = lpa();
        lpa.donor.contact_language_preference = Language::Cy;
        assert_eq!(client().email_greeting(&lpa), "Annwyl Sam Smith");
    }

    #[tokio::test]
    async fn test_send_actor_email() {
        let result = client()
            .send_actor_email(
                &EmailRecipient::new("a@example.com", Language::En),
                "M-1",
                &Email::DonorIdentityCheckExpired,
            )
            .await;
        assert!(result.is_ok());
    }
}
