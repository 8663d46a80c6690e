use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::ActorType;

use super::ClientError;

/// Asks for a physical letter to be sent to an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterRequested {
    pub uid: String,
    pub letter_type: &'static str,
    pub actor_type: ActorType,
    #[serde(rename = "actorUID")]
    pub actor_uid: Uuid,
}

/// Records that a notification was sent about an lpa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSent {
    pub uid: String,
    pub notification_id: Uuid,
}

/// Publishes domain events for downstream systems.
#[async_trait]
pub trait EventClient: Send + Sync {
    async fn send_letter_requested(&self, event: &LetterRequested) -> Result<(), ClientError>;

    async fn send_notification_sent(&self, event: &NotificationSent) -> Result<(), ClientError>;
}
