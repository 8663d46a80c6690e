use async_trait::async_trait;

use lpa_core::ports::{ClientError, EventClient, LetterRequested, NotificationSent};

/// Publishes events to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventClient;

#[async_trait]
impl EventClient for TracingEventClient {
    async fn send_letter_requested(&self, event: &LetterRequested) -> Result<(), ClientError> {
        let detail =
            serde_json::to_string(event).map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        tracing::info!(
            event_type = "letter-requested",
            lpa_uid = %event.uid,
            letter_type = event.letter_type,
            detail = %detail,
            "Event sent"
        );
        Ok(())
    }

    async fn send_notification_sent(&self, event: &NotificationSent) -> Result<(), ClientError> {
        let detail =
            serde_json::to_string(event).map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        tracing::info!(
            event_type = "notification-sent",
            lpa_uid = %event.uid,
            detail = %detail,
            "Event sent"
        );
        Ok(())
    }
}
