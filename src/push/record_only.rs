use crate::models::Subscription;
use crate::push::{PushDeliverer, PushPayload};
use async_trait::async_trait;

/// Accepts every message without contacting a push service, so a broadcast
/// only records subscribers as notified.
#[derive(Debug, Default)]
pub struct RecordOnlyDeliverer;

#[async_trait]
impl PushDeliverer for RecordOnlyDeliverer {
    async fn send(
        &self,
        subscription: &Subscription,
        payload: &PushPayload,
    ) -> Result<(), anyhow::Error> {
        tracing::debug!(
            endpoint = %subscription.endpoint,
            title = %payload.title,
            "Recording push notification without delivery"
        );
        Ok(())
    }
}
