mod broadcast;
mod record_only;

use crate::models::Subscription;
use async_trait::async_trait;
pub use broadcast::{broadcast, BroadcastReport};
pub use record_only::RecordOnlyDeliverer;

/// Sends one push message to one subscription. `Ok` means the push service
/// accepted the message.
#[async_trait]
pub trait PushDeliverer: Send + Sync {
    async fn send(
        &self,
        subscription: &Subscription,
        payload: &PushPayload,
    ) -> Result<(), anyhow::Error>;
}

/// The JSON document the service worker reads from a push event.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
}

impl PushPayload {
    pub fn new_year() -> Self {
        Self {
            title: "Happy New Year!".to_string(),
            body: "Wishing you a joyful and prosperous New Year! 🎉".to_string(),
        }
    }
}
