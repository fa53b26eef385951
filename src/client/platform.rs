use async_trait::async_trait;

/// The browser's notification permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Default,
    Granted,
    Denied,
}

/// A push subscription as handed out by the platform's push manager.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscription {
    pub endpoint: String,
    pub keys: serde_json::Value,
    #[serde(default)]
    pub expiration_time: Option<i64>,
}

/// Notification permission, service worker and push manager capabilities
/// of the host platform.
#[async_trait]
pub trait PushPlatform: Send + Sync {
    fn is_supported(&self) -> bool;

    fn permission(&self) -> Permission;

    /// Prompts the user. Resolves once they answer.
    async fn request_permission(&self) -> Result<Permission, anyhow::Error>;

    async fn register_worker(&self) -> Result<(), anyhow::Error>;

    async fn subscribe(
        &self,
        application_server_key: &[u8],
    ) -> Result<PushSubscription, anyhow::Error>;

    async fn current_subscription(&self) -> Result<Option<PushSubscription>, anyhow::Error>;

    /// Returns `false` when the platform refused to cancel.
    async fn cancel(&self, subscription: &PushSubscription) -> Result<bool, anyhow::Error>;
}
