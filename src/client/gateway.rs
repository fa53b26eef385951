use crate::client::PushSubscription;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use std::time::Duration;

/// The notification gateway as seen from the client.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    async fn vapid_public_key(&self) -> Result<String, anyhow::Error>;

    async fn subscribe(&self, subscription: &PushSubscription) -> Result<(), anyhow::Error>;

    async fn unsubscribe(&self, endpoint: &str) -> Result<(), anyhow::Error>;
}

pub struct HttpGateway {
    http_client: reqwest::Client,
    base_url: String,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct VapidKeyResponse {
    public_key: String,
}

#[derive(serde::Deserialize)]
struct FailureResponse {
    error: Option<String>,
}

#[derive(serde::Serialize)]
struct UnsubscribeRequest<'a> {
    endpoint: &'a str,
}

impl HttpGateway {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, anyhow::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build the gateway HTTP client")?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }
}

/// Turns a non-2xx response into an error carrying the server's message.
async fn ensure_success(
    response: reqwest::Response,
    fallback: &str,
) -> Result<reqwest::Response, anyhow::Error> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let message = response
        .json::<FailureResponse>()
        .await
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| fallback.to_string());
    Err(anyhow!("{} ({})", message, status))
}

#[async_trait]
impl GatewayClient for HttpGateway {
    async fn vapid_public_key(&self) -> Result<String, anyhow::Error> {
        let response = self
            .http_client
            .get(self.url("vapid-public-key"))
            .send()
            .await
            .context("Failed to fetch the VAPID public key")?;
        let body: VapidKeyResponse = ensure_success(response, "Failed to fetch the VAPID public key")
            .await?
            .json()
            .await
            .context("Unexpected VAPID key response")?;
        Ok(body.public_key)
    }

    async fn subscribe(&self, subscription: &PushSubscription) -> Result<(), anyhow::Error> {
        let response = self
            .http_client
            .post(self.url("subscribe"))
            .json(subscription)
            .send()
            .await
            .context("Failed to send the subscription to the server")?;
        ensure_success(response, "Failed to save subscription").await?;
        Ok(())
    }

    async fn unsubscribe(&self, endpoint: &str) -> Result<(), anyhow::Error> {
        let response = self
            .http_client
            .post(self.url("unsubscribe"))
            .json(&UnsubscribeRequest { endpoint })
            .send()
            .await
            .context("Failed to notify the server about the unsubscription")?;
        ensure_success(response, "Failed to unsubscribe").await?;
        Ok(())
    }
}
