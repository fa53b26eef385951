use async_trait::async_trait;
use festive_notifications::configuration::{get_configuration, Settings};
use festive_notifications::models::Subscription;
use festive_notifications::push::{PushDeliverer, PushPayload};
use festive_notifications::startup::Application;
use festive_notifications::telemetry::{get_subscriber, init_subscriber};
use once_cell::sync::Lazy;
use secrecy::Secret;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use uuid::Uuid;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".into();
    let subscriber_name = "test".into();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber).expect("Failed to initialise tracing.");
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).expect("Failed to initialise tracing.");
    }
});

/// Records every push it is asked to deliver and fails for the endpoints
/// in `failing`.
#[derive(Default)]
pub struct MockDeliverer {
    pub sent: Mutex<Vec<(String, PushPayload)>>,
    pub failing: Mutex<HashSet<String>>,
}

#[async_trait]
impl PushDeliverer for MockDeliverer {
    async fn send(
        &self,
        subscription: &Subscription,
        payload: &PushPayload,
    ) -> Result<(), anyhow::Error> {
        if self.failing.lock().unwrap().contains(&subscription.endpoint) {
            return Err(anyhow::anyhow!("410 Gone"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((subscription.endpoint.clone(), payload.clone()));
        Ok(())
    }
}

pub struct TestApp {
    pub address: String,
    pub admin_token: String,
    pub vapid_public_key: String,
    pub deliverer: Arc<MockDeliverer>,
    pub store_path: PathBuf,
    pub data_dir: TempDir,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_subscribe(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/subscribe", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_unsubscribe(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/unsubscribe", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn subscribe_endpoint(&self, endpoint: &str) {
        self.post_subscribe(&subscription_body(endpoint))
            .await
            .error_for_status()
            .unwrap();
    }

    /// Sends an admin request carrying the valid bearer token.
    pub async fn admin_get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(&format!("{}{}", &self.address, path))
            .bearer_auth(&self.admin_token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn admin_post(&self, path: &str) -> reqwest::Response {
        self.api_client
            .post(&format!("{}{}", &self.address, path))
            .bearer_auth(&self.admin_token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn admin_subscriptions(&self) -> serde_json::Value {
        self.admin_get("/api/admin/subscriptions")
            .await
            .error_for_status()
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    pub fn stored_subscriptions(&self) -> Vec<serde_json::Value> {
        let content = std::fs::read_to_string(&self.store_path).unwrap();
        serde_json::from_str(&content).unwrap()
    }
}

pub fn subscription_body(endpoint: &str) -> serde_json::Value {
    serde_json::json!({
        "endpoint": endpoint,
        "expirationTime": null,
        "keys": {
            "p256dh": "BNcRdreALRFXTkOOUHK1EtK2wtaz5Ry4YfYCA_0QTpQtUbVlUls0VJXg7A8u-Ts1XbjhazAkj7I99e8QcYP7DkM",
            "auth": "tBHItJI5svbpez7KI4CCXg"
        }
    })
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_subscriptions(Vec::new()).await
}

/// Starts the app on a store file pre-filled with `subscriptions`.
pub async fn spawn_app_with_subscriptions(subscriptions: Vec<serde_json::Value>) -> TestApp {
    spawn_configured_app(subscriptions, |_| {}).await
}

/// Starts the app with the debug endpoints switched off, as in production.
pub async fn spawn_app_without_debug_endpoints() -> TestApp {
    spawn_configured_app(Vec::new(), |c| c.application.expose_debug_endpoints = false).await
}

async fn spawn_configured_app(
    subscriptions: Vec<serde_json::Value>,
    customize: impl FnOnce(&mut Settings),
) -> TestApp {
    Lazy::force(&TRACING);

    let data_dir = TempDir::new().expect("Failed to create a data directory.");
    let store_path = data_dir.path().join("data").join("subscriptions.json");
    if !subscriptions.is_empty() {
        std::fs::create_dir_all(store_path.parent().unwrap()).unwrap();
        std::fs::write(&store_path, serde_json::to_vec(&subscriptions).unwrap()).unwrap();
    }

    let admin_token = Uuid::new_v4().to_string();
    let configuration: Settings = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.application.port = None;
        c.storage.subscriptions_file = store_path.clone();
        c.notifications.admin_token = Some(Secret::new(admin_token.clone()));
        customize(&mut c);
        c
    };

    let deliverer = Arc::new(MockDeliverer::default());
    let app = Application::build(&configuration, deliverer.clone())
        .await
        .expect("Failed to build application.");
    let port = app.port;
    let _ = tokio::spawn(app.server.launch());
    let port = port.get().await.expect("The server never lifted off.");

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        admin_token,
        vapid_public_key: configuration.notifications.vapid_public_key.clone(),
        deliverer,
        store_path,
        data_dir,
        api_client: reqwest::Client::new(),
    }
}
