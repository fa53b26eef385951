use crate::helpers::spawn_app;
use async_trait::async_trait;
use festive_notifications::client::{
    GatewayClient, HookState, HttpGateway, Permission, PushPlatform, PushSubscription,
    SubscriptionHook,
};
use std::sync::Mutex;
use std::time::Duration;

/// A browser that grants permission and hands out a fixed subscription.
struct GrantingBrowser {
    subscription: Mutex<Option<PushSubscription>>,
}

impl GrantingBrowser {
    fn new() -> Self {
        Self {
            subscription: Mutex::new(None),
        }
    }
}

#[async_trait]
impl PushPlatform for GrantingBrowser {
    fn is_supported(&self) -> bool {
        true
    }

    fn permission(&self) -> Permission {
        Permission::Default
    }

    async fn request_permission(&self) -> Result<Permission, anyhow::Error> {
        Ok(Permission::Granted)
    }

    async fn register_worker(&self) -> Result<(), anyhow::Error> {
        Ok(())
    }

    async fn subscribe(
        &self,
        application_server_key: &[u8],
    ) -> Result<PushSubscription, anyhow::Error> {
        assert_eq!(application_server_key.len(), 65);
        let subscription = PushSubscription {
            endpoint: "https://fcm.googleapis.com/fcm/send/browser-1".to_string(),
            keys: serde_json::json!({"p256dh": "BNc", "auth": "tBH"}),
            expiration_time: None,
        };
        *self.subscription.lock().unwrap() = Some(subscription.clone());
        Ok(subscription)
    }

    async fn current_subscription(&self) -> Result<Option<PushSubscription>, anyhow::Error> {
        Ok(self.subscription.lock().unwrap().clone())
    }

    async fn cancel(&self, _subscription: &PushSubscription) -> Result<bool, anyhow::Error> {
        *self.subscription.lock().unwrap() = None;
        Ok(true)
    }
}

#[tokio::test]
async fn the_http_gateway_serves_the_configured_vapid_key() {
    // arrange
    let app = spawn_app().await;
    let gateway = HttpGateway::new(app.address.clone(), Duration::from_secs(2)).unwrap();

    // act
    let key = gateway.vapid_public_key().await.unwrap();

    // assert
    assert_eq!(key, app.vapid_public_key);
}

#[tokio::test]
async fn the_http_gateway_surfaces_server_validation_errors() {
    // arrange
    let app = spawn_app().await;
    let gateway = HttpGateway::new(app.address.clone(), Duration::from_secs(2)).unwrap();
    let invalid = PushSubscription {
        endpoint: "  ".to_string(),
        keys: serde_json::Value::Null,
        expiration_time: None,
    };

    // act
    let error = gateway.subscribe(&invalid).await.unwrap_err();

    // assert
    assert!(error.to_string().contains("400"));
}

#[tokio::test]
async fn a_browser_subscribes_and_unsubscribes_through_the_gateway() {
    // arrange
    let app = spawn_app().await;
    let gateway = HttpGateway::new(app.address.clone(), Duration::from_secs(2)).unwrap();
    let hook = SubscriptionHook::new(GrantingBrowser::new(), gateway, None);
    assert_eq!(hook.mount().await, HookState::Default);

    // act
    hook.subscribe().await.unwrap();

    // assert
    assert_eq!(hook.state(), HookState::Subscribed);
    let listing = app.admin_subscriptions().await;
    assert_eq!(listing["count"], 1);
    assert_eq!(
        listing["subscriptions"][0]["endpoint"],
        "https://fcm.googleapis.com/fcm/send/browser-1"
    );

    // act
    hook.unsubscribe().await.unwrap();

    // assert
    assert_eq!(hook.state(), HookState::Unsubscribed);
    assert_eq!(app.admin_subscriptions().await["count"], 0);
}

#[tokio::test]
async fn a_browser_stays_subscribed_when_the_gateway_is_unreachable() {
    // arrange
    let gateway = HttpGateway::new(
        "http://127.0.0.1:9".to_string(),
        Duration::from_millis(200),
    )
    .unwrap();
    let fallback_key =
        "BPi0k6CqYFuynWm3Dsw5QFsMfM_GR1vnRysVbQO6pX5FxFbc0A03vJVRS8CMLYRt1K_TVUohkXMgMM6jhGF2Chg";
    let hook = SubscriptionHook::new(
        GrantingBrowser::new(),
        gateway,
        Some(fallback_key.to_string()),
    );
    hook.mount().await;

    // act
    let result = hook.subscribe().await;

    // assert
    assert!(result.is_ok());
    assert_eq!(hook.state(), HookState::Subscribed);
    assert_eq!(hook.error(), None);
}
