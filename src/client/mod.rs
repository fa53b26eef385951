//! Client-side subscription state machine.
//!
//! Drives the permission prompt, worker registration and push subscription
//! of a browser-like [`PushPlatform`] and keeps the gateway in sync through a
//! [`GatewayClient`]. The local platform subscription is authoritative: a
//! gateway failure is logged and never undoes a local state change.

mod gateway;
mod platform;

pub use gateway::{GatewayClient, HttpGateway};
pub use platform::{Permission, PushPlatform, PushSubscription};

use crate::domain::VapidPublicKey;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookState {
    Unsupported,
    /// No decision yet.
    Default,
    Denied,
    Subscribed,
    Unsubscribed,
}

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("Push notifications are not supported in your browser")]
    Unsupported,
    #[error("Notifications have been blocked. Please enable them in browser settings.")]
    Blocked,
    #[error("Notification permission denied")]
    PermissionDenied,
    #[error("A notification request is already in progress")]
    Busy,
    #[error("VAPID public key is not configured.")]
    MissingVapidKey,
    #[error("{0}")]
    InvalidVapidKey(String),
    #[error("Failed to unsubscribe locally")]
    CancelRejected,
    #[error(transparent)]
    Platform(anyhow::Error),
}

struct Snapshot {
    state: HookState,
    error: Option<String>,
}

pub struct SubscriptionHook<P, G> {
    platform: P,
    gateway: G,
    fallback_vapid_key: Option<String>,
    busy: AtomicBool,
    snapshot: Mutex<Snapshot>,
}

/// Clears the busy flag when an action finishes, however it finishes.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<P: PushPlatform, G: GatewayClient> SubscriptionHook<P, G> {
    /// `fallback_vapid_key` is used when the gateway cannot provide one.
    pub fn new(platform: P, gateway: G, fallback_vapid_key: Option<String>) -> Self {
        Self {
            platform,
            gateway,
            fallback_vapid_key,
            busy: AtomicBool::new(false),
            snapshot: Mutex::new(Snapshot {
                state: HookState::Default,
                error: None,
            }),
        }
    }

    pub fn state(&self) -> HookState {
        self.lock().state
    }

    /// The message to show the user for the last failed action.
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Probes the platform and picks the initial state.
    #[tracing::instrument(name = "Mounting the subscription hook", skip(self))]
    pub async fn mount(&self) -> HookState {
        if !self.platform.is_supported() {
            self.set_state(HookState::Unsupported);
            return HookState::Unsupported;
        }
        let state = match self.platform.permission() {
            Permission::Denied => HookState::Denied,
            _ => match self.platform.current_subscription().await {
                Ok(Some(_)) => HookState::Subscribed,
                Ok(None) => HookState::Default,
                Err(error) => {
                    tracing::warn!(error.cause_chain = ?error, "Error checking subscription");
                    HookState::Default
                }
            },
        };
        self.set_state(state);
        state
    }

    #[tracing::instrument(name = "Subscribing to push notifications", skip(self))]
    pub async fn subscribe(&self) -> Result<(), HookError> {
        let _busy = self.begin()?;
        let result = self.try_subscribe().await;
        self.finish(&result);
        result
    }

    #[tracing::instrument(name = "Unsubscribing from push notifications", skip(self))]
    pub async fn unsubscribe(&self) -> Result<(), HookError> {
        let _busy = self.begin()?;
        let result = self.try_unsubscribe().await;
        self.finish(&result);
        result
    }

    async fn try_subscribe(&self) -> Result<(), HookError> {
        match self.state() {
            HookState::Unsupported => return Err(HookError::Unsupported),
            HookState::Denied => return Err(HookError::Blocked),
            _ => {}
        }

        match self
            .platform
            .request_permission()
            .await
            .map_err(HookError::Platform)?
        {
            Permission::Granted => {}
            Permission::Denied => {
                self.set_state(HookState::Denied);
                return Err(HookError::PermissionDenied);
            }
            Permission::Default => return Err(HookError::PermissionDenied),
        }

        self.platform
            .register_worker()
            .await
            .map_err(HookError::Platform)?;
        let key = self.resolve_vapid_key().await?;
        let subscription = self
            .platform
            .subscribe(key.as_bytes())
            .await
            .map_err(HookError::Platform)?;
        self.set_state(HookState::Subscribed);

        if let Err(error) = self.gateway.subscribe(&subscription).await {
            tracing::warn!(
                error.cause_chain = ?error,
                "Error saving subscription to server; keeping the local subscription"
            );
        }
        Ok(())
    }

    async fn try_unsubscribe(&self) -> Result<(), HookError> {
        let subscription = self
            .platform
            .current_subscription()
            .await
            .map_err(HookError::Platform)?;

        if let Some(subscription) = subscription {
            if let Err(error) = self.gateway.unsubscribe(&subscription.endpoint).await {
                tracing::warn!(
                    error.cause_chain = ?error,
                    "Error notifying server about unsubscribe; continuing locally"
                );
            }
            if !self
                .platform
                .cancel(&subscription)
                .await
                .map_err(HookError::Platform)?
            {
                return Err(HookError::CancelRejected);
            }
        }
        self.set_state(HookState::Unsubscribed);
        Ok(())
    }

    async fn resolve_vapid_key(&self) -> Result<VapidPublicKey, HookError> {
        let encoded = match self.gateway.vapid_public_key().await {
            Ok(key) => key,
            Err(error) => {
                tracing::warn!(
                    error.cause_chain = ?error,
                    "Could not fetch VAPID key from server, using fallback"
                );
                self.fallback_vapid_key
                    .clone()
                    .ok_or(HookError::MissingVapidKey)?
            }
        };
        VapidPublicKey::parse(encoded).map_err(HookError::InvalidVapidKey)
    }

    fn begin(&self) -> Result<BusyGuard<'_>, HookError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| HookError::Busy)?;
        self.lock().error = None;
        Ok(BusyGuard(&self.busy))
    }

    fn finish(&self, result: &Result<(), HookError>) {
        if let Err(error) = result {
            tracing::warn!(error = %error, "Notification action failed");
            self.lock().error = Some(error.to_string());
        }
    }

    fn set_state(&self, state: HookState) {
        self.lock().state = state;
    }

    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
