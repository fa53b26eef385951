use crate::domain::NewSubscription;
use chrono::offset::Utc;
use chrono::{DateTime, Duration};

/// A stored push subscription, persisted with camelCase keys.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub endpoint: String,
    #[serde(default)]
    pub keys: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<i64>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub notification_sent: bool,
    #[serde(default)]
    pub notification_sent_at: Option<DateTime<Utc>>,
}

impl Subscription {
    pub fn new(new_subscription: NewSubscription, created_at: DateTime<Utc>) -> Self {
        Self {
            endpoint: new_subscription.endpoint.into(),
            keys: new_subscription.keys,
            expiration_time: new_subscription.expiration_time,
            created_at,
            notification_sent: false,
            notification_sent_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.notification_sent
    }

    /// Flags the record as notified. Returns `false`, leaving the original
    /// timestamp in place, if it already was.
    pub fn mark_sent(&mut self, at: DateTime<Utc>) -> bool {
        if self.notification_sent {
            return false;
        }
        self.notification_sent = true;
        self.notification_sent_at = Some(at);
        true
    }
}

/// What the admin dashboard is allowed to see of a subscription.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedSubscription {
    pub endpoint: String,
    pub created_at: DateTime<Utc>,
    pub notification_sent: bool,
    pub notification_sent_at: Option<DateTime<Utc>>,
}

impl From<&Subscription> for SanitizedSubscription {
    fn from(subscription: &Subscription) -> Self {
        Self {
            endpoint: subscription.endpoint.clone(),
            created_at: subscription.created_at,
            notification_sent: subscription.notification_sent,
            notification_sent_at: subscription.notification_sent_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubscriptionStats {
    pub total: usize,
    pub pending: usize,
    pub sent: usize,
    pub recent: usize,
}

impl SubscriptionStats {
    /// `recent` counts records created strictly after `now - recent_window`.
    pub fn compute(
        subscriptions: &[Subscription],
        now: DateTime<Utc>,
        recent_window: Duration,
    ) -> Self {
        let recent_since = now.checked_sub_signed(recent_window);
        let sent = subscriptions.iter().filter(|s| s.notification_sent).count();
        Self {
            total: subscriptions.len(),
            pending: subscriptions.len() - sent,
            sent,
            recent: subscriptions
                .iter()
                .filter(|s| recent_since.map_or(true, |since| s.created_at > since))
                .count(),
        }
    }
}
