use crate::push::{PushDeliverer, PushPayload};
use crate::store::{StorageError, SubscriptionStore};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BroadcastReport {
    pub sent: usize,
    pub failed: usize,
    pub total: usize,
}

/// Delivers `payload` to every pending subscription and marks the ones that
/// were delivered. Failed subscriptions stay pending for the next broadcast.
#[tracing::instrument(
    name = "Broadcasting a push notification",
    skip(store, deliverer, payload),
    fields(title = %payload.title)
)]
pub async fn broadcast(
    store: &SubscriptionStore,
    deliverer: &dyn PushDeliverer,
    payload: &PushPayload,
    attempts: u32,
    now: DateTime<Utc>,
) -> Result<BroadcastReport, StorageError> {
    let _broadcast = store.lock_broadcast().await;
    let pending: Vec<_> = store
        .list()
        .await
        .into_iter()
        .filter(|s| s.is_pending())
        .collect();

    let mut delivered = Vec::with_capacity(pending.len());
    let mut failed = 0;
    for subscription in &pending {
        let mut attempt = 1;
        loop {
            match deliverer.send(subscription, payload).await {
                Ok(()) => {
                    delivered.push(subscription.endpoint.clone());
                    break;
                }
                Err(error) if attempt < attempts => {
                    tracing::debug!(error.cause_chain = ?error, attempt, "Retrying push delivery");
                    attempt += 1;
                }
                Err(error) => {
                    tracing::warn!(
                        error.cause_chain = ?error,
                        endpoint = %subscription.endpoint,
                        "Failed to deliver push notification"
                    );
                    failed += 1;
                    break;
                }
            }
        }
    }

    let sent = store.mark_pending_sent(&delivered, now).await?;
    let report = BroadcastReport {
        sent,
        failed,
        total: store.len().await,
    };
    tracing::info!(sent = report.sent, failed = report.failed, total = report.total, "Broadcast finished");
    Ok(report)
}
