use crate::guards::{AdminCredentials, AdminToken};
use crate::models::{SanitizedSubscription, SubscriptionStats};
use crate::routes::ApiError;
use crate::startup::ApiSettings;
use crate::store::SubscriptionStore;
use anyhow::anyhow;
use chrono::{DateTime, Months, Utc};
use rocket::serde::json::Json;
use rocket::State;
use uuid::Uuid;

#[derive(serde::Serialize)]
pub struct SubscriptionsResponse {
    success: bool,
    count: usize,
    subscriptions: Vec<SanitizedSubscription>,
    stats: SubscriptionStats,
    timestamp: DateTime<Utc>,
}

#[get("/admin/subscriptions")]
#[tracing::instrument(
    name = "Listing subscriptions for the admin dashboard",
    skip(_admin, store, settings),
    fields(request_id = %Uuid::new_v4())
)]
pub async fn list_subscriptions(
    _admin: AdminToken,
    store: &State<SubscriptionStore>,
    settings: &State<ApiSettings>,
) -> Json<SubscriptionsResponse> {
    let now = Utc::now();
    let records = store.list().await;
    let stats = SubscriptionStats::compute(&records, now, settings.recent_window);
    let subscriptions: Vec<SanitizedSubscription> =
        records.iter().map(SanitizedSubscription::from).collect();
    tracing::info!(count = subscriptions.len(), "Returning subscriptions");
    Json(SubscriptionsResponse {
        success: true,
        count: subscriptions.len(),
        subscriptions,
        stats,
        timestamp: now,
    })
}

#[derive(serde::Deserialize)]
pub struct SendTestBody {
    message: Option<String>,
}

#[derive(serde::Serialize)]
pub struct SendTestResponse {
    success: bool,
    message: &'static str,
    note: &'static str,
}

/// Smoke test for the admin surface; nothing is delivered.
#[post("/admin/send-test", data = "<body>")]
#[tracing::instrument(name = "Admin test notification", skip(_admin, body))]
pub async fn send_test(
    _admin: AdminToken,
    body: Option<Json<SendTestBody>>,
) -> Json<SendTestResponse> {
    let message = body.and_then(|b| b.into_inner().message);
    tracing::info!(message = ?message, "Test notification requested");
    Json(SendTestResponse {
        success: true,
        message: "Test notification would be sent",
        note: "Test notifications are acknowledged only; use the New Year broadcast to deliver",
    })
}

#[derive(serde::Serialize)]
pub struct CleanupResponse {
    success: bool,
    message: &'static str,
    cleaned: usize,
    remaining: usize,
}

#[post("/admin/cleanup")]
#[tracing::instrument(
    name = "Cleaning up stale subscriptions",
    skip(_admin, store, settings),
    fields(request_id = %Uuid::new_v4())
)]
pub async fn cleanup(
    _admin: AdminToken,
    store: &State<SubscriptionStore>,
    settings: &State<ApiSettings>,
) -> Result<Json<CleanupResponse>, ApiError> {
    let cutoff = Utc::now()
        .checked_sub_months(Months::new(settings.retention_months))
        .ok_or_else(|| anyhow!("Retention cutoff is out of range"))?;
    let cleaned = store.purge_older_than(cutoff).await?;
    if cleaned > 0 {
        tracing::info!(cleaned, "Cleaned up old subscriptions");
    }
    Ok(Json(CleanupResponse {
        success: true,
        message: "Cleanup completed",
        cleaned,
        remaining: store.len().await,
    }))
}

#[derive(serde::Serialize)]
pub struct DebugTokenResponse {
    configured: bool,
    length: usize,
    note: &'static str,
}

/// Reports whether an admin token was configured without revealing it.
/// Only mounted when debug endpoints are enabled.
#[get("/admin/debug-token")]
pub fn debug_token(credentials: &State<AdminCredentials>) -> Json<DebugTokenResponse> {
    Json(DebugTokenResponse {
        configured: credentials.is_configured(),
        length: credentials.configured_length(),
        note: "For local debugging only. Token value is not exposed.",
    })
}
