use crate::guards::AdminToken;
use crate::push::{broadcast, BroadcastReport, PushDeliverer, PushPayload};
use crate::routes::ApiError;
use crate::startup::ApiSettings;
use crate::store::SubscriptionStore;
use chrono::Utc;
use rocket::serde::json::Json;
use rocket::State;
use std::sync::Arc;
use uuid::Uuid;

#[derive(serde::Serialize)]
pub struct TriggerResponse {
    success: bool,
    message: &'static str,
    result: BroadcastReport,
}

#[post("/trigger-new-year")]
#[tracing::instrument(
    name = "Triggering the New Year notification",
    skip(_admin, store, deliverer, settings),
    fields(request_id = %Uuid::new_v4())
)]
pub async fn trigger_new_year(
    _admin: AdminToken,
    store: &State<SubscriptionStore>,
    deliverer: &State<Arc<dyn PushDeliverer>>,
    settings: &State<ApiSettings>,
) -> Result<Json<TriggerResponse>, ApiError> {
    let result = broadcast(
        store,
        deliverer.inner().as_ref(),
        &PushPayload::new_year(),
        settings.delivery_attempts,
        Utc::now(),
    )
    .await?;
    Ok(Json(TriggerResponse {
        success: true,
        message: "New Year notifications triggered",
        result,
    }))
}
