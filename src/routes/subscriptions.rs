use crate::domain::{NewSubscription, PushEndpoint};
use crate::routes::ApiError;
use crate::store::SubscriptionStore;
use chrono::Utc;
use rocket::serde::json::Json;
use rocket::State;
use uuid::Uuid;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeBody {
    endpoint: Option<String>,
    #[serde(default)]
    keys: serde_json::Value,
    #[serde(default)]
    expiration_time: Option<i64>,
}

#[derive(serde::Deserialize)]
pub struct UnsubscribeBody {
    endpoint: Option<String>,
}

#[derive(serde::Serialize)]
pub struct SuccessResponse {
    success: bool,
    message: &'static str,
}

impl TryFrom<SubscribeBody> for NewSubscription {
    type Error = String;

    fn try_from(body: SubscribeBody) -> Result<Self, Self::Error> {
        let endpoint = body
            .endpoint
            .ok_or_else(|| "Invalid subscription data".to_string())?;
        let endpoint = PushEndpoint::parse(endpoint)?;
        Ok(NewSubscription {
            endpoint,
            keys: body.keys,
            expiration_time: body.expiration_time,
        })
    }
}

#[post("/subscribe", data = "<body>")]
#[tracing::instrument(
    name = "Adding a new push subscription",
    skip(body, store),
    fields(request_id = %Uuid::new_v4())
)]
pub async fn subscribe(
    body: Json<SubscribeBody>,
    store: &State<SubscriptionStore>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let new_subscription: NewSubscription =
        body.into_inner().try_into().map_err(ApiError::ValidationError)?;
    if store.add(new_subscription, Utc::now()).await? {
        tracing::info!("New subscription saved");
    }
    Ok(Json(SuccessResponse {
        success: true,
        message: "Subscription saved successfully",
    }))
}

#[post("/unsubscribe", data = "<body>")]
#[tracing::instrument(
    name = "Removing a push subscription",
    skip(body, store),
    fields(request_id = %Uuid::new_v4())
)]
pub async fn unsubscribe(
    body: Json<UnsubscribeBody>,
    store: &State<SubscriptionStore>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let endpoint = body
        .into_inner()
        .endpoint
        .ok_or_else(|| ApiError::ValidationError("Endpoint is required".to_string()))?;
    let endpoint = PushEndpoint::parse(endpoint).map_err(ApiError::ValidationError)?;
    if store.remove(endpoint.as_ref()).await? {
        tracing::info!("Subscription removed");
    }
    Ok(Json(SuccessResponse {
        success: true,
        message: "Unsubscribed successfully",
    }))
}
