use crate::routes::ErrorBody;
use rocket::serde::json::Json;
use rocket::Request;

pub const AVAILABLE_ENDPOINTS: [&str; 8] = [
    "GET  /api/health",
    "GET  /api/vapid-public-key",
    "POST /api/subscribe",
    "POST /api/unsubscribe",
    "GET  /api/admin/subscriptions (requires auth)",
    "POST /api/admin/send-test (requires auth)",
    "POST /api/trigger-new-year (requires auth)",
    "POST /api/admin/cleanup (requires auth)",
];

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiNotFound {
    success: bool,
    error: &'static str,
    available_endpoints: &'static [&'static str],
}

#[catch(404)]
pub fn api_not_found(req: &Request) -> Json<ApiNotFound> {
    tracing::info!(path = %req.uri(), "API route not found");
    Json(ApiNotFound {
        success: false,
        error: "API endpoint not found",
        available_endpoints: &AVAILABLE_ENDPOINTS,
    })
}

#[catch(404)]
pub fn resource_not_found(_req: &Request) -> Json<ErrorBody> {
    Json(ErrorBody::new("Not found"))
}
