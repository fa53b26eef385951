use crate::startup::ApiSettings;
use chrono::{DateTime, Utc};
use rocket::serde::json::Json;
use rocket::State;

#[derive(serde::Serialize)]
pub struct HealthResponse {
    success: bool,
    status: &'static str,
    timestamp: DateTime<Utc>,
    service: String,
}

#[get("/health")]
pub fn health_check(settings: &State<ApiSettings>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: "healthy",
        timestamp: Utc::now(),
        service: settings.service_name.clone(),
    })
}
