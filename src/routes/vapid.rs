use crate::startup::ApiSettings;
use rocket::serde::json::Json;
use rocket::State;

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VapidKeyResponse {
    public_key: String,
}

#[get("/vapid-public-key")]
pub fn vapid_public_key(settings: &State<ApiSettings>) -> Json<VapidKeyResponse> {
    Json(VapidKeyResponse {
        public_key: settings.vapid_public_key.clone(),
    })
}
