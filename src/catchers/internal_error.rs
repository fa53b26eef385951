use crate::routes::ErrorBody;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::Request;

#[catch(500)]
pub fn internal_server_error(_req: &Request) -> Json<ErrorBody> {
    Json(ErrorBody::new("Internal server error"))
}

#[catch(default)]
pub fn default_catcher(status: Status, _req: &Request) -> Json<ErrorBody> {
    Json(ErrorBody::new(status.reason().unwrap_or("Unexpected error")))
}
