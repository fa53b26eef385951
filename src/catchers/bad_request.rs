use crate::routes::ErrorBody;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::Request;

#[catch(400)]
pub fn malformed_body(_req: &Request) -> Json<ErrorBody> {
    Json(ErrorBody::new("Malformed request body"))
}

/// Bodies that are valid JSON of the wrong shape are still a client error.
#[catch(422)]
pub fn unprocessable_entity_to_bad_request(_req: &Request) -> (Status, Json<ErrorBody>) {
    (
        Status::BadRequest,
        Json(ErrorBody::new("Malformed request body")),
    )
}
