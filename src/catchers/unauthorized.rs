use crate::guards::AuthFailure;
use crate::routes::ErrorBody;
use rocket::http::Header;
use rocket::serde::json::Json;
use rocket::Request;

#[catch(401)]
pub fn unauthorized_request_credentials(req: &Request) -> RequestBearerAuth {
    let message = req
        .local_cache(AuthFailure::default)
        .0
        .clone()
        .unwrap_or_else(|| "Unauthorized".to_string());
    RequestBearerAuth::new(message)
}

struct RequestBearerAuthHeader;

impl<'h> From<RequestBearerAuthHeader> for Header<'h> {
    fn from(_: RequestBearerAuthHeader) -> Self {
        Header::new("WWW-Authenticate", r#"Bearer realm="admin""#)
    }
}

#[derive(Responder)]
#[response(status = 401)]
pub struct RequestBearerAuth {
    inner: Json<ErrorBody>,
    bearer_auth: RequestBearerAuthHeader,
}

impl RequestBearerAuth {
    fn new(message: String) -> RequestBearerAuth {
        RequestBearerAuth {
            inner: Json(ErrorBody::new(message)),
            bearer_auth: RequestBearerAuthHeader,
        }
    }
}
