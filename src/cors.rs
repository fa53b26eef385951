use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::{Request, Response};

/// Lets the single configured front-end origin call the API with
/// credentials.
pub struct Cors {
    allowed_origin: String,
}

impl Cors {
    pub fn new(allowed_origin: String) -> Cors {
        Cors { allowed_origin }
    }
}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "CORS",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        match request.headers().get_one("Origin") {
            Some(origin) if origin == self.allowed_origin => {
                response.set_header(Header::new(
                    "Access-Control-Allow-Origin",
                    self.allowed_origin.clone(),
                ));
                response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
                response.set_header(Header::new(
                    "Access-Control-Allow-Methods",
                    "GET, POST, OPTIONS",
                ));
                response.set_header(Header::new(
                    "Access-Control-Allow-Headers",
                    "Content-Type, Authorization",
                ));
                response.set_header(Header::new("Vary", "Origin"));
            }
            _ => {}
        }
    }
}

#[options("/<_..>")]
pub fn preflight() -> Status {
    Status::NoContent
}
