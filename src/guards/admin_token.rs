use anyhow::{anyhow, Context};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use secrecy::{ExposeSecret, Secret};
use subtle::ConstantTimeEq;

/// The shared secret admin requests are checked against, fixed at startup.
pub struct AdminCredentials {
    token: Secret<String>,
    configured: bool,
}

impl AdminCredentials {
    pub fn new(token: Secret<String>, configured: bool) -> Self {
        Self { token, configured }
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Length of an explicitly configured token, 0 for the default.
    pub fn configured_length(&self) -> usize {
        if self.configured {
            self.token.expose_secret().len()
        } else {
            0
        }
    }

    /// Constant-time in the token contents. Only the length can leak.
    fn verify(&self, candidate: &str) -> bool {
        bool::from(
            self.token
                .expose_secret()
                .as_bytes()
                .ct_eq(candidate.as_bytes()),
        )
    }
}

/// Why the last admin guard rejected this request, read back by the 401
/// catcher.
#[derive(Default)]
pub struct AuthFailure(pub Option<String>);

/// Proof that the request carried `Authorization: Bearer <admin token>`.
pub struct AdminToken {
    // prevents construction outside of this module
    _private: (),
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminToken {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match from_request_result(request) {
            Ok(token) => Outcome::Success(token),
            Err(e) => {
                tracing::warn!(error = %e, "Rejected admin request");
                request.local_cache(|| AuthFailure(Some(e.to_string())));
                Outcome::Error((Status::Unauthorized, e))
            }
        }
    }
}

fn from_request_result(request: &Request) -> Result<AdminToken, anyhow::Error> {
    let credentials = request
        .rocket()
        .state::<AdminCredentials>()
        .context("Admin credentials are not configured")?;

    let header_value = request
        .headers()
        .get_one("Authorization")
        .ok_or_else(|| anyhow!("Authorization header missing"))?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| anyhow!("Invalid admin token"))?;

    if !credentials.verify(token) {
        return Err(anyhow!("Invalid admin token"));
    }
    Ok(AdminToken { _private: () })
}
