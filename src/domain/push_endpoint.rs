const MAX_ENDPOINT_LENGTH: usize = 2048;

/// An opaque push delivery channel URL handed out by the browser's push
/// service. Only its presence and size are checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushEndpoint(String);

impl PushEndpoint {
    pub fn parse(s: String) -> Result<PushEndpoint, String> {
        if s.trim().is_empty() {
            return Err("Push endpoint must not be empty".to_string());
        }
        if s.chars().count() > MAX_ENDPOINT_LENGTH {
            return Err(format!(
                "Push endpoint exceeds {} characters",
                MAX_ENDPOINT_LENGTH
            ));
        }
        Ok(Self(s))
    }
}

impl AsRef<str> for PushEndpoint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<PushEndpoint> for String {
    fn from(endpoint: PushEndpoint) -> Self {
        endpoint.0
    }
}
