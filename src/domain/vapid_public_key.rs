/// Length of an uncompressed P-256 public point.
const UNCOMPRESSED_POINT_LENGTH: usize = 65;

/// The application server key a browser needs to bind a push subscription
/// to this server. Stored both in its URL-safe base64 form and decoded.
#[derive(Debug, Clone)]
pub struct VapidPublicKey {
    encoded: String,
    bytes: Vec<u8>,
}

impl VapidPublicKey {
    pub fn parse(s: String) -> Result<VapidPublicKey, String> {
        let unpadded = s.trim().trim_end_matches('=');
        if unpadded.is_empty() {
            return Err("VAPID public key is not configured.".to_string());
        }
        let bytes = base64::decode_config(unpadded, base64::URL_SAFE_NO_PAD)
            .map_err(|e| format!("VAPID public key is not URL-safe base64: {}", e))?;
        if bytes.len() != UNCOMPRESSED_POINT_LENGTH || bytes[0] != 0x04 {
            return Err(format!(
                "VAPID public key must be a {}-byte uncompressed P-256 point, got {} bytes",
                UNCOMPRESSED_POINT_LENGTH,
                bytes.len()
            ));
        }
        Ok(Self {
            encoded: unpadded.to_string(),
            bytes,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<str> for VapidPublicKey {
    fn as_ref(&self) -> &str {
        &self.encoded
    }
}
