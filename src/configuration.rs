use crate::domain::VapidPublicKey;
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;
use serde_aux::field_attributes::deserialize_option_number_from_string;
use std::net::IpAddr;
use std::path::PathBuf;

/// Used when no admin token is configured. It is publicly known, so startup
/// warns whenever it is in effect.
pub const INSECURE_DEFAULT_ADMIN_TOKEN: &str = "test_admin_token_123";

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

#[derive(serde::Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub storage: StorageSettings,
    pub notifications: NotificationSettings,
}

#[derive(serde::Deserialize)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_option_number_from_string")]
    pub port: Option<u16>,
    pub host: IpAddr,
    pub service_name: String,
    pub allowed_origin: String,
    #[serde(default)]
    pub expose_debug_endpoints: bool,
}

#[derive(serde::Deserialize)]
pub struct StorageSettings {
    pub subscriptions_file: PathBuf,
}

#[derive(serde::Deserialize)]
pub struct NotificationSettings {
    #[serde(default)]
    pub admin_token: Option<Secret<String>>,
    pub vapid_public_key: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub retention_months: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub recent_window_days: u16,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub delivery_attempts: u32,
}

impl NotificationSettings {
    /// The configured admin token, or the insecure default with a warning.
    /// A blank value counts as not configured.
    pub fn admin_token(&self) -> (Secret<String>, bool) {
        match &self.admin_token {
            Some(token) if !token.expose_secret().trim().is_empty() => {
                (Secret::new(token.expose_secret().clone()), true)
            }
            _ => {
                tracing::warn!(
                    "No admin token configured (APP_NOTIFICATIONS__ADMIN_TOKEN). \
                    Falling back to the insecure default '{}'. \
                    Never run like this in production.",
                    INSECURE_DEFAULT_ADMIN_TOKEN
                );
                (Secret::new(INSECURE_DEFAULT_ADMIN_TOKEN.to_string()), false)
            }
        }
    }

    pub fn vapid_public_key(&self) -> Result<VapidPublicKey, String> {
        VapidPublicKey::parse(self.vapid_public_key.clone())
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either 'local' or 'production'.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;
    let configuration_directory = base_path.join("configuration");
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    let mut settings = config::Config::default();
    settings.merge(config::File::from(configuration_directory.join("base")).required(true))?;
    settings.merge(
        config::File::from(configuration_directory.join(environment.as_str())).required(true),
    )?;
    settings.merge(config::Environment::with_prefix("app").separator("__"))?;
    settings.try_into()
}
