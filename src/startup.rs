use crate::catchers::*;
use crate::configuration::Settings;
use crate::cors::{self, Cors};
use crate::guards::AdminCredentials;
use crate::port_saver;
use crate::port_saver::Port;
use crate::push::PushDeliverer;
use crate::routes::*;
use crate::store::SubscriptionStore;
use rocket::config::LogLevel;
use rocket::{Config, Ignite, Rocket};
use std::sync::Arc;

/// Request-independent values the handlers read, fixed at startup.
pub struct ApiSettings {
    pub service_name: String,
    pub vapid_public_key: String,
    pub retention_months: u32,
    pub recent_window: chrono::Duration,
    pub delivery_attempts: u32,
}

impl ApiSettings {
    fn from_settings(configuration: &Settings) -> Self {
        let notifications = &configuration.notifications;
        Self {
            service_name: configuration.application.service_name.clone(),
            vapid_public_key: notifications.vapid_public_key.clone(),
            retention_months: notifications.retention_months,
            recent_window: chrono::Duration::days(i64::from(notifications.recent_window_days)),
            delivery_attempts: notifications.delivery_attempts.max(1),
        }
    }
}

pub struct Application {
    pub server: Rocket<Ignite>,
    pub port: Port,
}

impl Application {
    pub async fn build(
        configuration: &Settings,
        deliverer: Arc<dyn PushDeliverer>,
    ) -> Result<Application, anyhow::Error> {
        let store = SubscriptionStore::open(&configuration.storage.subscriptions_file).await?;

        let (token, configured) = configuration.notifications.admin_token();
        let credentials = AdminCredentials::new(token, configured);
        if let Err(e) = configuration.notifications.vapid_public_key() {
            tracing::warn!(error = %e, "Configured VAPID public key is not usable by browsers");
        }

        let mut api_routes = routes![
            health_check,
            vapid_public_key,
            subscribe,
            unsubscribe,
            list_subscriptions,
            send_test,
            trigger_new_year,
            cleanup,
            cors::preflight
        ];
        if configuration.application.expose_debug_endpoints {
            api_routes.extend(routes![debug_token]);
        }

        let (port_saver, port) = port_saver::create_pair();
        let server = rocket::custom(Config {
            address: configuration.application.host,
            port: configuration.application.port.unwrap_or(0),
            log_level: LogLevel::Off,
            ..Config::default()
        })
        .attach(port_saver)
        .attach(Cors::new(configuration.application.allowed_origin.clone()))
        .manage(store)
        .manage(deliverer)
        .manage(credentials)
        .manage(ApiSettings::from_settings(configuration))
        .mount("/api", api_routes)
        .register(
            "/api",
            catchers![
                api_not_found,
                unauthorized_request_credentials,
                malformed_body,
                unprocessable_entity_to_bad_request,
                internal_server_error
            ],
        )
        .register(
            "/",
            catchers![
                resource_not_found,
                unauthorized_request_credentials,
                malformed_body,
                unprocessable_entity_to_bad_request,
                internal_server_error,
                default_catcher
            ],
        )
        .ignite()
        .await?;

        Ok(Application { server, port })
    }
}
