use festive_notifications::configuration::get_configuration;
use festive_notifications::push::RecordOnlyDeliverer;
use festive_notifications::startup::Application;
use festive_notifications::telemetry::{get_subscriber, init_subscriber};
use std::sync::Arc;

#[rocket::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber(
        "festive-notifications".into(),
        "info".into(),
        std::io::stdout,
    );
    init_subscriber(subscriber)?;

    let configuration = get_configuration()?;
    let application =
        Application::build(&configuration, Arc::new(RecordOnlyDeliverer::default())).await?;
    application.server.launch().await?;
    Ok(())
}
