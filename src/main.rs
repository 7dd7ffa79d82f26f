use std::net::TcpListener;

use anyhow::Context;

use sqlx::sqlite::SqlitePoolOptions;

use nextair::app;
use nextair::client::{CatalogClient, EmailClient};
use nextair::crypto::SigningKey;
use nextair::settings::Settings;
use nextair::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = telemetry::create_subscriber("info".into(), std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    let settings = Settings::load().expect("Failed to load settings");

    let pool = SqlitePoolOptions::new()
        .connect_with(settings.database.connect_options())
        .await
        .context("Failed to connect to the database")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let signing_key = SigningKey::new(settings.app.secret_key())?;

    let email_client = EmailClient::new(
        settings.email.sender(),
        settings.email.api_timeout(),
        settings.email.api_base_url(),
        settings.email.api_auth_token(),
    )?;

    let catalog_client = CatalogClient::new(
        settings.catalog.api_timeout(),
        settings.catalog.api_base_url(),
        settings.catalog.api_key(),
    )?;

    let listener = TcpListener::bind(settings.app.addr())?;

    app::run(listener, pool, signing_key, email_client, catalog_client)?
        .await
        .context("Failed to run app")
}
