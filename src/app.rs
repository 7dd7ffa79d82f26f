use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{get, HttpResponse, Responder};
use actix_web::{web, App, HttpServer};

use sqlx::SqlitePool;

use tracing_actix_web::TracingLogger;

use crate::client::{CatalogClient, EmailClient};
use crate::controller::{accounts, favorites, notifications};
use crate::crypto::SigningKey;

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health_check")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().finish()
}

/// Run the application on a specified TCP listener
pub fn run(
    listener: TcpListener,
    pool: SqlitePool,
    signing_key: SigningKey,
    email_client: EmailClient,
    catalog_client: CatalogClient,
) -> anyhow::Result<Server> {
    // Wrap application data
    let pool = web::Data::new(pool);
    let signing_key = web::Data::new(signing_key);
    let email_client = web::Data::new(email_client);
    let catalog_client = web::Data::new(catalog_client);

    // Start the server
    // NOTE: The account scope shares the /api/users prefix with the more
    // specific scopes, so those must be registered first
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(pool.clone())
            .app_data(signing_key.clone())
            .app_data(email_client.clone())
            .app_data(catalog_client.clone())
            .service(health_check)
            .service(notifications::scope())
            .service(favorites::scope())
            .service(accounts::scope())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
