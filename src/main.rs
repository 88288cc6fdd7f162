use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::clock::SystemClock;
use crate::configuration::Configuration;
use crate::configuration_handler::ConfigurationHandler;
use crate::database_interface::DatabaseInterface;
use crate::http::create_app;
use crate::local_store::LocalStore;

mod availability;
mod backend;
mod clock;
mod configuration;
mod configuration_handler;
mod database_interface;
mod error;
mod http;
mod local_store;
mod schema;
#[cfg(test)]
mod testutils;
mod types;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let configuration = ConfigurationHandler::parse_arguments();

    let address = format!("0.0.0.0:{}", configuration.port());
    info!(%address, "starting barbershop scheduler");
    let listener = tokio::net::TcpListener::bind(&address).await.unwrap();

    let app = if let Some(database_url) = configuration.database_url() {
        let backend = loop {
            match DatabaseInterface::new(&database_url) {
                Ok(backend) => {
                    info!("connected to database");
                    break backend;
                }
                Err(err) => {
                    error!(?err, "database connection failed, retrying in 1 sec. Unset DATABASE_URL to run on the in-memory store.");
                    sleep(Duration::from_secs(1)).await;
                }
            }
        };
        create_app(backend, SystemClock, configuration)
    } else {
        let backend = LocalStore::default();
        backend.insert_example_shop();
        create_app(backend, SystemClock, configuration)
    };

    axum::serve(listener, app).await.unwrap();
}
