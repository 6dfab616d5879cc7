//! Backend entry-point: wires REST endpoints and OpenAPI docs.

use actix_web::web;
use std::env;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{self, MongoUserRepository};
use backend::server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let mut config = ServerConfig::from_env()?;

    match env::var("MONGODB_URI") {
        Ok(uri) => {
            let name = env::var("MONGODB_DB").unwrap_or_else(|_| "alumni_network".into());
            let database = persistence::connect(&uri, &name)
                .await
                .map_err(|e| std::io::Error::other(format!("database connection failed: {e}")))?;
            MongoUserRepository::new(&database)
                .ensure_indexes()
                .await
                .map_err(|e| std::io::Error::other(format!("index creation failed: {e}")))?;
            config = config.with_database(database);
        }
        Err(_) => {
            warn!("MONGODB_URI is not set; falling back to in-memory stores (dev only)");
        }
    }

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
