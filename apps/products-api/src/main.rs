//! Products API - REST server

use axum_helpers::server::{create_production_app, create_router};
use core_config::load_dotenv;
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    // Before reading config, so the file can supply it
    let dotenv = load_dotenv();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    match dotenv {
        Ok(Some(path)) => info!("Loaded environment from {}", path.display()),
        Ok(None) => info!("No .env file found"),
        Err(e) => warn!("Ignoring unreadable .env file: {}", e),
    }

    info!("Connecting to MongoDB at {}", config.mongodb.redacted_url());

    let mongo_client = database::mongodb::connect_from_config(&config.mongodb).await?;
    let db = mongo_client.database(config.mongodb.database());

    info!(
        "Successfully connected to MongoDB database: {}",
        config.mongodb.database()
    );

    let state = AppState {
        config: config.clone(),
        mongo_client,
        db,
    };

    let router = create_router::<openapi::ApiDoc>(api::routes(&state), api::top_level(&state));

    info!(
        "Starting Products API on port {} (collection: {}, store timeout: {:?})",
        state.config.server.port, state.config.collection, state.config.store_timeout
    );

    let mongo_client = state.mongo_client.clone();
    create_production_app(
        router,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing MongoDB connections");
            mongo_client.shutdown().await;
            info!("MongoDB connection closed");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Products API shutdown complete");
    Ok(())
}
