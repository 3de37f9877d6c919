use mongodb::{Client, bson::doc, options::ClientOptions};
use std::time::Duration;
use tracing::info;

use super::MongoConfig;

/// Error type for MongoDB operations
#[derive(Debug, thiserror::Error)]
pub enum MongoError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Connection timed out after {0:?}")]
    Timeout(Duration),
}

/// Connect to MongoDB with default settings and verify the connection with a ping.
///
/// # Example
/// ```ignore
/// use database::mongodb::connect;
///
/// let client = connect("mongodb://localhost:27017").await?;
/// let db = client.database("mydb");
/// ```
pub async fn connect(url: &str) -> Result<Client, MongoError> {
    connect_from_config(&MongoConfig::new(url)).await
}

/// Connect using a MongoConfig
///
/// Parsing the URI, building the client and the `ping` round trip are bounded
/// together by `connect_timeout_secs`. Fails on the first error; there is no retry.
///
/// # Example
/// ```ignore
/// use database::mongodb::{MongoConfig, connect_from_config};
/// use core_config::FromEnv;
///
/// let config = MongoConfig::from_env()?;
/// let client = connect_from_config(&config).await?;
/// ```
pub async fn connect_from_config(config: &MongoConfig) -> Result<Client, MongoError> {
    let timeout = Duration::from_secs(config.connect_timeout_secs);
    info!("Attempting to connect to MongoDB at {}", config.redacted_url());

    let client = tokio::time::timeout(timeout, async {
        let mut options = ClientOptions::parse(&config.url).await?;

        options.max_pool_size = Some(config.max_pool_size);
        options.min_pool_size = Some(config.min_pool_size);
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout =
            Some(Duration::from_secs(config.server_selection_timeout_secs));

        if let Some(ref app_name) = config.app_name {
            options.app_name = Some(app_name.clone());
        }

        let client = Client::with_options(options)?;
        ping(&client)
            .await
            .map_err(|e| MongoError::ConnectionFailed(e.to_string()))?;

        Ok::<_, MongoError>(client)
    })
    .await
    .map_err(|_| MongoError::Timeout(timeout))??;

    info!("Successfully connected to MongoDB");
    Ok(client)
}

/// Run the `ping` admin command.
pub async fn ping(client: &Client) -> Result<(), mongodb::error::Error> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;
    Ok(())
}
