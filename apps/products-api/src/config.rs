//! Configuration for Products API

use std::time::Duration;

use core_config::{app_info, env_or_default, env_parse, server::ServerConfig, AppInfo, FromEnv};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// `MONGO_COLLECTION`, default `products`
    pub collection: String,
    /// `STORE_TIMEOUT_SECS`, default 10
    pub store_timeout: Duration,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;

        let collection = env_or_default(
            "MONGO_COLLECTION",
            domain_products::mongodb::DEFAULT_COLLECTION,
        );
        let store_timeout = Duration::from_secs(env_parse(
            "STORE_TIMEOUT_SECS",
            domain_products::DEFAULT_STORE_TIMEOUT.as_secs(),
        )?);

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            environment,
            collection,
            store_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        temp_env::with_vars(
            [
                ("MONGO_URI", Some("mongodb://localhost:27017")),
                ("MONGODB_URL", None),
                ("MONGO_URL", None),
                ("MONGO_DATABASE", None),
                ("MONGODB_DATABASE", None),
                ("MONGO_COLLECTION", None),
                ("STORE_TIMEOUT_SECS", None),
                ("HOST", None),
                ("PORT", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.mongodb.database(), "ecommerce");
                assert_eq!(config.collection, "products");
                assert_eq!(config.store_timeout, Duration::from_secs(10));
                assert_eq!(config.server.port, 5001);
                assert_eq!(config.app.name, "products_api");
            },
        );
    }

    #[test]
    fn test_overrides() {
        temp_env::with_vars(
            [
                ("MONGO_URI", Some("mongodb://db:27017")),
                ("MONGO_DATABASE", Some("shop")),
                ("MONGO_COLLECTION", Some("items")),
                ("STORE_TIMEOUT_SECS", Some("3")),
                ("PORT", Some("8080")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.mongodb.url(), "mongodb://db:27017");
                assert_eq!(config.mongodb.database(), "shop");
                assert_eq!(config.collection, "items");
                assert_eq!(config.store_timeout, Duration::from_secs(3));
                assert_eq!(config.server.port, 8080);
            },
        );
    }

    #[test]
    fn test_missing_mongo_uri_fails() {
        temp_env::with_vars_unset(["MONGO_URI", "MONGODB_URL", "MONGO_URL"], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn test_bad_store_timeout_fails() {
        temp_env::with_vars(
            [
                ("MONGO_URI", Some("mongodb://localhost:27017")),
                ("STORE_TIMEOUT_SECS", Some("soon")),
            ],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }
}
