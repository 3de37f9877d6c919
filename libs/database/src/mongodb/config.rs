#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse};

/// Database used when none is configured.
pub const DEFAULT_DATABASE: &str = "ecommerce";

/// MongoDB database configuration
///
/// This struct holds MongoDB connection settings.
/// It can be constructed manually or loaded from environment variables (with `config` feature).
///
/// # Example
///
/// ```ignore
/// use database::mongodb::MongoConfig;
///
/// // Manual construction
/// let config = MongoConfig::new("mongodb://localhost:27017");
///
/// // With database name
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "mydb");
///
/// // From environment variables (requires `config` feature)
/// let config = MongoConfig::from_env()?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// MongoDB connection URL (required)
    /// Format: mongodb://[username:password@]host[:port][/database][?options]
    pub url: String,

    /// Database name to use
    pub database: String,

    /// Optional application name for server logs
    pub app_name: Option<String>,

    /// Maximum number of connections in the pool
    pub max_pool_size: u32,

    /// Minimum number of connections in the pool
    pub min_pool_size: u32,

    /// Bound on connecting and the startup ping, in seconds
    pub connect_timeout_secs: u64,

    /// Server selection timeout in seconds
    pub server_selection_timeout_secs: u64,
}

impl MongoConfig {
    /// Create a new MongoConfig with just a URL and the default database
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_database(url, DEFAULT_DATABASE)
    }

    /// Create a MongoConfig with a specific database name
    pub fn with_database(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            app_name: None,
            max_pool_size: 100,
            min_pool_size: 5,
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 10,
        }
    }

    /// Set the application name for server logs
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    /// Set the connect/ping timeout
    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Get a reference to the MongoDB URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the database name
    pub fn database(&self) -> &str {
        &self.database
    }

    /// The URL with any `user:password@` credentials masked, for logging.
    pub fn redacted_url(&self) -> String {
        let Some((scheme, rest)) = self.url.split_once("://") else {
            return self.url.clone();
        };
        match rest.rsplit_once('@') {
            Some((_, host)) => format!("{}://***@{}", scheme, host),
            None => self.url.clone(),
        }
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self::new("mongodb://localhost:27017")
    }
}

/// Load MongoConfig from environment variables
///
/// Environment variables:
/// - `MONGO_URI`, `MONGODB_URL` or `MONGO_URL` (required) - MongoDB connection string
/// - `MONGO_DATABASE` or `MONGODB_DATABASE` (optional, default: `ecommerce`)
/// - `MONGODB_APP_NAME` (optional) - Application name for server logs
/// - `MONGODB_MAX_POOL_SIZE` (optional, default: 100)
/// - `MONGODB_MIN_POOL_SIZE` (optional, default: 5)
/// - `MONGO_CONNECT_TIMEOUT_SECS` (optional, default: 10)
/// - `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (optional, default: 10)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var("MONGO_URI")
            .or_else(|_| std::env::var("MONGODB_URL"))
            .or_else(|_| std::env::var("MONGO_URL"))
            .map_err(|_| ConfigError::MissingEnvVar("MONGO_URI".to_string()))?;

        let database = std::env::var("MONGO_DATABASE")
            .or_else(|_| std::env::var("MONGODB_DATABASE"))
            .unwrap_or_else(|_| DEFAULT_DATABASE.to_string());

        let app_name = std::env::var("MONGODB_APP_NAME").ok();

        Ok(Self {
            url,
            database,
            app_name,
            max_pool_size: env_parse("MONGODB_MAX_POOL_SIZE", 100)?,
            min_pool_size: env_parse("MONGODB_MIN_POOL_SIZE", 5)?,
            connect_timeout_secs: env_parse("MONGO_CONNECT_TIMEOUT_SECS", 10)?,
            server_selection_timeout_secs: env_parse("MONGODB_SERVER_SELECTION_TIMEOUT_SECS", 10)?,
        })
    }
}
