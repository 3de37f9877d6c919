//! MongoDB database connector and utilities
//!
//! Provides connection management and MongoDB-specific helpers.

mod config;
mod connector;
mod health;

pub use config::{DEFAULT_DATABASE, MongoConfig};
pub use connector::{MongoError, connect, connect_from_config, ping};
pub use health::{HealthStatus, check_health_detailed};

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Collection, Database};
