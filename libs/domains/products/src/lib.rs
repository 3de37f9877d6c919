//! Products Domain
//!
//! CRUD over a single MongoDB collection of products.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, id and body parsing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Timestamps, per-call timeout, not-found mapping
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Wire and stored product shapes
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{
//!     handlers,
//!     mongodb::MongoProductRepository,
//!     service::ProductService,
//! };
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("ecommerce");
//!
//! let repository = MongoProductRepository::new(&db);
//! let service = ProductService::new(repository);
//!
//! // Mount under /api/products
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{Product, ProductDocument};
pub use mongodb::{MongoProductRepository, ProductFilter, ProductUpdate};
pub use repository::ProductRepository;
pub use service::{ProductService, DEFAULT_STORE_TIMEOUT};
