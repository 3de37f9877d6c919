//! Products API routes

use axum::Router;
use domain_products::{handlers, MongoProductRepository, ProductService};

use crate::state::AppState;

/// Create products router
pub fn router(state: &AppState) -> Router {
    let repository = MongoProductRepository::with_collection(&state.db, &state.config.collection);
    let service = ProductService::new(repository).with_timeout(state.config.store_timeout);
    handlers::router(service)
}
