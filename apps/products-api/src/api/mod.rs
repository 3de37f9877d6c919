//! API routes module

pub mod health;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Routes mounted under `/api`
pub fn routes(state: &AppState) -> Router {
    Router::new().nest("/products", products::router(state))
}

/// Routes mounted at the root: service banner, liveness and readiness
pub fn top_level(state: &AppState) -> Router {
    health::router(state.mongo_client.clone(), state.config.app.clone())
}
