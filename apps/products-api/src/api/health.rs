//! Service banner, liveness and readiness endpoints

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use axum_helpers::{health_router, run_health_checks, HealthCheckFuture};
use core_config::AppInfo;
use database::mongodb::check_health_detailed;
use mongodb::Client;
use serde_json::json;

pub const SERVICE_MESSAGE: &str = "Product service is running";

async fn root() -> impl IntoResponse {
    Json(json!({ "message": SERVICE_MESSAGE }))
}

async fn ready(State(client): State<Client>) -> impl IntoResponse {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "mongodb",
        Box::pin(async {
            let status = check_health_detailed(&client).await;
            tracing::debug!(response_time_ms = status.response_time_ms, "mongodb ping");
            if status.healthy {
                Ok(())
            } else {
                Err(status.message.unwrap_or_else(|| "ping failed".to_string()))
            }
        }),
    )];

    run_health_checks(checks).await
}

pub fn router(client: Client, app: AppInfo) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/ready", get(ready))
        .with_state(client)
        .merge(health_router(app))
}
