//! Lenient JSON body extractor.

use crate::errors::AppError;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

/// JSON body extractor that ignores `Content-Type`.
///
/// Unlike `axum::Json`, any body is parsed as JSON and every failure
/// (unreadable body, syntax error, wrong shape) is rejected with
/// `400 Bad Request` carrying the parser's error text.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::post;
/// use axum_helpers::extractors::JsonBody;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct CreateItem {
///     name: String,
/// }
///
/// async fn create_item(JsonBody(payload): JsonBody<CreateItem>) -> String {
///     format!("Creating item: {}", payload.name)
/// }
///
/// let app = Router::new().route("/items", post(create_item));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| AppError::BadRequest(e.to_string()))
    }
}
