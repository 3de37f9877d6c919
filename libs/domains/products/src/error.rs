use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use mongodb::bson::oid;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Invalid product ID: {0}")]
    InvalidId(#[from] oid::Error),

    #[error("{0}")]
    InvalidBody(String),

    #[error("Product not found")]
    NotFound,

    #[error("{0}")]
    Database(String),

    #[error("Database operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        let message = err.to_string();
        match err {
            ProductError::InvalidId(_) | ProductError::InvalidBody(_) => {
                AppError::BadRequest(message)
            }
            ProductError::NotFound => AppError::NotFound(message),
            ProductError::Database(_) | ProductError::Timeout(_) | ProductError::Internal(_) => {
                AppError::InternalServerError(message)
            }
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for ProductError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_invalid_id_message_carries_parse_error() {
        let err: ProductError = ObjectId::parse_str("not-an-id").unwrap_err().into();
        let message = err.to_string();
        assert!(message.starts_with("Invalid product ID: "));
        assert!(message.len() > "Invalid product ID: ".len());
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ProductError::InvalidBody("EOF".into()), StatusCode::BAD_REQUEST),
            (ProductError::NotFound, StatusCode::NOT_FOUND),
            (ProductError::Database("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ProductError::Timeout(Duration::from_secs(10)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_not_found_and_database_messages_are_raw() {
        assert_eq!(ProductError::NotFound.to_string(), "Product not found");
        assert_eq!(
            ProductError::Database("connection refused".into()).to_string(),
            "connection refused"
        );
    }
}
