use axum::http::Method;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

/// Creates a CORS layer that admits browser clients from any origin.
///
/// - Origin: mirrored from the request (a literal `*` cannot be combined with credentials)
/// - Methods: GET, POST, PUT, DELETE, OPTIONS
/// - Headers: mirrored from `Access-Control-Request-Headers`
/// - Credentials: allowed
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
