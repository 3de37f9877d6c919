//! HTTP handlers for Products API

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::JsonBody;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{ProductError, ProductResult};
use crate::models::Product;
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(schemas(Product)),
    tags(
        (name = "Products", description = "Product management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

fn parse_id(raw: &str) -> ProductResult<ObjectId> {
    Ok(ObjectId::parse_str(raw)?)
}

/// List all products
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    responses(
        (status = 200, description = "List of products", body = Vec<Product>),
        (status = 500, description = "Store error", body = String, content_type = "text/plain")
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<Vec<Product>>> {
    let products = service.list_products().await?;
    Ok(Json(products))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = Product,
    responses(
        (status = 201, description = "Product created successfully", body = Product),
        (status = 400, description = "Unparseable body", body = String, content_type = "text/plain"),
        (status = 500, description = "Store error", body = String, content_type = "text/plain")
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    JsonBody(product): JsonBody<Product>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(product).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, description = "Invalid product ID", body = String, content_type = "text/plain"),
        (status = 404, description = "Product not found", body = String, content_type = "text/plain")
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
) -> ProductResult<Json<Product>> {
    let id = parse_id(&id)?;
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Replace a product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID (24 hex characters)")
    ),
    request_body = Product,
    responses(
        (status = 200, description = "Product updated successfully", body = Product),
        (status = 400, description = "Invalid product ID or body", body = String, content_type = "text/plain"),
        (status = 404, description = "Product not found", body = String, content_type = "text/plain"),
        (status = 500, description = "Store error", body = String, content_type = "text/plain")
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
    body: Result<JsonBody<Product>, axum_helpers::AppError>,
) -> ProductResult<Json<Product>> {
    // id errors win over body errors
    let id = parse_id(&id)?;
    let JsonBody(product) = body.map_err(|e| ProductError::InvalidBody(e.message().to_string()))?;
    let product = service.update_product(id, product).await?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product ID (24 hex characters)")
    ),
    responses(
        (status = 204, description = "Product deleted successfully"),
        (status = 400, description = "Invalid product ID", body = String, content_type = "text/plain"),
        (status = 404, description = "Product not found", body = String, content_type = "text/plain"),
        (status = 500, description = "Store error", body = String, content_type = "text/plain")
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(id): Path<String>,
) -> ProductResult<StatusCode> {
    let id = parse_id(&id)?;
    service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
