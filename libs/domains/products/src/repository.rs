use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::ProductResult;
use crate::models::Product;

/// Repository trait for Product persistence
///
/// Implementations perform exactly one store round-trip per call. Time limits
/// are applied by the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products, in store order
    async fn list(&self) -> ProductResult<Vec<Product>>;

    /// Get a product by ID
    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>>;

    /// Insert a product and return the id the store assigned
    async fn create(&self, product: Product) -> ProductResult<ObjectId>;

    /// Overwrite every field of the product with `id`.
    ///
    /// Returns `false` when no product matched.
    async fn update(&self, id: ObjectId, product: Product) -> ProductResult<bool>;

    /// Delete a product by ID. Returns `false` when nothing was deleted.
    async fn delete(&self, id: ObjectId) -> ProductResult<bool>;
}
