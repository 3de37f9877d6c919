//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, to_document, Document},
    Collection, Database,
};
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductDocument};
use crate::repository::ProductRepository;

pub const DEFAULT_COLLECTION: &str = "products";

/// Selects a single product by its `_id`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductFilter {
    id: ObjectId,
}

impl ProductFilter {
    pub fn by_id(id: ObjectId) -> Self {
        Self { id }
    }

    pub fn into_document(self) -> Document {
        doc! { "_id": self.id }
    }
}

/// Full-document `$set` update.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    fields: Document,
}

impl ProductUpdate {
    /// Build a `$set` of every stored field. `_id` is never part of the update.
    pub fn set(document: ProductDocument) -> ProductResult<Self> {
        let fields = to_document(&ProductDocument {
            id: None,
            ..document
        })?;
        Ok(Self { fields })
    }

    pub fn into_document(self) -> Document {
        doc! { "$set": self.fields }
    }
}

/// MongoDB implementation of the ProductRepository
pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    /// Create a new MongoProductRepository on the `products` collection
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, DEFAULT_COLLECTION)
    }

    /// Create a new MongoProductRepository with a custom collection name
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<ProductDocument>(collection_name);
        Self { collection }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> ProductResult<Vec<Product>> {
        let cursor = self.collection.find(doc! {}).await?;
        let documents: Vec<ProductDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>> {
        let document = self
            .collection
            .find_one(ProductFilter::by_id(id).into_document())
            .await?;
        Ok(document.map(Product::from))
    }

    #[instrument(skip(self, product), fields(product_name = %product.name))]
    async fn create(&self, product: Product) -> ProductResult<ObjectId> {
        let result = self
            .collection
            .insert_one(ProductDocument::from(product))
            .await?;

        result.inserted_id.as_object_id().ok_or_else(|| {
            ProductError::Internal(format!(
                "store returned a non-ObjectId id: {}",
                result.inserted_id
            ))
        })
    }

    #[instrument(skip(self, product))]
    async fn update(&self, id: ObjectId, product: Product) -> ProductResult<bool> {
        let update = ProductUpdate::set(ProductDocument::from(product))?;
        let result = self
            .collection
            .update_one(
                ProductFilter::by_id(id).into_document(),
                update.into_document(),
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> ProductResult<bool> {
        let result = self
            .collection
            .delete_one(ProductFilter::by_id(id).into_document())
            .await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{now, zero_time};

    #[test]
    fn test_filter_by_id() {
        let id = ObjectId::new();
        let filter = ProductFilter::by_id(id).into_document();
        assert_eq!(filter, doc! { "_id": id });
    }

    #[test]
    fn test_update_sets_every_field_but_id() {
        let at = now();
        let product = Product {
            id: Some(ObjectId::new()),
            name: "Widget".to_string(),
            price: 9.99,
            stock: 5,
            created_at: at,
            updated_at: at,
            ..Default::default()
        };

        let update = ProductUpdate::set(ProductDocument::from(product))
            .unwrap()
            .into_document();
        let set = update.get_document("$set").unwrap();

        assert!(!set.contains_key("_id"));
        for field in [
            "name",
            "description",
            "price",
            "stock",
            "category",
            "image_url",
            "created_at",
            "updated_at",
        ] {
            assert!(set.contains_key(field), "missing {field}");
        }
        assert_eq!(set.get_str("name").unwrap(), "Widget");
        assert_eq!(set.get_i64("stock").unwrap(), 5);
    }

    #[test]
    fn test_update_keeps_zero_values() {
        let update = ProductUpdate::set(ProductDocument::from(Product::default()))
            .unwrap()
            .into_document();
        let set = update.get_document("$set").unwrap();

        assert_eq!(set.get_str("name").unwrap(), "");
        assert_eq!(set.get_f64("price").unwrap(), 0.0);
        assert_eq!(
            set.get_datetime("created_at").unwrap().timestamp_millis(),
            zero_time().timestamp_millis()
        );
    }
}
