//! Product Service - Business logic layer

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use mongodb::bson::oid::ObjectId;
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::{now, Product};
use crate::repository::ProductRepository;

/// Upper bound for a single store call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Product service providing business logic operations
///
/// Every repository call is bounded by the service timeout. A call that runs
/// past it fails with [`ProductError::Timeout`]; nothing is retried.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    timeout: Duration,
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T>(&self, call: impl Future<Output = ProductResult<T>>) -> ProductResult<T> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| ProductError::Timeout(self.timeout))?
    }

    /// List every product
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.bounded(self.repository.list()).await
    }

    /// Get a product by ID
    ///
    /// Store failures are reported as not found.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ObjectId) -> ProductResult<Product> {
        match self.bounded(self.repository.get_by_id(id)).await {
            Ok(Some(product)) => Ok(product),
            Ok(None) => Err(ProductError::NotFound),
            Err(e) => {
                tracing::warn!(%id, error = %e, "product lookup failed");
                Err(ProductError::NotFound)
            }
        }
    }

    /// Create a new product
    #[instrument(skip(self, product), fields(product_name = %product.name))]
    pub async fn create_product(&self, mut product: Product) -> ProductResult<Product> {
        product.prepare_for_insert(now());

        let id = self.bounded(self.repository.create(product.clone())).await?;
        product.id = Some(id);

        tracing::info!(%id, "product created");
        Ok(product)
    }

    /// Replace every field of an existing product
    ///
    /// The returned product is the submitted one with `id` set to `id` and a
    /// fresh `updated_at`; the stored document is not read back.
    #[instrument(skip(self, product))]
    pub async fn update_product(&self, id: ObjectId, mut product: Product) -> ProductResult<Product> {
        product.id = None;
        product.updated_at = now();

        let matched = self
            .bounded(self.repository.update(id, product.clone()))
            .await?;
        if !matched {
            return Err(ProductError::NotFound);
        }

        product.id = Some(id);
        Ok(product)
    }

    /// Delete a product
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ObjectId) -> ProductResult<()> {
        if !self.bounded(self.repository.delete(id)).await? {
            return Err(ProductError::NotFound);
        }

        tracing::info!(%id, "product deleted");
        Ok(())
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockProductRepository;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use mockall::predicate::*;

    fn widget() -> Product {
        Product {
            name: "Widget".to_string(),
            price: 9.99,
            stock: 5,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_equal_timestamps() {
        let id = ObjectId::new();
        let mut mock = MockProductRepository::new();
        mock.expect_create()
            .withf(|p| p.id.is_none() && p.created_at == p.updated_at && p.name == "Widget")
            .times(1)
            .returning(move |_| Ok(id));

        let service = ProductService::new(mock);
        let mut input = widget();
        input.id = Some(ObjectId::new());

        let created = service.create_product(input).await.unwrap();

        assert_eq!(created.id, Some(id));
        assert_eq!(created.created_at, created.updated_at);
        assert!(created.created_at > DateTime::<Utc>::UNIX_EPOCH);
    }

    #[tokio::test]
    async fn test_create_propagates_store_error() {
        let mut mock = MockProductRepository::new();
        mock.expect_create()
            .returning(|_| Err(ProductError::Database("write failed".into())));

        let service = ProductService::new(mock);
        let err = service.create_product(widget()).await.unwrap_err();

        assert!(matches!(err, ProductError::Database(msg) if msg == "write failed"));
    }

    #[tokio::test]
    async fn test_get_product_found() {
        let id = ObjectId::new();
        let mut mock = MockProductRepository::new();
        mock.expect_get_by_id()
            .with(eq(id))
            .times(1)
            .returning(move |_| {
                Ok(Some(Product {
                    id: Some(id),
                    ..widget()
                }))
            });

        let service = ProductService::new(mock);
        let product = service.get_product(id).await.unwrap();

        assert_eq!(product.id, Some(id));
        assert_eq!(product.name, "Widget");
    }

    #[tokio::test]
    async fn test_get_product_missing_is_not_found() {
        let mut mock = MockProductRepository::new();
        mock.expect_get_by_id().returning(|_| Ok(None));

        let service = ProductService::new(mock);
        let err = service.get_product(ObjectId::new()).await.unwrap_err();

        assert!(matches!(err, ProductError::NotFound));
    }

    #[tokio::test]
    async fn test_get_product_store_error_is_not_found() {
        let mut mock = MockProductRepository::new();
        mock.expect_get_by_id()
            .returning(|_| Err(ProductError::Database("decode failed".into())));

        let service = ProductService::new(mock);
        let err = service.get_product(ObjectId::new()).await.unwrap_err();

        assert!(matches!(err, ProductError::NotFound));
    }

    #[tokio::test]
    async fn test_list_products() {
        let mut mock = MockProductRepository::new();
        mock.expect_list()
            .times(1)
            .returning(|| Ok(vec![widget(), widget()]));

        let service = ProductService::new(mock);
        assert_eq!(service.list_products().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_products_store_error() {
        let mut mock = MockProductRepository::new();
        mock.expect_list()
            .returning(|| Err(ProductError::Database("connection reset".into())));

        let service = ProductService::new(mock);
        assert!(matches!(
            service.list_products().await,
            Err(ProductError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_update_forces_path_id_and_refreshes_updated_at() {
        let id = ObjectId::new();
        let created_at = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let mut mock = MockProductRepository::new();
        mock.expect_update()
            .withf(move |target, p| *target == id && p.id.is_none() && p.created_at == created_at)
            .times(1)
            .returning(|_, _| Ok(true));

        let service = ProductService::new(mock);
        let input = Product {
            id: Some(ObjectId::new()),
            name: "Gadget".to_string(),
            created_at,
            updated_at: created_at,
            ..Default::default()
        };

        let updated = service.update_product(id, input).await.unwrap();

        assert_eq!(updated.id, Some(id));
        assert_eq!(updated.name, "Gadget");
        assert_eq!(updated.created_at, created_at);
        assert!(updated.updated_at > created_at);
    }

    #[tokio::test]
    async fn test_update_unmatched_is_not_found() {
        let mut mock = MockProductRepository::new();
        mock.expect_update().returning(|_, _| Ok(false));

        let service = ProductService::new(mock);
        let err = service
            .update_product(ObjectId::new(), widget())
            .await
            .unwrap_err();

        assert!(matches!(err, ProductError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_product() {
        let id = ObjectId::new();
        let mut mock = MockProductRepository::new();
        mock.expect_delete()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(true));

        let service = ProductService::new(mock);
        assert!(service.delete_product(id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let mut mock = MockProductRepository::new();
        mock.expect_delete().returning(|_| Ok(false));

        let service = ProductService::new(mock);
        let err = service.delete_product(ObjectId::new()).await.unwrap_err();

        assert!(matches!(err, ProductError::NotFound));
    }

    struct SlowRepository;

    #[async_trait]
    impl ProductRepository for SlowRepository {
        async fn list(&self) -> ProductResult<Vec<Product>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec![])
        }

        async fn get_by_id(&self, _id: ObjectId) -> ProductResult<Option<Product>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(None)
        }

        async fn create(&self, _product: Product) -> ProductResult<ObjectId> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(ObjectId::new())
        }

        async fn update(&self, _id: ObjectId, _product: Product) -> ProductResult<bool> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(true)
        }

        async fn delete(&self, _id: ObjectId) -> ProductResult<bool> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_slow_store_calls_time_out() {
        let limit = Duration::from_millis(50);
        let service = ProductService::new(SlowRepository).with_timeout(limit);

        assert!(matches!(
            service.list_products().await,
            Err(ProductError::Timeout(d)) if d == limit
        ));
        assert!(matches!(
            service.create_product(widget()).await,
            Err(ProductError::Timeout(_))
        ));
        assert!(matches!(
            service.update_product(ObjectId::new(), widget()).await,
            Err(ProductError::Timeout(_))
        ));
        assert!(matches!(
            service.delete_product(ObjectId::new()).await,
            Err(ProductError::Timeout(_))
        ));
        // lookups fold the timeout into not found
        assert!(matches!(
            service.get_product(ObjectId::new()).await,
            Err(ProductError::NotFound)
        ));
    }

    #[test]
    fn test_default_timeout() {
        let service = ProductService::new(MockProductRepository::new());
        assert_eq!(service.timeout(), Duration::from_secs(10));
        assert_eq!(
            service.with_timeout(Duration::from_secs(3)).timeout(),
            Duration::from_secs(3)
        );
    }
}
