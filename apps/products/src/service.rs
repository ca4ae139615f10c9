//! Products gRPC service implementation
//!
//! Handlers stay minimal: proto ↔ domain conversions live in
//! `domain_products::conversions` and `ProductError` maps onto `tonic::Status`.

use domain_products::conversions as conv;
use domain_products::{IdAllocator, ProductInput, ProductRepository, ProductStore};
use grpc_client::request_deadline;
use rpc::products::{
    CreateProductRequest, CreateProductResponse, DeleteProductRequest, DeleteProductResponse,
    GetProductRequest, GetProductResponse, ListProductsRequest, ListProductsResponse,
    UpdateProductRequest, UpdateProductResponse, product_service_server::ProductService,
};
use tonic::{Request, Response, Status};
use tracing::info;

/// gRPC service implementation for products
///
/// Generic over the repository and allocator for testability.
pub struct ProductServiceImpl<R, A>
where
    R: ProductRepository + 'static,
    A: IdAllocator + 'static,
{
    store: ProductStore<R, A>,
}

impl<R, A> ProductServiceImpl<R, A>
where
    R: ProductRepository + 'static,
    A: IdAllocator + 'static,
{
    pub fn new(store: ProductStore<R, A>) -> Self {
        Self { store }
    }
}

#[tonic::async_trait]
impl<R, A> ProductService for ProductServiceImpl<R, A>
where
    R: ProductRepository + 'static,
    A: IdAllocator + 'static,
{
    async fn create_product(
        &self,
        request: Request<CreateProductRequest>,
    ) -> Result<Response<CreateProductResponse>, Status> {
        let deadline = request_deadline(request.metadata());
        let input: ProductInput = request.into_inner().try_into()?;
        let product = self.store.bounded_by(deadline).create(input).await?;
        info!(product_id = product.id, "Created product");
        Ok(Response::new(CreateProductResponse {
            product: Some(product.into()),
        }))
    }

    async fn get_product(
        &self,
        request: Request<GetProductRequest>,
    ) -> Result<Response<GetProductResponse>, Status> {
        let deadline = request_deadline(request.metadata());
        let id = request.into_inner().id;
        let product = self.store.bounded_by(deadline).get(id).await?;
        Ok(Response::new(GetProductResponse {
            product: Some(product.into()),
        }))
    }

    async fn update_product(
        &self,
        request: Request<UpdateProductRequest>,
    ) -> Result<Response<UpdateProductResponse>, Status> {
        let deadline = request_deadline(request.metadata());
        let (id, input) = conv::update_from_proto(request.into_inner())?;
        let product = self.store.bounded_by(deadline).update(id, input).await?;
        Ok(Response::new(UpdateProductResponse {
            product: Some(product.into()),
        }))
    }

    async fn delete_product(
        &self,
        request: Request<DeleteProductRequest>,
    ) -> Result<Response<DeleteProductResponse>, Status> {
        let deadline = request_deadline(request.metadata());
        let id = request.into_inner().product_id;
        let deleted = self.store.bounded_by(deadline).delete(id).await?;
        info!(product_id = id, "Deleted product");
        Ok(Response::new(DeleteProductResponse { deleted }))
    }

    async fn list_products(
        &self,
        request: Request<ListProductsRequest>,
    ) -> Result<Response<ListProductsResponse>, Status> {
        let deadline = request_deadline(request.metadata());
        let params = request.into_inner().into();
        let page = self.store.bounded_by(deadline).list(params).await?;
        Ok(Response::new(page.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use database::DatabaseResult;
    use domain_products::{
        AllocatorError, ListQuery, NoopSideCache, ProductChanges, ProductRecord, SideCache,
        StoreConfig,
    };
    use rpc::products::{FoodVariation, ProductState, ProductStatus, Variation};
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// In-memory repository for testing
    #[derive(Clone, Default)]
    struct MemoryProductRepository {
        products: Arc<Mutex<BTreeMap<u64, ProductRecord>>>,
        stalled: bool,
    }

    impl MemoryProductRepository {
        fn stalled() -> Self {
            Self {
                stalled: true,
                ..Self::default()
            }
        }

        async fn stall_if_configured(&self) {
            if self.stalled {
                std::future::pending::<()>().await;
            }
        }
    }

    #[async_trait]
    impl ProductRepository for MemoryProductRepository {
        async fn insert(&self, changes: ProductChanges) -> DatabaseResult<ProductRecord> {
            self.stall_if_configured().await;
            let now = Utc::now();
            let record = ProductRecord {
                id: changes.id,
                name: changes.name,
                description: changes.description,
                price: changes.price,
                category: changes.category,
                tags: changes.tags,
                state: changes.state,
                status: changes.status,
                variation: changes.variation,
                created_at: now,
                updated_at: now,
            };
            self.products.lock().unwrap().insert(record.id, record.clone());
            Ok(record)
        }

        async fn find_by_id(&self, id: u64) -> DatabaseResult<Option<ProductRecord>> {
            self.stall_if_configured().await;
            Ok(self.products.lock().unwrap().get(&id).cloned())
        }

        async fn update(&self, changes: ProductChanges) -> DatabaseResult<Option<ProductRecord>> {
            self.stall_if_configured().await;
            let mut products = self.products.lock().unwrap();
            let Some(record) = products.get_mut(&changes.id) else {
                return Ok(None);
            };
            record.name = changes.name;
            record.description = changes.description;
            record.price = changes.price;
            record.category = changes.category;
            record.tags = changes.tags;
            record.state = changes.state;
            record.status = changes.status;
            record.variation = changes.variation;
            record.updated_at = Utc::now().max(record.updated_at + chrono::Duration::microseconds(1));
            Ok(Some(record.clone()))
        }

        async fn delete(&self, id: u64) -> DatabaseResult<u64> {
            self.stall_if_configured().await;
            Ok(self.products.lock().unwrap().remove(&id).map_or(0, |_| 1))
        }

        async fn count_by_id(&self, id: u64) -> DatabaseResult<u64> {
            Ok(self.products.lock().unwrap().contains_key(&id) as u64)
        }

        async fn list(&self, query: ListQuery) -> DatabaseResult<Vec<ProductRecord>> {
            self.stall_if_configured().await;
            let needle = query.name_contains.map(|term| term.to_lowercase());
            Ok(self
                .products
                .lock()
                .unwrap()
                .values()
                .filter(|p| {
                    needle
                        .as_ref()
                        .is_none_or(|needle| p.name.to_lowercase().contains(needle))
                })
                .skip(query.offset as usize)
                .take(query.limit as usize)
                .cloned()
                .collect())
        }
    }

    /// Hands out 1, 2, 3, ...
    #[derive(Default)]
    struct SequentialAllocator {
        next: AtomicU64,
    }

    impl IdAllocator for SequentialAllocator {
        fn initialize(&self) -> Result<(), AllocatorError> {
            Ok(())
        }

        fn allocate(&self) -> Result<u64, AllocatorError> {
            Ok(self.next.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    /// Cache that never answers.
    struct HangingCache;

    #[async_trait]
    impl SideCache for HangingCache {
        async fn set(&self, _key: &str, _value: Vec<u8>, _ttl_secs: u64) -> DatabaseResult<()> {
            std::future::pending().await
        }

        async fn get(&self, _key: &str) -> DatabaseResult<Option<Vec<u8>>> {
            std::future::pending().await
        }

        async fn delete(&self, _key: &str) -> DatabaseResult<()> {
            std::future::pending().await
        }
    }

    fn create_test_service_with(
        repository: MemoryProductRepository,
        cache: Arc<dyn SideCache>,
    ) -> ProductServiceImpl<MemoryProductRepository, SequentialAllocator> {
        let store = ProductStore::new(
            repository,
            SequentialAllocator::default(),
            cache,
            StoreConfig::default(),
        );
        ProductServiceImpl::new(store)
    }

    fn create_test_service() -> ProductServiceImpl<MemoryProductRepository, SequentialAllocator> {
        create_test_service_with(MemoryProductRepository::default(), Arc::new(NoopSideCache))
    }

    fn create_request(name: &str) -> CreateProductRequest {
        CreateProductRequest {
            name: name.to_string(),
            description: "Fresh".to_string(),
            price: 3.5,
            category: "Food".to_string(),
            tags: vec!["bakery".to_string()],
            product_state: ProductState::Perishable as i32,
            product_status: ProductStatus::InStock as i32,
            variation: Some(Variation::Food(FoodVariation {
                ingredients: "Flour, Lemon".to_string(),
                calories: 320,
                is_vegetarian: true,
            })),
        }
    }

    async fn create(
        service: &ProductServiceImpl<MemoryProductRepository, SequentialAllocator>,
        name: &str,
    ) -> rpc::products::Product {
        service
            .create_product(Request::new(create_request(name)))
            .await
            .unwrap()
            .into_inner()
            .product
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_product() {
        let service = create_test_service();
        let created = create(&service, "Lemon Cake").await;

        assert_eq!(created.id, 1);
        assert!(created.created_at.is_some());

        let fetched = service
            .get_product(Request::new(GetProductRequest { id: created.id }))
            .await
            .unwrap()
            .into_inner()
            .product
            .unwrap();

        assert_eq!(fetched.name, "Lemon Cake");
        assert_eq!(fetched.product_state(), ProductState::Perishable);
        assert_eq!(fetched.variation, create_request("x").variation);
    }

    #[tokio::test]
    async fn test_create_without_variation_is_invalid() {
        let service = create_test_service();
        let request = CreateProductRequest {
            variation: None,
            ..create_request("Plain")
        };

        let err = service.create_product(Request::new(request)).await.unwrap_err();
        assert_eq!(err.code(), tonic::Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_create_with_invalid_status() {
        let service = create_test_service();
        let request = CreateProductRequest {
            product_status: 999,
            ..create_request("Odd")
        };

        let err = service.create_product(Request::new(request)).await.unwrap_err();
        assert_eq!(err.code(), tonic::Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_zero_id_is_invalid() {
        let service = create_test_service();

        let err = service
            .get_product(Request::new(GetProductRequest { id: 0 }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), tonic::Code::InvalidArgument);

        let err = service
            .update_product(Request::new(UpdateProductRequest::default()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), tonic::Code::InvalidArgument);

        let err = service
            .delete_product(Request::new(DeleteProductRequest { product_id: 0 }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), tonic::Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let service = create_test_service();

        let err = service
            .get_product(Request::new(GetProductRequest { id: 999_999_999 }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), tonic::Code::NotFound);
        assert_eq!(err.message(), "product not found");
    }

    #[tokio::test]
    async fn test_update_product_replaces_fields() {
        let service = create_test_service();
        let created = create(&service, "Lemon Cake").await;

        let updated = service
            .update_product(Request::new(UpdateProductRequest {
                id: created.id,
                name: "Lemon Drizzle".to_string(),
                price: 4.25,
                category: "Food".to_string(),
                product_status: ProductStatus::Discontinued as i32,
                ..Default::default()
            }))
            .await
            .unwrap()
            .into_inner()
            .product
            .unwrap();

        assert_eq!(updated.name, "Lemon Drizzle");
        assert!(updated.tags.is_empty());
        assert_eq!(updated.variation, None);
        assert_eq!(updated.product_status(), ProductStatus::Discontinued);
        assert_eq!(updated.created_at, created.created_at);
        let (before, after) = (created.updated_at.unwrap(), updated.updated_at.unwrap());
        assert!((after.seconds, after.nanos) > (before.seconds, before.nanos));
    }

    #[tokio::test]
    async fn test_delete_product_twice() {
        let service = create_test_service();
        let created = create(&service, "Cheese Sandwich").await;

        let response = service
            .delete_product(Request::new(DeleteProductRequest {
                product_id: created.id,
            }))
            .await
            .unwrap()
            .into_inner();
        assert!(response.deleted);

        let err = service
            .delete_product(Request::new(DeleteProductRequest {
                product_id: created.id,
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), tonic::Code::NotFound);
    }

    #[tokio::test]
    async fn test_list_products_pages() {
        let service = create_test_service();
        for i in 0..5 {
            create(&service, &format!("Product {i}")).await;
        }

        let mut token = String::new();
        let mut sizes = Vec::new();
        loop {
            let page = service
                .list_products(Request::new(ListProductsRequest {
                    page_size: 2,
                    page_token: token.clone(),
                    search_term: String::new(),
                }))
                .await
                .unwrap()
                .into_inner();
            sizes.push(page.products.len());
            if page.next_page_token.is_empty() {
                break;
            }
            token = page.next_page_token;
        }

        assert_eq!(sizes, vec![2, 2, 1]);
    }

    #[tokio::test]
    async fn test_list_products_search() {
        let service = create_test_service();
        create(&service, "Lemon Cake").await;
        create(&service, "Cheese Sandwich").await;

        let page = service
            .list_products(Request::new(ListProductsRequest {
                search_term: "cake".to_string(),
                ..Default::default()
            }))
            .await
            .unwrap()
            .into_inner();

        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].name, "Lemon Cake");
    }

    #[tokio::test]
    async fn test_list_products_bad_token() {
        let service = create_test_service();

        let err = service
            .list_products(Request::new(ListProductsRequest {
                page_token: "page-two".to_string(),
                ..Default::default()
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), tonic::Code::InvalidArgument);
    }

    #[tokio::test(start_paused = true)]
    async fn test_caller_deadline_is_honored() {
        let service = create_test_service_with(
            MemoryProductRepository::stalled(),
            Arc::new(NoopSideCache),
        );

        let mut request = Request::new(GetProductRequest { id: 1 });
        request
            .metadata_mut()
            .insert("grpc-timeout", "50m".parse().unwrap());

        let err = service.get_product(request).await.unwrap_err();
        assert_eq!(err.code(), tonic::Code::DeadlineExceeded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_cache_does_not_fail_committed_create() {
        let repository = MemoryProductRepository::default();
        let service = create_test_service_with(repository.clone(), Arc::new(HangingCache));

        let mut request = Request::new(create_request("Lemon Cake"));
        request
            .metadata_mut()
            .insert("grpc-timeout", "100m".parse().unwrap());

        let started = tokio::time::Instant::now();
        let created = service
            .create_product(request)
            .await
            .unwrap()
            .into_inner()
            .product
            .unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(repository.products.lock().unwrap().len(), 1);
        assert!(started.elapsed() <= StoreConfig::default().cache_timeout + Duration::from_millis(1));
    }
}
