use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use crate::allocator::IdAllocator;
use crate::cache::{SideCache, product_key};
use crate::codec::VariantCodec;
use crate::config::StoreConfig;
use crate::cursor::PageCursor;
use crate::deadline::{effective_deadline, with_deadline};
use crate::error::{ProductError, ProductResult};
use crate::models::{ListProducts, Product, ProductInput, ProductPage};
use crate::repository::{ListQuery, ProductChanges, ProductRecord, ProductRepository};

/// Product persistence: id allocation, variant encoding and paging on top of
/// a [`ProductRepository`].
///
/// The database work of every call runs under [`StoreConfig::call_timeout`].
/// Side-cache writes come after it under their own
/// [`StoreConfig::cache_timeout`] and never change the answer. Repository
/// failures never escape raw; each one becomes a [`ProductError`].
pub struct ProductStore<R: ProductRepository, A: IdAllocator> {
    repository: Arc<R>,
    allocator: Arc<A>,
    cache: Arc<dyn SideCache>,
    config: StoreConfig,
}

impl<R: ProductRepository, A: IdAllocator> Clone for ProductStore<R, A> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            allocator: self.allocator.clone(),
            cache: self.cache.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R: ProductRepository, A: IdAllocator> ProductStore<R, A> {
    /// `allocator` must already be initialized.
    pub fn new(
        repository: R,
        allocator: A,
        cache: Arc<dyn SideCache>,
        config: StoreConfig,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            allocator: Arc::new(allocator),
            cache,
            config,
        }
    }

    /// A handle whose database deadline is the tighter of `requested` and
    /// the configured call timeout.
    pub fn bounded_by(&self, requested: Option<Duration>) -> Self {
        let mut bounded = self.clone();
        bounded.config.call_timeout = effective_deadline(requested, self.config.call_timeout);
        bounded
    }

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create(&self, input: ProductInput) -> ProductResult<Product> {
        let product = with_deadline(self.config.call_timeout, "create_product", async {
            if input.variant.is_none() {
                return Err(ProductError::invalid("invalid product variation type"));
            }

            let id = self
                .allocator
                .allocate()
                .map_err(|e| ProductError::internal(format!("failed to generate product id: {e}")))?;

            let changes = changes_from(id, input)?;
            let record = self.repository.insert(changes).await.map_err(|e| {
                error!(product_id = id, error = %e, "Insert failed");
                ProductError::internal(format!("failed to create product: {e}"))
            })?;

            decode_record(record)
        })
        .await?;

        self.remember(&product).await;
        Ok(product)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get(&self, id: u64) -> ProductResult<Product> {
        require_id(id)?;

        with_deadline(self.config.call_timeout, "get_product", async {
            self.repository
                .find_by_id(id)
                .await
                .map_err(|e| ProductError::internal(format!("failed to get product: {e}")))?
                .ok_or(ProductError::NotFound(id))
                .and_then(decode_record)
        })
        .await
    }

    /// Replace every field of product `id`, including its variant.
    #[instrument(skip(self, input), fields(product_id = %id))]
    pub async fn update(&self, id: u64, input: ProductInput) -> ProductResult<Product> {
        require_id(id)?;

        let product = with_deadline(self.config.call_timeout, "update_product", async {
            let changes = changes_from(id, input)?;
            self.repository
                .update(changes)
                .await
                .map_err(|e| ProductError::internal(format!("failed to update product: {e}")))?
                .ok_or(ProductError::NotFound(id))
                .and_then(decode_record)
        })
        .await?;

        self.remember(&product).await;
        Ok(product)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: u64) -> ProductResult<bool> {
        require_id(id)?;

        with_deadline(self.config.call_timeout, "delete_product", async {
            match self.repository.delete(id).await {
                Ok(0) => Err(ProductError::NotFound(id)),
                Ok(_) => Ok(()),
                Err(delete_err) => {
                    warn!(error = %delete_err, "Delete failed, checking whether the product exists");
                    match self.repository.count_by_id(id).await {
                        Ok(0) => Err(ProductError::NotFound(id)),
                        Ok(_) => Err(ProductError::internal(format!(
                            "failed to delete product: {delete_err}"
                        ))),
                        Err(count_err) => Err(ProductError::internal(format!(
                            "failed to delete product: {delete_err} (existence check: {count_err})"
                        ))),
                    }
                }
            }
        })
        .await?;

        self.forget(id).await;
        Ok(true)
    }

    #[instrument(skip(self, params), fields(page_size = params.page_size))]
    pub async fn list(&self, params: ListProducts) -> ProductResult<ProductPage> {
        let page_size = self.config.effective_page_size(params.page_size);
        let cursor = PageCursor::decode(&params.page_token)?;
        let name_contains = params
            .search_term
            .map(|term| term.trim().to_string())
            .filter(|term| !term.is_empty());

        with_deadline(self.config.call_timeout, "list_products", async {
            let records = self
                .repository
                .list(ListQuery {
                    name_contains,
                    limit: page_size,
                    offset: cursor.offset(),
                })
                .await
                .map_err(|e| ProductError::internal(format!("failed to list products: {e}")))?;

            let next_page_token = cursor.next_token(records.len(), page_size);
            let products = records
                .into_iter()
                .map(decode_record)
                .collect::<ProductResult<Vec<_>>>()?;

            debug!(returned = products.len(), offset = cursor.offset(), "Listed products");
            Ok(ProductPage {
                products,
                next_page_token,
            })
        })
        .await
    }

    async fn remember(&self, product: &Product) {
        let value = match serde_json::to_vec(product) {
            Ok(value) => value,
            Err(e) => {
                warn!(product_id = product.id, error = %e, "Could not serialize product for cache");
                return;
            }
        };

        let key = product_key(product.id);
        let write = self.cache.set(&key, value, self.config.cache_ttl_secs);
        match tokio::time::timeout(self.config.cache_timeout, write).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(product_id = product.id, error = %e, "Cache write failed"),
            Err(_) => warn!(product_id = product.id, "Cache write timed out"),
        }
    }

    async fn forget(&self, id: u64) {
        let key = product_key(id);
        let delete = self.cache.delete(&key);
        match tokio::time::timeout(self.config.cache_timeout, delete).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(product_id = id, error = %e, "Cache delete failed"),
            Err(_) => warn!(product_id = id, "Cache delete timed out"),
        }
    }
}

/// Zero is the "unset" sentinel.
fn require_id(id: u64) -> ProductResult<()> {
    if id == 0 {
        return Err(ProductError::invalid("product id is required"));
    }
    Ok(())
}

fn changes_from(id: u64, input: ProductInput) -> ProductResult<ProductChanges> {
    let variation = VariantCodec::encode(&input.variant)
        .map_err(|e| ProductError::internal(format!("failed to encode variation: {e}")))?;

    Ok(ProductChanges {
        id,
        name: input.name,
        description: input.description,
        price: input.price,
        category: input.category,
        tags: input.tags,
        state: input.state,
        status: input.status,
        variation,
    })
}

fn decode_record(record: ProductRecord) -> ProductResult<Product> {
    let variant = VariantCodec::decode_column(record.variation.as_deref(), &record.category)
        .map_err(|e| {
            error!(product_id = record.id, error = %e, "Stored variation is unreadable");
            ProductError::internal("failed to decode variation")
        })?;

    Ok(Product {
        id: record.id,
        name: record.name,
        description: record.description,
        price: record.price,
        category: record.category,
        tags: record.tags,
        state: record.state,
        status: record.status,
        variant,
        created_at: record.created_at,
        updated_at: record.updated_at,
    })
}
