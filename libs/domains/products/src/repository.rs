use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::DatabaseResult;

use crate::models::{ProductState, ProductStatus};

/// A `products` row with the variation still encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub tags: Vec<String>,
    pub state: ProductState,
    pub status: ProductStatus,
    pub variation: Option<Vec<u8>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values for an insert, or for a whole-row update keyed by `id`.
/// Timestamps are stamped by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductChanges {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub tags: Vec<String>,
    pub state: ProductState,
    pub status: ProductStatus,
    pub variation: Option<Vec<u8>>,
}

/// One page of `ORDER BY id ASC`, optionally filtered on `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Already trimmed; `None` means no filter
    pub name_contains: Option<String>,
    pub limit: u64,
    pub offset: u64,
}

/// Data access for products.
///
/// Not-found is reported through `Option`s and row counts, never as an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert and return the stored row.
    async fn insert(&self, changes: ProductChanges) -> DatabaseResult<ProductRecord>;

    async fn find_by_id(&self, id: u64) -> DatabaseResult<Option<ProductRecord>>;

    /// Overwrite every column except `created_at`. `None` when no row matched.
    async fn update(&self, changes: ProductChanges) -> DatabaseResult<Option<ProductRecord>>;

    /// Rows affected.
    async fn delete(&self, id: u64) -> DatabaseResult<u64>;

    async fn count_by_id(&self, id: u64) -> DatabaseResult<u64>;

    async fn list(&self, query: ListQuery) -> DatabaseResult<Vec<ProductRecord>>;
}
