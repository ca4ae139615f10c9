//! Products Domain
//!
//! Persistence for catalog products whose category-specific payload is a
//! tagged [`ProductVariant`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ ProductStore │  ← id allocation, validation, paging, deadlines
//! └──────┬───────┘
//!        │         ┌──────────────┐ ┌─────────────┐ ┌────────────┐
//!        ├────────►│ IdAllocator  │ │ VariantCodec│ │ PageCursor │
//!        │         └──────────────┘ └─────────────┘ └────────────┘
//! ┌──────▼────────────┐
//! │ ProductRepository │  ← data access (trait + PostgreSQL implementation)
//! └───────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_products::{
//!     IdAllocator, NoopSideCache, PgProductRepository, ProductStore, SonyflakeAllocator,
//!     StoreConfig,
//! };
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://...").await?;
//!
//! let allocator = SonyflakeAllocator::new(1);
//! allocator.initialize()?;
//!
//! let store = ProductStore::new(
//!     PgProductRepository::new(db),
//!     allocator,
//!     Arc::new(NoopSideCache),
//!     StoreConfig::default(),
//! );
//! # Ok(())
//! # }
//! ```

pub mod allocator;
pub mod cache;
pub mod codec;
pub mod config;
pub mod conversions;
pub mod cursor;
pub mod deadline;
pub mod error;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod store;

pub use allocator::{AllocatorError, IdAllocator, SonyflakeAllocator};
pub use cache::{NoopSideCache, RedisSideCache, SideCache};
pub use codec::{CodecError, VariantCodec};
pub use config::StoreConfig;
pub use cursor::PageCursor;
pub use error::{ProductError, ProductResult};
pub use models::{
    ClothingVariant, ElectronicsVariant, FoodVariant, ListProducts, Product, ProductInput,
    ProductPage, ProductState, ProductStatus, ProductVariant,
};
pub use postgres::PgProductRepository;
pub use repository::{ListQuery, ProductChanges, ProductRecord, ProductRepository};
pub use store::ProductStore;
