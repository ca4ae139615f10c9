//! Products gRPC Service
//!
//! ## Architecture
//!
//! ```text
//! Client
//!   ↓ (gRPC with Zstd compression, optional grpc-timeout)
//! ProductServiceImpl (service.rs)
//!   ↓ (proto ↔ domain conversions from domain_products::conversions)
//! ProductStore (domain layer)
//!   ↓ (id allocation, variant codec, paging)
//! PgProductRepository (persistence)   RedisSideCache (best-effort)
//!   ↓                                   ↓
//! PostgreSQL                          Redis
//! ```
//!
//! ## Modules
//!
//! - `server`: Server initialization and lifecycle
//! - `service`: gRPC service implementation (ProductServiceImpl)

pub mod server;
pub mod service;

pub use server::run;
pub use service::ProductServiceImpl;
