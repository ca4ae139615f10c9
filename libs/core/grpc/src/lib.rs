//! # gRPC plumbing
//!
//! Shared pieces for the service binaries:
//!
//! - [`server`]: environment-driven `ServerConfig`, health reporting, startup
//!   logging and graceful shutdown
//! - [`deadline`]: reads the caller's `grpc-timeout` header
//! - [`conversions`]: `DateTime<Utc>` ↔ `google.protobuf.Timestamp`
//! - [`error`]: `GrpcError` for server setup failures
//!
//! ## Quick Start
//!
//! ```ignore
//! use grpc_client::server::{GrpcServer, ServerConfig};
//! use core_config::FromEnv;
//!
//! let config = ServerConfig::from_env()?;
//! let (mut health_reporter, health_service) = grpc_client::server::create_health_service();
//! GrpcServer::setup_health(&mut health_reporter, SERVICE_NAME).await;
//! GrpcServer::log_startup(&config, SERVICE_NAME);
//! ```

pub mod conversions;
pub mod deadline;
pub mod error;
pub mod server;

pub use deadline::request_deadline;
pub use error::{GrpcError, GrpcResult};
