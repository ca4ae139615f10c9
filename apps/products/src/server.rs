//! gRPC server initialization and lifecycle management
//!
//! This module handles all server setup:
//! - Tracing initialization
//! - Database connection and health check
//! - Optional Redis side-cache
//! - Id allocator initialization
//! - gRPC server configuration, startup and graceful shutdown
//! - Health check service (grpc.health.v1.Health)

use std::sync::Arc;

use core_config::{ConfigError, Environment, FromEnv};
use database::postgres::PostgresConfig;
use database::redis::RedisConfig;
use domain_products::allocator::default_machine_id;
use domain_products::{
    IdAllocator, NoopSideCache, PgProductRepository, ProductStore, RedisSideCache, SideCache,
    SonyflakeAllocator, StoreConfig,
};
use eyre::{Result, WrapErr};
use grpc_client::server::{GrpcServer, ServerConfig, create_health_service};
use rpc::products::product_service_server::ProductServiceServer;
use tonic::codec::CompressionEncoding;
use tonic::transport::Server;
use tracing::{info, warn};

use crate::service::ProductServiceImpl;

pub const SERVICE_NAME: &str = "products.v1.ProductService";

/// Run the gRPC server
///
/// 1. Sets up structured logging (env-aware: JSON for prod, pretty for dev)
/// 2. Connects to the database with retry logic and checks it answers
/// 3. Connects to Redis when configured, otherwise caches nothing
/// 4. Initializes the id allocator and builds the store
/// 5. Serves until Ctrl-C, then drains
///
/// # Errors
///
/// Returns an error if configuration is invalid, the database is unreachable,
/// the allocator cannot start, or the server fails to bind.
pub async fn run() -> Result<()> {
    let environment = Environment::from_env();
    core_config::tracing::init_tracing(&environment);

    let server_config = ServerConfig::from_env().wrap_err("Failed to load server configuration")?;
    let store_config = StoreConfig::from_env().wrap_err("Failed to load store configuration")?;
    let pg_config = PostgresConfig::from_env().wrap_err("Failed to load database configuration")?;

    info!("Connecting to database...");
    let db = database::postgres::connect_from_config_with_retry(pg_config, None)
        .await
        .wrap_err("Failed to connect to database")?;
    database::postgres::check_health(&db)
        .await
        .wrap_err("Database health check failed")?;
    info!("Connected to database successfully");

    let cache = connect_cache().await?;

    let machine_id = store_config.machine_id.unwrap_or_else(default_machine_id);
    let allocator = SonyflakeAllocator::new(machine_id);
    allocator
        .initialize()
        .wrap_err("Failed to initialize id allocator")?;

    let store = ProductStore::new(PgProductRepository::new(db), allocator, cache, store_config);
    let product_service = ProductServiceImpl::new(store);

    let mut product_server = ProductServiceServer::new(product_service)
        .max_decoding_message_size(server_config.max_decoding_message_size)
        .max_encoding_message_size(server_config.max_encoding_message_size);
    if server_config.enable_compression {
        // zstd for requests and responses
        product_server = product_server
            .accept_compressed(CompressionEncoding::Zstd)
            .send_compressed(CompressionEncoding::Zstd);
    }

    let (mut health_reporter, health_service) = create_health_service();
    GrpcServer::setup_health(&mut health_reporter, SERVICE_NAME).await;

    let addr = server_config
        .socket_addr()
        .wrap_err("Failed to parse server address")?;
    GrpcServer::log_startup(&server_config, SERVICE_NAME);

    Server::builder()
        .add_service(health_service)
        .add_service(product_server)
        .serve_with_shutdown(addr, GrpcServer::shutdown_signal())
        .await
        .wrap_err("gRPC server failed")?;

    GrpcServer::mark_not_serving(&mut health_reporter, SERVICE_NAME).await;
    info!("ProductService stopped");
    Ok(())
}

/// Redis side-cache if `REDIS_URL`/`REDIS_HOST` is set, a no-op cache otherwise.
async fn connect_cache() -> Result<Arc<dyn SideCache>> {
    let config = match RedisConfig::from_env() {
        Ok(config) => config,
        Err(ConfigError::MissingEnvVar(_)) => {
            info!("Redis not configured, side-cache disabled");
            return Ok(Arc::new(NoopSideCache));
        }
        Err(e) => return Err(e).wrap_err("Failed to load Redis configuration"),
    };

    match database::redis::connect_from_config_with_retry(config, None).await {
        Ok(manager) => {
            info!("Side-cache enabled (Redis)");
            Ok(Arc::new(RedisSideCache::new(manager)))
        }
        Err(e) => {
            // The cache is never authoritative; run without it.
            warn!(error = %e, "Redis unreachable, side-cache disabled");
            Ok(Arc::new(NoopSideCache))
        }
    }
}
