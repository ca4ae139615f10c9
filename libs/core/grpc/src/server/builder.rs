//! gRPC server lifecycle helpers.

use super::config::ServerConfig;
use tracing::{info, warn};

/// Health reporting and startup logging shared by service binaries.
///
/// ```ignore
/// let (mut health_reporter, health_service) = create_health_service();
/// GrpcServer::setup_health(&mut health_reporter, SERVICE_NAME).await;
/// GrpcServer::log_startup(&config, SERVICE_NAME);
///
/// Server::builder()
///     .add_service(health_service)
///     .add_service(ProductServiceServer::new(service))
///     .serve_with_shutdown(config.socket_addr()?, GrpcServer::shutdown_signal())
///     .await?;
/// ```
pub struct GrpcServer;

impl GrpcServer {
    pub fn log_startup(config: &ServerConfig, service_name: &str) {
        info!(
            addr = %config.addr_string(),
            service = service_name,
            compression = config.enable_compression,
            max_message_size = config.max_decoding_message_size,
            "gRPC server starting"
        );
    }

    /// Mark `service_name` and the empty service name as serving.
    ///
    /// The empty name is what k8s gRPC probes ask for by default.
    pub async fn setup_health(
        health_reporter: &mut tonic_health::server::HealthReporter,
        service_name: &str,
    ) {
        for name in [service_name, ""] {
            health_reporter
                .set_service_status(name, tonic_health::ServingStatus::Serving)
                .await;
        }
        info!(service = service_name, "Health service marked as serving");
    }

    /// Flip every reported service to NOT_SERVING ahead of shutdown.
    pub async fn mark_not_serving(
        health_reporter: &mut tonic_health::server::HealthReporter,
        service_name: &str,
    ) {
        for name in [service_name, ""] {
            health_reporter
                .set_service_status(name, tonic_health::ServingStatus::NotServing)
                .await;
        }
    }

    /// Resolves on Ctrl-C (or immediately if the signal handler cannot be installed).
    pub async fn shutdown_signal() {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => warn!(error = %e, "Failed to listen for shutdown signal"),
        }
    }
}

pub use tonic_health::server::health_reporter as create_health_service;
