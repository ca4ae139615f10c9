//! Server configuration loaded from environment variables.

use core_config::{ConfigError, FromEnv, env_or_default, env_parse};
use std::net::SocketAddr;

use crate::error::{GrpcError, GrpcResult};

/// Configuration for the gRPC listener.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (default: [::1])
    pub host: String,
    /// Port to listen on (default: 50051)
    pub port: u16,
    /// Zstd request/response compression (default: true)
    pub enable_compression: bool,
    pub max_decoding_message_size: usize,
    pub max_encoding_message_size: usize,
}

const DEFAULT_MAX_MESSAGE_SIZE: usize = 4 * 1024 * 1024;

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "[::1]".to_string(),
            port: 50051,
            enable_compression: true,
            max_decoding_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            max_encoding_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_compression(mut self, enable: bool) -> Self {
        self.enable_compression = enable;
        self
    }

    pub fn with_max_message_size(mut self, size: usize) -> Self {
        self.max_decoding_message_size = size;
        self.max_encoding_message_size = size;
        self
    }

    pub fn socket_addr(&self) -> GrpcResult<SocketAddr> {
        let addr = self.addr_string();
        addr.parse()
            .map_err(|source| GrpcError::InvalidAddress { addr, source })
    }

    pub fn addr_string(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Reads:
/// - `GRPC_HOST` (default: [::1])
/// - `GRPC_PORT` (default: 50051)
/// - `GRPC_COMPRESSION` (default: true; `false`/`0` disables)
/// - `GRPC_MAX_MESSAGE_SIZE` (default: 4MB)
impl FromEnv for ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let compression = env_or_default("GRPC_COMPRESSION", "true");
        let max_message_size = env_parse("GRPC_MAX_MESSAGE_SIZE", DEFAULT_MAX_MESSAGE_SIZE)?;

        Ok(Self {
            host: env_or_default("GRPC_HOST", &defaults.host),
            port: env_parse("GRPC_PORT", defaults.port)?,
            enable_compression: compression != "false" && compression != "0",
            max_decoding_message_size: max_message_size,
            max_encoding_message_size: max_message_size,
        })
    }
}
