use thiserror::Error;

pub type GrpcResult<T> = Result<T, GrpcError>;

/// Errors raised while standing up a gRPC server
#[derive(Error, Debug)]
pub enum GrpcError {
    /// Host/port did not form a socket address
    #[error("Invalid bind address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// Transport failed to bind or serve
    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
}
