use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Product not found: {0}")]
    NotFound(u64),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Deadline exceeded: {0}")]
    Timeout(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ProductError::InvalidArgument(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ProductError::Internal(msg.into())
    }
}

impl From<ProductError> for tonic::Status {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::InvalidArgument(msg) => tonic::Status::invalid_argument(msg),
            ProductError::NotFound(_) => tonic::Status::not_found("product not found"),
            ProductError::Internal(msg) => tonic::Status::internal(msg),
            ProductError::Timeout(msg) => tonic::Status::deadline_exceeded(msg),
        }
    }
}
