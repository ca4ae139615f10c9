/// Unified error type for store access.
///
/// Wraps the driver errors so callers can match on a single enum and
/// translate it at their own boundary.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// PostgreSQL errors (SeaORM)
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    /// Redis errors
    #[cfg(feature = "redis")]
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Connection failed after retries
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Health check failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// A row came back with a shape the caller cannot use
    #[error("Unexpected row: {0}")]
    UnexpectedRow(String),
}

/// Result type alias for store operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
