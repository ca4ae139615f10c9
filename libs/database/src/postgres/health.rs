use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use std::time::Instant;
use tracing::debug;

use crate::common::DatabaseError;

/// Run `SELECT 1` against the pool.
pub async fn check_health(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    check_health_with_query(db, "SELECT 1").await
}

/// Run a caller-supplied probe query, e.g. `SELECT 1 FROM products LIMIT 1`.
pub async fn check_health_with_query(
    db: &DatabaseConnection,
    query: &str,
) -> Result<(), DatabaseError> {
    let started = Instant::now();
    let stmt = Statement::from_string(DatabaseBackend::Postgres, query.to_owned());

    db.query_one_raw(stmt).await.map_err(|e| {
        DatabaseError::HealthCheckFailed(format!("PostgreSQL probe '{}' failed: {}", query, e))
    })?;

    debug!(
        query,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "PostgreSQL health check passed"
    );
    Ok(())
}
