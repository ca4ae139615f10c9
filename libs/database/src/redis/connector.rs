use redis::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use super::RedisConfig;
use crate::common::{DatabaseError, RetryConfig, retry_with_backoff};

/// Open a `ConnectionManager` and verify it with `PING`.
///
/// The manager reconnects on its own after the first successful handshake.
pub async fn connect(url: &str) -> redis::RedisResult<ConnectionManager> {
    let client = Client::open(url)?;
    let manager = ConnectionManager::new(client).await?;

    ping(&manager).await?;

    info!("Connected to Redis");
    Ok(manager)
}

pub async fn connect_from_config_with_retry(
    config: RedisConfig,
    retry_config: Option<RetryConfig>,
) -> redis::RedisResult<ConnectionManager> {
    let url = config.url;
    retry_with_backoff(|| connect(&url), retry_config.unwrap_or_default()).await
}

/// `PING` through a clone of the manager.
pub async fn check_health(manager: &ConnectionManager) -> Result<(), DatabaseError> {
    ping(manager)
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(format!("Redis PING failed: {}", e)))
}

async fn ping(manager: &ConnectionManager) -> redis::RedisResult<()> {
    let mut conn = manager.clone();
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_malformed_url() {
        assert!(connect("not a redis url").await.is_err());
    }
}
