//! Opportunistic key/value side-cache.
//!
//! Writes are best-effort and nothing in the store reads the cache back to
//! answer a request.

use async_trait::async_trait;
use database::DatabaseResult;
use database::redis::ConnectionManager;
use redis::AsyncCommands;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SideCache: Send + Sync {
    async fn set(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> DatabaseResult<()>;

    /// `Ok(None)` on a miss.
    async fn get(&self, key: &str) -> DatabaseResult<Option<Vec<u8>>>;

    async fn delete(&self, key: &str) -> DatabaseResult<()>;
}

pub fn product_key(id: u64) -> String {
    format!("product:{id}")
}

/// Redis-backed cache using `SET EX` / `GET` / `DEL`.
#[derive(Clone)]
pub struct RedisSideCache {
    conn: ConnectionManager,
}

impl RedisSideCache {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl SideCache for RedisSideCache {
    async fn set(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> DatabaseResult<()> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> DatabaseResult<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        Ok(conn.get(key).await?)
    }

    async fn delete(&self, key: &str) -> DatabaseResult<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await?;
        Ok(())
    }
}

/// Used when no Redis is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSideCache;

#[async_trait]
impl SideCache for NoopSideCache {
    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl_secs: u64) -> DatabaseResult<()> {
        Ok(())
    }

    async fn get(&self, _key: &str) -> DatabaseResult<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn delete(&self, _key: &str) -> DatabaseResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_key() {
        assert_eq!(product_key(42), "product:42");
    }

    #[tokio::test]
    async fn test_noop_cache_always_misses() {
        let cache = NoopSideCache;
        cache.set("product:1", b"{}".to_vec(), 60).await.unwrap();
        assert_eq!(cache.get("product:1").await.unwrap(), None);
        cache.delete("product:1").await.unwrap();
    }
}
