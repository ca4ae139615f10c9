use std::future::Future;
use std::time::Duration;

use crate::error::{ProductError, ProductResult};

/// Run `fut` under `limit`. Expiry drops the future and reports
/// [`ProductError::Timeout`] naming `operation`.
pub async fn with_deadline<T, F>(
    limit: Duration,
    operation: &'static str,
    fut: F,
) -> ProductResult<T>
where
    F: Future<Output = ProductResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, timeout_ms = limit.as_millis() as u64, "Deadline exceeded");
            Err(ProductError::Timeout(format!(
                "{operation} did not finish within {}ms",
                limit.as_millis()
            )))
        }
    }
}

/// The tighter of the caller's deadline and the configured default.
pub fn effective_deadline(requested: Option<Duration>, default: Duration) -> Duration {
    requested.map_or(default, |requested| requested.min(default))
}
