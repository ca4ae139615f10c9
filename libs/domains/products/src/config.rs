use core_config::{ConfigError, FromEnv, env_parse, env_parse_optional};
use std::time::Duration;

/// Tunables for [`ProductStore`](crate::ProductStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Used when a list request asks for `<= 0` rows
    pub default_page_size: u64,
    pub max_page_size: u64,
    /// Bound on the database work of every store call. A tighter caller
    /// deadline narrows it, see [`ProductStore::bounded_by`](crate::ProductStore::bounded_by).
    pub call_timeout: Duration,
    pub cache_ttl_secs: u64,
    /// Separate bound on each side-cache write, applied after the database
    /// work has finished
    pub cache_timeout: Duration,
    /// `None` falls back to [`default_machine_id`](crate::allocator::default_machine_id)
    pub machine_id: Option<u16>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
            call_timeout: Duration::from_millis(5_000),
            cache_ttl_secs: 300,
            cache_timeout: Duration::from_millis(250),
            machine_id: None,
        }
    }
}

impl StoreConfig {
    /// Rows to fetch for a requested page size.
    pub fn effective_page_size(&self, requested: i32) -> u64 {
        if requested <= 0 {
            return self.default_page_size;
        }
        (requested as u64).min(self.max_page_size)
    }
}

/// Environment variables:
/// - `PRODUCTS_DEFAULT_PAGE_SIZE` (default: 10)
/// - `PRODUCTS_MAX_PAGE_SIZE` (default: 100)
/// - `PRODUCTS_CALL_TIMEOUT_MS` (default: 5000)
/// - `PRODUCTS_CACHE_TTL_SECS` (default: 300)
/// - `PRODUCTS_CACHE_TIMEOUT_MS` (default: 250)
/// - `PRODUCTS_MACHINE_ID` (optional)
impl FromEnv for StoreConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let max_page_size: u64 = env_parse("PRODUCTS_MAX_PAGE_SIZE", defaults.max_page_size)?;
        let default_page_size: u64 =
            env_parse("PRODUCTS_DEFAULT_PAGE_SIZE", defaults.default_page_size)?;

        if max_page_size == 0 || default_page_size == 0 {
            return Err(ConfigError::ParseError {
                key: "PRODUCTS_DEFAULT_PAGE_SIZE".to_string(),
                details: "page sizes must be positive".to_string(),
            });
        }

        Ok(Self {
            default_page_size: default_page_size.min(max_page_size),
            max_page_size,
            call_timeout: Duration::from_millis(env_parse(
                "PRODUCTS_CALL_TIMEOUT_MS",
                defaults.call_timeout.as_millis() as u64,
            )?),
            cache_ttl_secs: env_parse("PRODUCTS_CACHE_TTL_SECS", defaults.cache_ttl_secs)?,
            cache_timeout: Duration::from_millis(env_parse(
                "PRODUCTS_CACHE_TIMEOUT_MS",
                defaults.cache_timeout.as_millis() as u64,
            )?),
            machine_id: env_parse_optional("PRODUCTS_MACHINE_ID")?,
        })
    }
}
