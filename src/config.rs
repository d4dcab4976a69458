use crate::phone::{parse_region, DEFAULT_REGION};
use crate::repository::DEFAULT_KEY_PREFIX;
use phonenumber::country::Id as CountryId;
use std::time::Duration;

/// Which key-value backend the service talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    /// Process-local store; data is lost on restart.
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub redis_url: String,
    pub store_backend: StoreBackend,
    pub port: u16,
    pub default_region: CountryId,
    pub key_prefix: String,
    pub backend_timeout: Duration,
    pub breaker_failure_threshold: u32,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379/0".to_string(),
            store_backend: StoreBackend::Redis,
            port: 8000,
            default_region: DEFAULT_REGION,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            backend_timeout: Duration::from_millis(2000),
            breaker_failure_threshold: 5,
            rate_limit_per_second: 10,
            rate_limit_burst: 20,
        }
    }
}

fn positive<T>(name: &str, raw: String) -> anyhow::Result<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let value: T = raw
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("{} must be a positive number", name))?;
    if value <= T::default() {
        anyhow::bail!("{} must be greater than zero", name);
    }
    Ok(value)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Unset or blank variables fall back to [`Config::default`].
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let config = Self {
            redis_url: match var("REDIS_URL") {
                Some(url) => {
                    if !url.starts_with("redis://") && !url.starts_with("rediss://") {
                        anyhow::bail!("REDIS_URL must start with redis:// or rediss://");
                    }
                    url
                }
                None => defaults.redis_url,
            },
            store_backend: match var("STORE_BACKEND").as_deref().map(str::trim) {
                None => defaults.store_backend,
                Some(b) if b.eq_ignore_ascii_case("redis") => StoreBackend::Redis,
                Some(b) if b.eq_ignore_ascii_case("memory") => StoreBackend::Memory,
                Some(other) => {
                    anyhow::bail!("STORE_BACKEND must be 'redis' or 'memory', got '{}'", other)
                }
            },
            port: match var("PORT") {
                Some(p) => p
                    .trim()
                    .parse()
                    .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
                None => defaults.port,
            },
            default_region: match var("DEFAULT_REGION") {
                Some(code) => parse_region(&code).ok_or_else(|| {
                    anyhow::anyhow!("DEFAULT_REGION must be an ISO 3166 alpha-2 code, got '{}'", code)
                })?,
                None => defaults.default_region,
            },
            key_prefix: match var("KEY_PREFIX") {
                Some(prefix) => {
                    if prefix.contains(':') {
                        anyhow::bail!("KEY_PREFIX cannot contain ':'");
                    }
                    prefix.trim().to_string()
                }
                None => defaults.key_prefix,
            },
            backend_timeout: match var("BACKEND_TIMEOUT_MS") {
                Some(ms) => Duration::from_millis(positive("BACKEND_TIMEOUT_MS", ms)?),
                None => defaults.backend_timeout,
            },
            breaker_failure_threshold: match var("BREAKER_FAILURE_THRESHOLD") {
                Some(n) => positive("BREAKER_FAILURE_THRESHOLD", n)?,
                None => defaults.breaker_failure_threshold,
            },
            rate_limit_per_second: match var("RATE_LIMIT_PER_SECOND") {
                Some(n) => positive("RATE_LIMIT_PER_SECOND", n)?,
                None => defaults.rate_limit_per_second,
            },
            rate_limit_burst: match var("RATE_LIMIT_BURST") {
                Some(n) => positive("RATE_LIMIT_BURST", n)?,
                None => defaults.rate_limit_burst,
            },
        };

        tracing::debug!("Store backend: {:?}", config.store_backend);
        if config.store_backend == StoreBackend::Redis {
            tracing::debug!(
                "Redis URL: {}...",
                config.redis_url.chars().take(20).collect::<String>()
            );
        }
        tracing::debug!("Default region: {:?}", config.default_region);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.redis_url, "redis://localhost:6379/0");
        assert_eq!(config.store_backend, StoreBackend::Redis);
        assert_eq!(config.port, 8000);
        assert_eq!(config.default_region, CountryId::RU);
        assert_eq!(config.key_prefix, "phone");
        assert_eq!(config.backend_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("STORE_BACKEND", "Memory"),
            ("PORT", "9090"),
            ("DEFAULT_REGION", "br"),
            ("KEY_PREFIX", "addr"),
            ("BACKEND_TIMEOUT_MS", "150"),
        ]))
        .unwrap();

        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.port, 9090);
        assert_eq!(config.default_region, CountryId::BR);
        assert_eq!(config.key_prefix, "addr");
        assert_eq!(config.backend_timeout, Duration::from_millis(150));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup(&[("PORT", "  "), ("KEY_PREFIX", "")])).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.key_prefix, "phone");
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(Config::from_lookup(lookup(&[("REDIS_URL", "http://localhost")])).is_err());
        assert!(Config::from_lookup(lookup(&[("STORE_BACKEND", "postgres")])).is_err());
        assert!(Config::from_lookup(lookup(&[("PORT", "70000")])).is_err());
        assert!(Config::from_lookup(lookup(&[("DEFAULT_REGION", "ZZZ")])).is_err());
        assert!(Config::from_lookup(lookup(&[("KEY_PREFIX", "a:b")])).is_err());
        assert!(Config::from_lookup(lookup(&[("BACKEND_TIMEOUT_MS", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("BREAKER_FAILURE_THRESHOLD", "-1")])).is_err());
    }
}
