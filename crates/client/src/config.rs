use std::time::Duration;

use vidgen_core::generation::DEFAULT_POLL_INTERVAL_MS;

/// Default base URL of the generation backend.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Default per-request transport timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash.
    pub api_url: String,
    /// Bearer token forwarded on every request, if set.
    pub api_token: Option<String>,
    /// Transport timeout applied to each HTTP request.
    pub request_timeout_secs: u64,
    /// Delay between status queries.
    pub poll_interval_ms: u64,
}

/// Invalid configuration value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl ClientConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default                     |
    /// |------------------------|-----------------------------|
    /// | `VIDGEN_API_URL`       | `http://localhost:3000/api` |
    /// | `VIDGEN_API_TOKEN`     | unset                       |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                        |
    /// | `POLL_INTERVAL_MS`     | `2000`                      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("VIDGEN_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_url);

        let api_token = lookup("VIDGEN_API_TOKEN")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let request_timeout_secs = parse_positive(
            "REQUEST_TIMEOUT_SECS",
            lookup("REQUEST_TIMEOUT_SECS"),
            defaults.request_timeout_secs,
        )?;

        let poll_interval_ms = parse_positive(
            "POLL_INTERVAL_MS",
            lookup("POLL_INTERVAL_MS"),
            defaults.poll_interval_ms,
        )?;

        Ok(Self {
            api_url,
            api_token,
            request_timeout_secs,
            poll_interval_ms,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn parse_positive(
    name: &'static str,
    raw: Option<String>,
    default: u64,
) -> Result<u64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => match value.trim().parse::<u64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::InvalidNumber { name, value }),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.poll_interval(), Duration::from_millis(2_000));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn overrides_are_applied() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("VIDGEN_API_URL", "https://api.example.com/v1/"),
            ("VIDGEN_API_TOKEN", "secret"),
            ("REQUEST_TIMEOUT_SECS", "10"),
            ("POLL_INTERVAL_MS", "500"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://api.example.com/v1");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.poll_interval_ms, 500);
    }

    #[test]
    fn blank_token_is_ignored() {
        let config = ClientConfig::from_lookup(lookup_from(&[("VIDGEN_API_TOKEN", "  ")])).unwrap();
        assert!(config.api_token.is_none());
    }

    #[test]
    fn zero_or_garbage_numbers_are_rejected() {
        assert!(ClientConfig::from_lookup(lookup_from(&[("POLL_INTERVAL_MS", "0")])).is_err());
        assert!(ClientConfig::from_lookup(lookup_from(&[("REQUEST_TIMEOUT_SECS", "soon")])).is_err());
    }
}
