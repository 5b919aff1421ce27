//! Run configuration and its resolution.
//!
//! Every setting has a fixed default so a bare invocation reproduces the
//! standard Netflix map. Explicit values win over environment variables,
//! which win over the defaults.

use crate::error::{IxMapError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// PeeringDB record of Netflix (AS2906); its page lists every exchange point.
pub const DEFAULT_URL: &str = "https://www.peeringdb.com/net/457";

/// Output file name, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "nf_ix_map.txt";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Desktop Chrome user-agent sent with the request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                                      AppleWebKit/537.36 (KHTML, like Gecko) \
                                      Chrome/115.0.0.0 Safari/537.36";

pub const ENV_URL: &str = "IXMAP_URL";
pub const ENV_OUTPUT: &str = "IXMAP_OUTPUT";
pub const ENV_TIMEOUT_SECS: &str = "IXMAP_TIMEOUT_SECS";

/// Settings for one fetch-parse-write cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Page to fetch.
    pub url: String,
    /// File that receives the map; fully replaced on success.
    pub output: PathBuf,
    /// Total request timeout.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Explicitly supplied values, typically from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub output: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl Config {
    /// Resolve a configuration from explicit overrides and the process
    /// environment, then validate it.
    pub fn resolve(overrides: Overrides) -> Result<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::resolve`] with a caller-supplied environment lookup.
    pub fn resolve_with<F>(overrides: Overrides, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let url = overrides
            .url
            .or_else(|| env(ENV_URL))
            .unwrap_or(defaults.url);

        let output = overrides
            .output
            .or_else(|| env(ENV_OUTPUT).map(PathBuf::from))
            .unwrap_or(defaults.output);

        let timeout = match overrides.timeout_secs {
            Some(secs) => Duration::from_secs(secs),
            None => match env(ENV_TIMEOUT_SECS) {
                Some(raw) => {
                    let secs = raw.trim().parse::<u64>().map_err(|_| {
                        IxMapError::Config(format!(
                            "{ENV_TIMEOUT_SECS} must be a whole number of seconds, got {raw:?}"
                        ))
                    })?;
                    Duration::from_secs(secs)
                }
                None => defaults.timeout,
            },
        };

        let user_agent = overrides.user_agent.unwrap_or(defaults.user_agent);

        let config = Config {
            url,
            output,
            timeout,
            user_agent,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the URL is an absolute http(s) URL and the timeout is non-zero.
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.url)
            .map_err(|e| IxMapError::Config(format!("invalid URL {:?}: {e}", self.url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(IxMapError::Config(format!(
                "unsupported URL scheme {:?} in {}",
                parsed.scheme(),
                self.url
            )));
        }
        if self.timeout.is_zero() {
            return Err(IxMapError::Config(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if self.output.as_os_str().is_empty() {
            return Err(IxMapError::Config("output path must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::resolve_with(Overrides::default(), env_from(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.url, DEFAULT_URL);
        assert_eq!(config.output, PathBuf::from("nf_ix_map.txt"));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_env_overrides_defaults() {
        let env = env_from(&[
            (ENV_URL, "https://example.net/net/1"),
            (ENV_OUTPUT, "/tmp/map.txt"),
            (ENV_TIMEOUT_SECS, "5"),
        ]);
        let config = Config::resolve_with(Overrides::default(), env).unwrap();
        assert_eq!(config.url, "https://example.net/net/1");
        assert_eq!(config.output, PathBuf::from("/tmp/map.txt"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_explicit_overrides_env() {
        let env = env_from(&[
            (ENV_URL, "https://from-env.example/"),
            (ENV_TIMEOUT_SECS, "5"),
        ]);
        let overrides = Overrides {
            url: Some("https://from-flag.example/".to_string()),
            timeout_secs: Some(12),
            ..Default::default()
        };
        let config = Config::resolve_with(overrides, env).unwrap();
        assert_eq!(config.url, "https://from-flag.example/");
        assert_eq!(config.timeout, Duration::from_secs(12));
    }

    #[test]
    fn test_bad_env_timeout_rejected() {
        let env = env_from(&[(ENV_TIMEOUT_SECS, "soon")]);
        let err = Config::resolve_with(Overrides::default(), env).unwrap_err();
        assert!(matches!(err, IxMapError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut config = Config::default();
        config.url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.url = "ftp://www.peeringdb.com/net/457".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = Config {
            timeout: Duration::ZERO,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(IxMapError::Config(_))));
    }
}
