//! Chart client settings, read from `~/.config/chartfeed/config.toml`.
//!
//! Every key is optional. Keys this version does not know are logged and
//! skipped.
use crate::feed::{FailurePolicy, DEFAULT_BASE_URL};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use url::Url;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large (limit {0} bytes)")]
    TooLarge(u64),

    #[error("Invalid config value for '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the chart service; the request path is appended to it.
    pub base_url: String,

    /// Two-letter storefront country code.
    pub country: String,

    /// Extra attempts after a transient failure. 0 = no retry.
    pub retries: u32,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Maximum accepted response body size.
    pub max_body_bytes: usize,

    /// Upper bound on simultaneous fetches. 0 = one per requested category.
    pub max_concurrency: usize,

    /// What a single category failure does to the batch.
    pub failure_policy: FailurePolicy,

    /// Reject a category whose results carry an unexpected `kind`.
    pub verify_kinds: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            country: "us".to_string(),
            retries: 0,
            timeout_secs: 30,
            max_body_bytes: 10 * 1024 * 1024,
            max_concurrency: 0,
            failure_policy: FailurePolicy::BestEffort,
            verify_kinds: false,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 8] = [
        "base_url",
        "country",
        "retries",
        "timeout_secs",
        "max_body_bytes",
        "max_concurrency",
        "failure_policy",
        "verify_kinds",
    ];

    /// Reads and validates the config at `path`.
    ///
    /// A missing or blank file gives the defaults.
    ///
    /// # Errors
    ///
    /// `TooLarge` past 1 MB, `Parse` for bad TOML or a mistyped value,
    /// `Invalid` when [`validate`](Self::validate) rejects a value.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let Some(content) = read_bounded(path, Self::MAX_FILE_SIZE)? else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        };
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let table: toml::Table = content.parse()?;
        for key in table.keys() {
            if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                tracing::warn!(key = %key, path = %path.display(), "Unknown config key, ignoring");
            }
        }

        let config: Config = toml::Value::Table(table).try_into()?;
        config.validate()?;
        tracing::info!(
            path = %path.display(),
            base_url = %config.base_url,
            country = %config.country,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Checks values serde cannot: URL scheme, country code, timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|e| ConfigError::Invalid {
            key: "base_url",
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                key: "base_url",
                reason: format!("unsupported scheme '{}' (only http/https allowed)", url.scheme()),
            });
        }

        if self.country.len() != 2 || !self.country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::Invalid {
                key: "country",
                reason: format!("'{}' is not a two-letter country code", self.country),
            });
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

/// Reads at most `limit` bytes; `None` if the file does not exist.
fn read_bounded(path: &Path, limit: u64) -> Result<Option<String>, ConfigError> {
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut content = String::new();
    file.take(limit + 1).read_to_string(&mut content)?;
    if content.len() as u64 > limit {
        return Err(ConfigError::TooLarge(limit));
    }
    Ok(Some(content))
}

// ============================================================================
// Tests
// ============================================================================
