//! Configuration management for gitscope.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// gitscope configuration, usually loaded from `<git-dir>/gitscope.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Visibility cache and ref policy.
    #[serde(default)]
    pub visibility: VisibilityConfig,

    /// Commit walk settings.
    #[serde(default)]
    pub walk: WalkConfig,

    /// History page settings.
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load config from a TOML file.
    ///
    /// # Errors
    /// Returns error if file can't be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to a TOML file.
    ///
    /// # Errors
    /// Returns error if serialization or write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| std::io::Error::other(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Visibility cache bounds and the ref namespaces never used as proof.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibilityConfig {
    /// Maximum number of cached decisions.
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    /// Seconds after which a cached decision is recomputed.
    #[serde(default = "default_cache_max_age_secs")]
    pub cache_max_age_secs: u64,

    /// Number of independently locked cache shards.
    #[serde(default = "default_cache_shards")]
    pub cache_shards: usize,

    /// Ref prefixes excluded from the catch-all reachability bucket.
    #[serde(default = "default_hidden_ref_prefixes")]
    pub hidden_ref_prefixes: Vec<String>,
}

impl VisibilityConfig {
    #[must_use]
    pub const fn cache_max_age(&self) -> Duration {
        Duration::from_secs(self.cache_max_age_secs)
    }
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            cache_max_entries: default_cache_max_entries(),
            cache_max_age_secs: default_cache_max_age_secs(),
            cache_shards: default_cache_shards(),
            hidden_ref_prefixes: default_hidden_ref_prefixes(),
        }
    }
}

const fn default_cache_max_entries() -> usize {
    1024
}

const fn default_cache_max_age_secs() -> u64 {
    30 * 60
}

const fn default_cache_shards() -> usize {
    16
}

fn default_hidden_ref_prefixes() -> Vec<String> {
    vec!["refs/changes/".into()]
}

/// Commit walk settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Commits a single reachability test may visit before giving up.
    #[serde(default = "default_reachability_limit")]
    pub reachability_limit: usize,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            reachability_limit: default_reachability_limit(),
        }
    }
}

const fn default_reachability_limit() -> usize {
    gitscope_git::DEFAULT_REACHABILITY_LIMIT
}

/// History page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Commits per page when the request does not ask for a size.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Largest page a request may ask for.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

impl LogConfig {
    /// Page size for a request, clamped to `1..=max_page_size`.
    #[must_use]
    pub fn page_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.page_size)
            .clamp(1, self.max_page_size.max(1))
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

const fn default_page_size() -> usize {
    100
}

const fn default_max_page_size() -> usize {
    1000
}
