//! Compiler-wide configuration, deserializable from TOML (§1.3).
//!
//! Every default mirrors the concrete numbers the rest of the workspace
//! pins in code, so a config file only needs to override what differs.

use serde::{Deserialize, Serialize};

/// Bundle-production knobs (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleSettings {
    /// Drop unreachable IR subtrees/animations/platform blocks.
    pub tree_shake: bool,
    /// Strip non-rendering metadata and rewrite node ids densely.
    pub minify: bool,
    /// Apply stream compression to the serialized bundle body.
    pub compress: bool,
    /// Emit source-map entries alongside minified output.
    pub source_maps: bool,
}

impl Default for BundleSettings {
    fn default() -> Self {
        Self {
            tree_shake: true,
            minify: true,
            compress: true,
            source_maps: false,
        }
    }
}

/// Shared-cache bounds (§5 "Shared resources").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Max entries in the content-hash-keyed AST cache.
    pub ast_cache_max_entries: usize,
    /// TTL, in seconds, for an AST cache entry.
    pub ast_cache_ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ast_cache_max_entries: uic_cache::AST_CACHE_DEFAULT_MAX_ENTRIES,
            ast_cache_ttl_secs: uic_cache::AST_CACHE_DEFAULT_TTL.as_secs(),
        }
    }
}

/// Live-update transport timing (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportSettings {
    /// Update batching window, in milliseconds.
    pub batch_window_ms: u64,
    /// Heartbeat ping interval, in seconds.
    pub ping_interval_secs: u64,
    /// Heartbeat pong timeout, in seconds.
    pub pong_timeout_secs: u64,
    /// Reconnection backoff base delay, in seconds.
    pub backoff_base_secs: u64,
    /// Reconnection backoff growth factor.
    pub backoff_factor: u32,
    /// Reconnection backoff cap, in seconds.
    pub backoff_cap_secs: u64,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            batch_window_ms: uic_session::DEFAULT_BATCH_WINDOW.as_millis() as u64,
            ping_interval_secs: uic_session::PING_INTERVAL.as_secs(),
            pong_timeout_secs: uic_session::PONG_TIMEOUT.as_secs(),
            backoff_base_secs: uic_session::BASE_DELAY.as_secs(),
            backoff_factor: uic_session::FACTOR,
            backoff_cap_secs: uic_session::CAP.as_secs(),
        }
    }
}

/// Top-level compiler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CompilerConfig {
    /// Bundle-production knobs.
    pub bundle: BundleSettings,
    /// Shared-cache bounds.
    pub cache: CacheSettings,
    /// Live-update transport timing.
    pub transport: TransportSettings,
}

impl CompilerConfig {
    /// Parse a config from TOML text, falling back to defaults for any
    /// field the document omits.
    pub fn from_toml(text: &str) -> crate::error::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Serialize this config back to TOML text.
    pub fn to_toml(&self) -> crate::error::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_the_pinned_numbers() {
        let config = CompilerConfig::default();
        assert_eq!(config.transport.batch_window_ms, 50);
        assert_eq!(config.transport.ping_interval_secs, 30);
        assert_eq!(config.transport.pong_timeout_secs, 60);
        assert_eq!(config.transport.backoff_base_secs, 1);
        assert_eq!(config.transport.backoff_factor, 2);
        assert_eq!(config.transport.backoff_cap_secs, 30);
        assert_eq!(config.cache.ast_cache_max_entries, 100);
        assert_eq!(config.cache.ast_cache_ttl_secs, 60);
    }

    #[test]
    fn partial_toml_overrides_only_what_it_names() {
        let config = CompilerConfig::from_toml("[bundle]\nminify = false\n").unwrap();
        assert!(!config.bundle.minify);
        assert!(config.bundle.compress);
        assert_eq!(config.transport.batch_window_ms, 50);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = CompilerConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = CompilerConfig::from_toml(&text).unwrap();
        assert_eq!(config, parsed);
    }
}
