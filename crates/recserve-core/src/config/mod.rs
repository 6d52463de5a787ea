//! Serving configuration.
//!
//! Loaded once from TOML at startup. Every section and field has a default,
//! so an empty file is a valid configuration.
//!
//! ```toml
//! [snapshots]
//! similarity = "data/similar_items.json"
//! personal = "data/personal_recommendations.json"
//! default_ranking = "data/top_popular.json"
//!
//! [online]
//! event_count = 3
//! history_timeout_ms = 100
//! similarity_timeout_ms = 100
//!
//! [blend]
//! branch_timeout_ms = 250
//! request_timeout_ms = 500
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;


/// Environment variable that re-roots relative snapshot paths.
pub const SNAPSHOT_DIR_ENV: &str = "RECSERVE_SNAPSHOT_DIR";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServingConfig {
    pub snapshots: SnapshotConfig,
    pub online: OnlineConfig,
    pub blend: BlendConfig,
    pub service: ServiceConfig,
    pub events: EventsConfig,
}

/// Snapshot file locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Columns `item_id_1`, `item_id_2`, `score`.
    pub similarity: PathBuf,
    /// Columns `user_id`, `item_id`, `rank`.
    pub personal: PathBuf,
    /// Columns `item_id`, `rank`.
    pub default_ranking: PathBuf,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            similarity: PathBuf::from("data/similar_items.json"),
            personal: PathBuf::from("data/personal_recommendations.json"),
            default_ranking: PathBuf::from("data/top_popular.json"),
        }
    }
}

impl SnapshotConfig {
    /// Re-root relative paths under `dir`. Absolute paths are kept.
    #[must_use]
    pub fn rooted_at(mut self, dir: &Path) -> Self {
        for path in [
            &mut self.similarity,
            &mut self.personal,
            &mut self.default_ranking,
        ] {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
        self
    }
}

/// Online candidate generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnlineConfig {
    /// How many recent events to fan out over.
    pub event_count: usize,
    /// Timeout for the event history call.
    pub history_timeout_ms: u64,
    /// Timeout for each per-event similarity lookup.
    pub similarity_timeout_ms: u64,
}

impl Default for OnlineConfig {
    fn default() -> Self {
        Self {
            event_count: 3,
            history_timeout_ms: 100,
            similarity_timeout_ms: 100,
        }
    }
}

impl OnlineConfig {
    pub fn history_timeout(&self) -> Duration {
        Duration::from_millis(self.history_timeout_ms)
    }

    pub fn similarity_timeout(&self) -> Duration {
        Duration::from_millis(self.similarity_timeout_ms)
    }
}

/// Blending timeouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendConfig {
    /// Budget for each of the offline and online branches.
    pub branch_timeout_ms: u64,
    /// End-to-end budget for a blended request.
    pub request_timeout_ms: u64,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            branch_timeout_ms: 250,
            request_timeout_ms: 500,
        }
    }
}

impl BlendConfig {
    pub fn branch_timeout(&self) -> Duration {
        Duration::from_millis(self.branch_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Request defaults applied by transports when `k` is omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub default_k_similar: i64,
    pub default_k_recs: i64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_k_similar: 10,
            default_k_recs: 100,
        }
    }
}

/// In-memory event history settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Events retained per user, newest first.
    pub max_per_user: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { max_per_user: 10 }
    }
}

impl ServingConfig {
    /// Parse configuration from a TOML string and validate it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML and
    /// `ConfigError::Invalid` for out-of-range values.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        info!(path = %path.display(), "Loaded serving configuration");
        Ok(config)
    }

    /// Apply `RECSERVE_SNAPSHOT_DIR` when set.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var(SNAPSHOT_DIR_ENV) {
            info!(dir = %dir, "Using snapshot directory from {}", SNAPSHOT_DIR_ENV);
            self.snapshots = self.snapshots.rooted_at(Path::new(&dir));
        }
        self
    }

    /// Validate all fields.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - any timeout is zero
    /// - `online.event_count` or `events.max_per_user` is zero
    /// - a default `k` is not positive
    /// - `blend.branch_timeout_ms` exceeds `blend.request_timeout_ms`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.online.event_count == 0 {
            return Err(invalid("online.event_count", "must be >= 1, got 0"));
        }
        if self.online.history_timeout_ms == 0 {
            return Err(invalid("online.history_timeout_ms", "must be > 0"));
        }
        if self.online.similarity_timeout_ms == 0 {
            return Err(invalid("online.similarity_timeout_ms", "must be > 0"));
        }
        if self.blend.request_timeout_ms == 0 {
            return Err(invalid("blend.request_timeout_ms", "must be > 0"));
        }
        if self.blend.branch_timeout_ms == 0 {
            return Err(invalid("blend.branch_timeout_ms", "must be > 0"));
        }
        if self.blend.branch_timeout_ms > self.blend.request_timeout_ms {
            return Err(invalid(
                "blend.branch_timeout_ms",
                format!(
                    "({}) must be <= blend.request_timeout_ms ({})",
                    self.blend.branch_timeout_ms, self.blend.request_timeout_ms
                ),
            ));
        }
        if self.service.default_k_similar <= 0 {
            return Err(invalid(
                "service.default_k_similar",
                format!("must be positive, got {}", self.service.default_k_similar),
            ));
        }
        if self.service.default_k_recs <= 0 {
            return Err(invalid(
                "service.default_k_recs",
                format!("must be positive, got {}", self.service.default_k_recs),
            ));
        }
        if self.events.max_per_user == 0 {
            return Err(invalid("events.max_per_user", "must be >= 1, got 0"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
