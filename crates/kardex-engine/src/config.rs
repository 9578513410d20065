//! # Engine Configuration
//!
//! Configuration for the reconciliation engine.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     KARDEX_OP_TIMEOUT_SECS=10                                          │
//! │     KARDEX_LOW_STOCK_THRESHOLD=5                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/kardex/engine.toml (Linux)                               │
//! │     ~/Library/Application Support/com.kardex.engine/engine.toml (mac)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     5s timeout, 3 write attempts, threshold 10                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # engine.toml
//! op_timeout_secs = 5
//! max_write_attempts = 3
//! low_stock_threshold = 10
//! event_capacity = 64
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use kardex_core::ValidationError;

// =============================================================================
// Engine Config
// =============================================================================

/// Tunables for the reconciliation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Bound on any single store round-trip. An elapsed timeout is treated
    /// exactly like a transport failure.
    #[serde(default = "default_op_timeout_secs")]
    pub op_timeout_secs: u64,

    /// How many times the conditional stock write is attempted before the
    /// operation fails with `Conflict`. Each retry re-reads current stock.
    #[serde(default = "default_max_write_attempts")]
    pub max_write_attempts: u32,

    /// Stock level at or under which the low-stock observer raises an
    /// alert (zero is always reported as depleted).
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,

    /// Capacity of the post-commit stock event channel.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_op_timeout_secs() -> u64 {
    5
}

fn default_max_write_attempts() -> u32 {
    3
}

fn default_low_stock_threshold() -> i64 {
    kardex_core::DEFAULT_LOW_STOCK_THRESHOLD
}

fn default_event_capacity() -> usize {
    64
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            op_timeout_secs: default_op_timeout_secs(),
            max_write_attempts: default_max_write_attempts(),
            low_stock_threshold: default_low_stock_threshold(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (engine.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> EngineResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading engine config from file");
                let contents = std::fs::read_to_string(&path).map_err(|e| {
                    EngineError::Validation(ValidationError::InvalidFormat {
                        field: "config".to_string(),
                        reason: e.to_string(),
                    })
                })?;
                config = toml::from_str(&contents).map_err(|e| {
                    EngineError::Validation(ValidationError::InvalidFormat {
                        field: "config".to_string(),
                        reason: e.to_string(),
                    })
                })?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or falls back to defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> EngineResult<()> {
        if self.op_timeout_secs == 0 {
            return Err(ValidationError::must_be_positive("op_timeout_secs").into());
        }
        if self.max_write_attempts == 0 {
            return Err(ValidationError::must_be_positive("max_write_attempts").into());
        }
        // Zero is a valid threshold (only depletion is ever reported).
        if self.low_stock_threshold < 0 {
            return Err(ValidationError::InvalidFormat {
                field: "low_stock_threshold".to_string(),
                reason: "must not be negative".to_string(),
            }
            .into());
        }
        if self.event_capacity == 0 {
            return Err(ValidationError::must_be_positive("event_capacity").into());
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(secs) = std::env::var("KARDEX_OP_TIMEOUT_SECS") {
            if let Ok(v) = secs.parse::<u64>() {
                debug!(op_timeout_secs = v, "Overriding store timeout from environment");
                self.op_timeout_secs = v;
            }
        }

        if let Ok(attempts) = std::env::var("KARDEX_MAX_WRITE_ATTEMPTS") {
            if let Ok(v) = attempts.parse::<u32>() {
                self.max_write_attempts = v;
            }
        }

        if let Ok(threshold) = std::env::var("KARDEX_LOW_STOCK_THRESHOLD") {
            if let Ok(v) = threshold.parse::<i64>() {
                debug!(low_stock_threshold = v, "Overriding low-stock threshold from environment");
                self.low_stock_threshold = v;
            }
        }

        if let Ok(capacity) = std::env::var("KARDEX_EVENT_CAPACITY") {
            if let Ok(v) = capacity.parse::<usize>() {
                self.event_capacity = v;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "kardex", "engine")
            .map(|dirs| dirs.config_dir().join("engine.toml"))
    }

    /// The per-operation store timeout as a Duration.
    pub fn op_timeout(&self) -> Duration {
        Duration::from_secs(self.op_timeout_secs)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
