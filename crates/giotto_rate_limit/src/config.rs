//! Configuration structures for rate limiting and retry.
//!
//! This module provides TOML-based configuration. The configuration system
//! supports:
//! - Bundled defaults (include_str! from giotto.toml)
//! - User overrides (./giotto.toml or ~/.config/giotto/giotto.toml)
//! - Automatic merging with user values taking precedence

use crate::ResourceClass;
use config::{Config, File, FileFormat};
use giotto_cache::AssetCacheConfig;
use giotto_error::{ConfigError, GiottoError, GiottoResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Admission limits for one resource class.
///
/// # Example
///
/// ```toml
/// [rate_limits.image_generation]
/// rpm = 30
/// burst = 5
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ClassLimit {
    /// Requests per minute
    pub rpm: u32,
    /// Requests admitted in a burst before the per-minute pacing applies
    #[serde(default = "default_burst")]
    pub burst: u32,
}

fn default_burst() -> u32 {
    1
}

/// Retry schedule for transient generation failures.
///
/// # Example
///
/// ```toml
/// [retry]
/// max_attempts = 3
/// base_delay_ms = 500
/// max_delay_ms = 8000
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Maximum attempts, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Initial backoff delay in milliseconds
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Backoff delay cap in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_attempts() -> usize {
    3
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    8000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Top-level Giotto configuration.
///
/// Loads rate limits, retry schedule, and cache sizing from TOML files with
/// a precedence system:
/// 1. Bundled defaults (include_str! from giotto.toml)
/// 2. User override (./giotto.toml or ~/.config/giotto/giotto.toml)
///
/// # Example
///
/// ```no_run
/// use giotto_rate_limit::{GiottoConfig, ResourceClass};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = GiottoConfig::load()?;
/// let limit = config.limit_for(ResourceClass::ImageGeneration).unwrap();
/// println!("image generation RPM: {}", limit.rpm);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct GiottoConfig {
    /// Map of resource class wire name to admission limits
    #[serde(default)]
    pub rate_limits: HashMap<String, ClassLimit>,

    /// Retry schedule for transient generation failures
    #[serde(default)]
    pub retry: RetryConfig,

    /// Asset cache sizing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<AssetCacheConfig>,
}

impl GiottoConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> GiottoResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                GiottoError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                GiottoError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: user override > bundled default.
    ///
    /// Configuration sources in order of precedence (later sources override earlier):
    /// 1. Bundled defaults (giotto.toml shipped with library)
    /// 2. User config in home directory (~/.config/giotto/giotto.toml)
    /// 3. User config in current directory (./giotto.toml)
    ///
    /// User config files are optional and will be silently skipped if not found.
    #[instrument]
    pub fn load() -> GiottoResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        // Bundled default configuration
        const DEFAULT_CONFIG: &str = include_str!("../../../giotto.toml");

        let mut builder = Config::builder()
            // Start with bundled defaults
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        // Add user config from home directory (optional)
        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/giotto/giotto.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        // Add user config from current directory (optional, highest precedence)
        builder = builder.add_source(File::with_name("giotto").required(false));

        // Build and deserialize
        builder
            .build()
            .map_err(|e| {
                GiottoError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                GiottoError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Get the admission limits for a resource class.
    #[instrument(skip(self))]
    pub fn limit_for(&self, class: ResourceClass) -> Option<ClassLimit> {
        debug!(class = %class, "Looking up class limits");
        self.rate_limits.get(&class.to_string()).copied()
    }
}
