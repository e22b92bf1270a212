//! Loader and picker settings.
//!
//! Both structs deserialize with every field optional, so a host can ship a
//! partial JSON document and inherit the defaults for the rest:
//!
//! ```json
//! { "max_photos": 5, "loader": { "memory_budget": 16777216 } }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::FilterType;

/// Thumbnail edge used by the gallery grid.
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 256;

/// Divisor multiplier for the single memory-pressure retry.
pub const DEFAULT_RETRY_FACTOR: u32 = 4;

/// Directory (under the host's camera root) that receives captured photos.
pub const DEFAULT_NEW_PHOTOS_DIR: &str = "EasyPicker";

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON or has mistyped fields.
    #[error("Invalid configuration: {0}")]
    Parse(String),

    /// A field parsed but holds an unusable value.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// How images are decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Upper bound in bytes for one decoded bitmap. `None` means unbounded.
    pub memory_budget: Option<u64>,
    /// Sample size multiplier applied on the memory-pressure retry.
    pub retry_factor: u32,
    /// Filter used to land on the exact sampled dimensions.
    pub filter: FilterType,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            memory_budget: None,
            retry_factor: DEFAULT_RETRY_FACTOR,
            filter: FilterType::Bilinear,
        }
    }
}

impl LoaderConfig {
    /// Loader settings with a memory budget.
    pub fn with_memory_budget(budget: u64) -> Self {
        Self {
            memory_budget: Some(budget),
            ..Self::default()
        }
    }

    /// Check the values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the retry factor is not a power
    /// of two above 1.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry_factor < 2 || !self.retry_factor.is_power_of_two() {
            return Err(ConfigError::InvalidValue {
                field: "loader.retry_factor",
                reason: format!("{} is not a power of two above 1", self.retry_factor),
            });
        }
        Ok(())
    }
}

/// Gallery behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Maximum number of attached photos. `None` means no limit.
    pub max_photos: Option<usize>,
    /// Max dimension passed to the loader for grid thumbnails.
    pub thumbnail_size: u32,
    /// Where captured photos are written.
    pub new_photos_dir: PathBuf,
    pub loader: LoaderConfig,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            max_photos: None,
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
            new_photos_dir: PathBuf::from(DEFAULT_NEW_PHOTOS_DIR),
            loader: LoaderConfig::default(),
        }
    }
}

impl PickerConfig {
    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and
    /// `ConfigError::InvalidValue` when validation fails.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: PickerConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values serde cannot, including the nested loader settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thumbnail_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "thumbnail_size",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.max_photos == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "max_photos",
                reason: "use null for no limit".to_string(),
            });
        }
        self.loader.validate()
    }
}
