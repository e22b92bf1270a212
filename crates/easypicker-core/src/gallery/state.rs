//! Instance state that survives the host tearing the widget down.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::GalleryError;

/// Everything needed to rebuild a gallery: thumbnails are reloaded from
/// the paths, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    /// Attached photo paths in display order.
    #[serde(default)]
    pub attached: Vec<PathBuf>,
    /// Where an in-flight camera capture will land.
    #[serde(default)]
    pub pending_capture: Option<PathBuf>,
}

impl SavedState {
    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::InvalidState` if serialization fails.
    pub fn to_json(&self) -> Result<String, GalleryError> {
        serde_json::to_string(self).map_err(|e| GalleryError::InvalidState(e.to_string()))
    }

    /// Parse state written by [`SavedState::to_json`].
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::InvalidState` for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, GalleryError> {
        serde_json::from_str(json).map_err(|e| GalleryError::InvalidState(e.to_string()))
    }
}
