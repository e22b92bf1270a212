//! The photo gallery: attached photos, their thumbnails, and event handling.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info, warn};

use super::{GalleryAction, GalleryError, GalleryEvent, PickerResult, PreviewPager, SavedState};
use crate::config::{ConfigError, PickerConfig};
use crate::decode::{DecodedImage, ImageLoader};

/// One attached photo.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub path: PathBuf,
    pub thumbnail: DecodedImage,
}

/// Headless model of the picker widget.
///
/// Display position 0 is the add control; attached photo `i` sits at
/// position `i + 1`.
#[derive(Debug)]
pub struct PhotoGallery {
    config: PickerConfig,
    loader: ImageLoader,
    photos: Vec<Attachment>,
    pending_capture: Option<PathBuf>,
}

impl PhotoGallery {
    /// Create an empty gallery.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `config` fails
    /// [`PickerConfig::validate`].
    pub fn new(config: PickerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let loader = ImageLoader::new(config.loader.clone())?;
        Ok(Self {
            config,
            loader,
            photos: Vec::new(),
            pending_capture: None,
        })
    }

    /// Rebuild a gallery from saved state.
    ///
    /// Photos that no longer load are skipped; their errors are returned so
    /// the host can tell the user.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an invalid `config`, as
    /// [`PhotoGallery::new`] does.
    pub fn restore(
        config: PickerConfig,
        state: SavedState,
    ) -> Result<(Self, Vec<GalleryError>), ConfigError> {
        let mut gallery = Self::new(config)?;
        gallery.pending_capture = state.pending_capture;

        let mut errors = Vec::new();
        for path in state.attached {
            if let Err(e) = gallery.attach(&path) {
                warn!("dropping {} on restore: {}", path.display(), e);
                errors.push(e);
            }
        }
        Ok((gallery, errors))
    }

    /// Snapshot of the attached paths and any capture in progress.
    pub fn save_state(&self) -> SavedState {
        SavedState {
            attached: self.attached_paths(),
            pending_capture: self.pending_capture.clone(),
        }
    }

    /// The settings this gallery was built with.
    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// Loader used for grid thumbnails, also handy for previews.
    pub fn loader(&self) -> &ImageLoader {
        &self.loader
    }

    /// Number of attached photos.
    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Items on screen, including the add control.
    pub fn item_count(&self) -> usize {
        self.photos.len() + 1
    }

    /// Attached photos in display order.
    pub fn photos(&self) -> &[Attachment] {
        &self.photos
    }

    /// Paths of the attached photos in display order.
    pub fn attached_paths(&self) -> Vec<PathBuf> {
        self.photos.iter().map(|p| p.path.clone()).collect()
    }

    /// Thumbnail of attached photo `index` (0-based, not a display position).
    pub fn thumbnail(&self, index: usize) -> Option<&DecodedImage> {
        self.photos.get(index).map(|p| &p.thumbnail)
    }

    /// File the camera was asked to write, until its result is attached.
    pub fn pending_capture(&self) -> Option<&Path> {
        self.pending_capture.as_deref()
    }

    /// Whether the photo limit is reached. Always false without a limit.
    pub fn is_full(&self) -> bool {
        self.config
            .max_photos
            .is_some_and(|max| self.photos.len() >= max)
    }

    /// Load a thumbnail for `path` and append it. Returns the display position.
    ///
    /// On failure the gallery is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::MaxPhotosReached` when the gallery is full and
    /// `GalleryError::Attach` when the thumbnail cannot be loaded.
    pub fn attach(&mut self, path: &Path) -> Result<usize, GalleryError> {
        if let Some(max) = self.config.max_photos.filter(|_| self.is_full()) {
            return Err(GalleryError::MaxPhotosReached(max));
        }

        let thumbnail = self
            .loader
            .load(path, self.config.thumbnail_size)
            .map_err(|source| GalleryError::Attach {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            "attached {} ({}x{} thumbnail)",
            path.display(),
            thumbnail.width,
            thumbnail.height
        );
        self.photos.push(Attachment {
            path: path.to_path_buf(),
            thumbnail,
        });
        Ok(self.photos.len())
    }

    /// React to a tap on the item at display `position`.
    pub fn handle(&mut self, event: GalleryEvent) -> GalleryAction {
        debug!("gallery event {:?}", event);
        match event {
            GalleryEvent::PhotoClicked(0) => match self.config.max_photos {
                Some(max) if self.is_full() => GalleryAction::MaxPhotosReached(max),
                _ => GalleryAction::ChooseSource,
            },
            GalleryEvent::PhotoClicked(position) if position <= self.photos.len() => {
                GalleryAction::OpenPreview(PreviewPager::new(self.attached_paths(), position - 1))
            }
            GalleryEvent::RemoveClicked(position) if position > 0 && position <= self.photos.len() => {
                let removed = self.photos.remove(position - 1);
                info!("removed {}", removed.path.display());
                GalleryAction::Removed(removed.path)
            }
            _ => GalleryAction::Ignored,
        }
    }

    /// Prepare a camera capture: ensure the photo directory exists and
    /// remember a fresh file path for the camera to write to.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::Storage` if the directory cannot be created.
    pub fn begin_capture(&mut self) -> Result<PathBuf, GalleryError> {
        self.begin_capture_at(SystemTime::now())
    }

    /// [`PhotoGallery::begin_capture`] with an explicit clock; the file is
    /// named after `now` in milliseconds since the epoch.
    ///
    /// # Errors
    ///
    /// Same as [`PhotoGallery::begin_capture`].
    pub fn begin_capture_at(&mut self, now: SystemTime) -> Result<PathBuf, GalleryError> {
        let dir = &self.config.new_photos_dir;
        fs::create_dir_all(dir).map_err(|e| {
            GalleryError::Storage(format!("{}: {}", dir.display(), e))
        })?;

        let millis = now
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let path = dir.join(format!("{}.jpg", millis));
        debug!("capture target {}", path.display());
        self.pending_capture = Some(path.clone());
        Ok(path)
    }

    /// Apply the result of the camera or picker the host launched.
    ///
    /// Returns the display position of the newly attached photo, or `None`
    /// when the user cancelled. A capture stays pending until its photo is
    /// attached, so a failed attach can be retried or saved.
    ///
    /// # Errors
    ///
    /// Returns `GalleryError::NoPendingCapture` for a capture result with no
    /// capture in progress, otherwise whatever [`PhotoGallery::attach`] does.
    pub fn complete(&mut self, result: PickerResult) -> Result<Option<usize>, GalleryError> {
        match result {
            PickerResult::Cancelled => Ok(None),
            PickerResult::Picked(path) => self.attach(&path).map(Some),
            PickerResult::Captured => {
                let path = self
                    .pending_capture
                    .clone()
                    .ok_or(GalleryError::NoPendingCapture)?;
                let position = self.attach(&path)?;
                self.pending_capture = None;
                Ok(Some(position))
            }
        }
    }
}
