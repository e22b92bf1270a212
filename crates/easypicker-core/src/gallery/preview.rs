//! Full-screen preview pager over the attached photos.

use std::path::{Path, PathBuf};

use crate::decode::{DecodedImage, ImageLoader, LoadError};

/// Pages through attached photos, one full-screen image at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewPager {
    paths: Vec<PathBuf>,
    current: usize,
}

impl PreviewPager {
    /// Create a pager starting at `current` (clamped to the last page).
    pub fn new(paths: Vec<PathBuf>, current: usize) -> Self {
        let current = current.min(paths.len().saturating_sub(1));
        Self { paths, current }
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Index of the page on screen.
    pub fn current(&self) -> usize {
        self.current
    }

    /// All pages in order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Path of the page on screen, `None` for an empty pager.
    pub fn current_path(&self) -> Option<&Path> {
        self.paths.get(self.current).map(PathBuf::as_path)
    }

    /// Move to `index`, clamped to the last page. Returns the new position.
    pub fn set_current(&mut self, index: usize) -> usize {
        self.current = index.min(self.paths.len().saturating_sub(1));
        self.current
    }

    /// Bound for preview decodes: the longer side of the screen.
    pub fn max_side(screen_width: u32, screen_height: u32) -> u32 {
        screen_width.max(screen_height)
    }

    /// Load page `index` for display within `max_side`.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidRequest` for an out-of-range `index`,
    /// otherwise whatever [`ImageLoader::load`] does.
    pub fn load_page(
        &self,
        loader: &ImageLoader,
        index: usize,
        max_side: u32,
    ) -> Result<DecodedImage, LoadError> {
        let path = self.paths.get(index).ok_or_else(|| {
            LoadError::InvalidRequest(format!(
                "preview page {} out of {}",
                index,
                self.paths.len()
            ))
        })?;
        loader.load(path, max_side)
    }

    /// Load the page on screen.
    ///
    /// # Errors
    ///
    /// Same as [`PreviewPager::load_page`].
    pub fn load_current(
        &self,
        loader: &ImageLoader,
        max_side: u32,
    ) -> Result<DecodedImage, LoadError> {
        self.load_page(loader, self.current, max_side)
    }
}
