//! Headless photo gallery model.
//!
//! Tracks which photos are attached, keeps a thumbnail for each, and turns
//! taps on the widget into [`GalleryAction`]s for the host to carry out.
//! Drawing, dialogs and launching the camera stay with the host.
//!
//! # Flow
//!
//! 1. Tap on the add control (position 0) -> `ChooseSource`
//! 2. Host calls [`PhotoGallery::begin_capture`] or opens its picker
//! 3. Host reports back with [`PhotoGallery::complete`]
//! 4. Across teardown, [`PhotoGallery::save_state`] / [`PhotoGallery::restore`]

mod event;
mod picker;
mod preview;
mod state;

use std::path::PathBuf;

use thiserror::Error;

use crate::decode::LoadError;

pub use event::{GalleryAction, GalleryEvent, PickerResult};
pub use picker::{Attachment, PhotoGallery};
pub use preview::PreviewPager;
pub use state::SavedState;

/// Errors raised by gallery operations.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// The configured photo limit is reached.
    #[error("Maximum of {0} photos reached")]
    MaxPhotosReached(usize),

    /// The photo could not be loaded; nothing was attached.
    #[error("Failed to attach {}: {source}", .path.display())]
    Attach {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    /// The capture directory could not be created.
    #[error("Cannot prepare photo directory: {0}")]
    Storage(String),

    /// A capture result arrived without a capture in progress.
    #[error("No camera capture in progress")]
    NoPendingCapture,

    /// Saved state could not be (de)serialized.
    #[error("Invalid saved state: {0}")]
    InvalidState(String),
}
