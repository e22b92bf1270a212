//! Messages into and out of the gallery.
//!
//! The widget reports taps as [`GalleryEvent`]s addressed by on-screen
//! position and gets back a [`GalleryAction`] describing what the host should
//! show next. Position 0 is always the "add photo" control.

use std::path::PathBuf;

use super::PreviewPager;

/// A user interaction with a gallery item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryEvent {
    /// The item's image was tapped.
    PhotoClicked(usize),
    /// The item's remove button was tapped.
    RemoveClicked(usize),
}

/// What the host should do in response to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryAction {
    /// Ask the user whether to take a photo or pick one.
    ChooseSource,
    /// The limit is reached; tell the user.
    MaxPhotosReached(usize),
    /// Show the full-screen preview.
    OpenPreview(PreviewPager),
    /// The photo at this path was detached.
    Removed(PathBuf),
    /// Nothing to do.
    Ignored,
}

/// Outcome of the camera or picker the host launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerResult {
    /// The camera wrote to the pending capture path.
    Captured,
    /// The user picked an existing image.
    Picked(PathBuf),
    /// The user backed out.
    Cancelled,
}
