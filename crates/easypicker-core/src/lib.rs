//! EasyPicker Core - photo attachment library
//!
//! This crate provides the non-UI core of the EasyPicker widget: loading
//! photos into memory-bounded, orientation-corrected bitmaps, and the gallery
//! model that tracks attached photos across host teardown.

pub mod config;
pub mod decode;
pub mod gallery;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::{ConfigError, LoaderConfig, PickerConfig};
pub use decode::{DecodedImage, ImageLoader, LoadError, Orientation};
pub use gallery::{GalleryAction, GalleryError, GalleryEvent, PhotoGallery, PickerResult};
