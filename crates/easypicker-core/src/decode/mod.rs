//! Image loading pipeline for EasyPicker.
//!
//! This module provides functionality for:
//! - Probing image bounds without allocating pixels
//! - Choosing a power-of-two sample size for a maximum dimension
//! - Decoding at that sample size (DCT scaling for JPEG, row skipping for
//!   PNG), with one coarser retry under memory pressure
//! - Reading EXIF orientation and applying the matching transform
//!
//! # Architecture
//!
//! All operations are synchronous and blocking. Callers that render UI are
//! expected to run loads off their main thread. Nothing is shared between
//! calls: each load owns its buffers and hands the result to the caller.
//!
//! # Examples
//!
//! ```ignore
//! use easypicker_core::{ImageLoader, LoaderConfig};
//!
//! let loader = ImageLoader::new(LoaderConfig::default())?;
//! let image = loader.load(Path::new("photo.jpg"), 1024)?;
//! println!("Loaded {}x{} image", image.width, image.height);
//! ```

mod jpeg;
mod loader;
mod orientation;
mod png;
mod resize;
mod sample;
mod types;

pub use image::ImageFormat;
pub use loader::{mime_type_of_file, probe_bounds, read_bounds, ImageLoader};
pub use orientation::{apply_orientation, orientation_from_bytes, read_orientation};
pub use resize::resample;
pub use sample::{compute_sample_size, sampled_dimensions};
pub use types::{
    DecodedImage, FilterType, ImageBounds, ImageRequest, LoadError, LoadedImage, Orientation,
};
