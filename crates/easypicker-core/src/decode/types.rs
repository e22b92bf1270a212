//! Core types for image loading.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image loading operations.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file is missing or cannot be read.
    #[error("I/O error: {0}")]
    Io(String),

    /// The codec could not produce pixel data.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The bitmap did not fit the memory budget, even after the coarser retry.
    #[error("Out of memory decoding at sample size {sample_size}")]
    OutOfMemory {
        /// Sample size of the last attempt.
        sample_size: u32,
    },

    /// EXIF metadata is present but unreadable.
    #[error("EXIF error: {0}")]
    Metadata(String),

    /// The request itself is invalid (e.g. a zero max dimension).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err.to_string())
    }
}

impl From<image::ImageError> for LoadError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => LoadError::Io(e.to_string()),
            // The codec's own allocation guard counts as memory pressure;
            // the loader upgrades this with the attempted sample size.
            image::ImageError::Limits(_) => LoadError::OutOfMemory { sample_size: 0 },
            other => LoadError::Decode(other.to_string()),
        }
    }
}

/// Filter type used when resampling to the exact sampled dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, blocky).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (rotate 90 CW + horizontal flip).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (rotate 270 CW + horizontal flip).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl Orientation {
    /// Returns true if this orientation swaps width and height dimensions.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }

    /// The raw EXIF tag value.
    pub fn exif_value(self) -> u8 {
        self as u8
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            1 => Orientation::Normal,
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// Natural dimensions of an encoded image, read without decoding pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBounds {
    /// Width in pixels (before orientation correction).
    pub width: u32,
    /// Height in pixels (before orientation correction).
    pub height: u32,
    /// Detected container format.
    #[serde(skip)]
    pub format: Option<image::ImageFormat>,
}

impl ImageBounds {
    /// MIME type of the detected format, if any.
    pub fn mime_type(&self) -> Option<&'static str> {
        self.format.map(|f| f.to_mime_type())
    }
}

/// A single load request: which file, and how large the result may be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub path: std::path::PathBuf,
    pub max_dimension: u32,
}

impl ImageRequest {
    /// Request `path` bounded by `max_dimension`.
    pub fn new(path: impl Into<std::path::PathBuf>, max_dimension: u32) -> Self {
        Self {
            path: path.into(),
            max_dimension,
        }
    }
}

/// A decoded image with RGB pixel data.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Create a new DecodedImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 3,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a DecodedImage from an image::RgbImage without copying.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert into an image::RgbImage, handing over the pixel buffer.
    pub fn into_rgb_image(self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels)
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

/// Result of a load with the decisions the loader made along the way.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Orientation-corrected pixels.
    pub image: DecodedImage,
    /// Power-of-two divisor that produced `image`.
    pub sample_size: u32,
    /// Orientation that was applied.
    pub orientation: Orientation,
    /// Natural bounds of the encoded file.
    pub source: ImageBounds,
}
