//! Memory-bounded image loading.
//!
//! A load runs in four steps:
//!
//! 1. Probe the bounds from the container header (no pixel allocation).
//! 2. Pick a power-of-two sample size with [`compute_sample_size`].
//! 3. Decode at that sample size. JPEG scales in the DCT and non-interlaced
//!    PNG skips rows, so neither allocates the full resolution. Other input
//!    is decoded in full and that intermediate is charged to the budget. If
//!    the bitmap would not fit the memory budget, retry once with the sample
//!    size multiplied by the configured factor; a second failure is
//!    `LoadError::OutOfMemory`.
//! 4. Read the EXIF orientation and apply it. Unreadable EXIF is logged and
//!    treated as `Orientation::Normal`.

use std::fs;
use std::io::{BufRead, Cursor, Seek};
use std::path::Path;

use image::{ImageFormat, ImageReader, Limits};
use tracing::{debug, warn};

use super::jpeg::decode_jpeg_scaled;
use super::png::decode_png_sampled;
use super::orientation::{apply_orientation, orientation_from_bytes};
use super::resize::resample;
use super::sample::{bitmap_bytes, compute_sample_size, sampled_dimensions};
use super::{DecodedImage, ImageBounds, ImageRequest, LoadError, LoadedImage, Orientation};
use crate::config::{ConfigError, LoaderConfig};

/// Decodes image files into bounded, orientation-corrected RGB bitmaps.
///
/// The loader holds only configuration; every call owns its own buffers, so
/// one loader can be cloned or shared across threads freely.
#[derive(Debug, Clone, Default)]
pub struct ImageLoader {
    config: LoaderConfig,
}

impl ImageLoader {
    /// Create a loader after checking `config`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the retry factor is not a power
    /// of two above 1.
    pub fn new(config: LoaderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The settings this loader was built with.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load the image at `path` so that its sampled size respects
    /// `max_dimension` (see [`compute_sample_size`] for the exact rule).
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidRequest` for a zero `max_dimension`,
    /// `LoadError::Io` if the file cannot be read, `LoadError::Decode` for
    /// unsupported or corrupt data, and `LoadError::OutOfMemory` when even the
    /// coarser retry does not fit the memory budget.
    pub fn load(&self, path: &Path, max_dimension: u32) -> Result<DecodedImage, LoadError> {
        self.load_detailed(path, max_dimension).map(|loaded| loaded.image)
    }

    /// [`ImageLoader::load`] taking an [`ImageRequest`].
    ///
    /// # Errors
    ///
    /// Same as [`ImageLoader::load`].
    pub fn load_request(&self, request: &ImageRequest) -> Result<DecodedImage, LoadError> {
        self.load(&request.path, request.max_dimension)
    }

    /// Like [`ImageLoader::load`], also reporting sample size, orientation
    /// and source bounds.
    ///
    /// # Errors
    ///
    /// Same as [`ImageLoader::load`].
    pub fn load_detailed(&self, path: &Path, max_dimension: u32) -> Result<LoadedImage, LoadError> {
        debug!("get image: {}", path.display());
        check_max_dimension(max_dimension)?;

        let bytes = fs::read(path).map_err(|e| {
            warn!("cannot read {}: {}", path.display(), e);
            LoadError::from(e)
        })?;
        self.load_bytes_detailed(&bytes, max_dimension)
    }

    /// Load from the bytes of an image file.
    ///
    /// # Errors
    ///
    /// Same as [`ImageLoader::load`], minus the file read.
    pub fn load_bytes(&self, bytes: &[u8], max_dimension: u32) -> Result<DecodedImage, LoadError> {
        self.load_bytes_detailed(bytes, max_dimension)
            .map(|loaded| loaded.image)
    }

    /// Like [`ImageLoader::load_bytes`], also reporting sample size,
    /// orientation and source bounds.
    ///
    /// # Errors
    ///
    /// Same as [`ImageLoader::load_bytes`].
    pub fn load_bytes_detailed(
        &self,
        bytes: &[u8],
        max_dimension: u32,
    ) -> Result<LoadedImage, LoadError> {
        check_max_dimension(max_dimension)?;

        let source = probe_bounds(bytes)?;
        let sample_size = compute_sample_size(source.width, source.height, max_dimension);
        debug!(
            "bounds {}x{}, max {}, sample size {}",
            source.width, source.height, max_dimension, sample_size
        );

        let (image, sample_size) = self.decode_with_retry(bytes, &source, sample_size)?;

        let orientation = orientation_from_bytes(bytes).unwrap_or_else(|e| {
            warn!("unreadable EXIF, assuming normal orientation: {}", e);
            Orientation::Normal
        });
        debug!("exif orientation: {:?}", orientation);
        let image = apply_orientation(image, orientation);

        Ok(LoadedImage {
            image,
            sample_size,
            orientation,
            source,
        })
    }

    fn decode_with_retry(
        &self,
        bytes: &[u8],
        source: &ImageBounds,
        sample_size: u32,
    ) -> Result<(DecodedImage, u32), LoadError> {
        match self.decode_sampled(bytes, source, sample_size) {
            Err(LoadError::OutOfMemory { .. }) => {
                let retry = sample_size.saturating_mul(self.config.retry_factor);
                warn!(
                    "out of memory at sample size {}, retrying at {}",
                    sample_size, retry
                );
                self.decode_sampled(bytes, source, retry)
                    .map(|image| (image, retry))
            }
            result => result.map(|image| (image, sample_size)),
        }
    }

    fn decode_sampled(
        &self,
        bytes: &[u8],
        source: &ImageBounds,
        sample_size: u32,
    ) -> Result<DecodedImage, LoadError> {
        let (width, height) = sampled_dimensions(source.width, source.height, sample_size);

        if let Some(budget) = self.config.memory_budget {
            let needed = bitmap_bytes(width, height);
            if needed > budget {
                debug!(
                    "{}x{} needs {} bytes, budget is {}",
                    width, height, needed, budget
                );
                return Err(LoadError::OutOfMemory { sample_size });
            }
        }

        let decoded = match source.format {
            Some(ImageFormat::Jpeg) => decode_jpeg_scaled(bytes, width, height, self.config.filter),
            Some(ImageFormat::Png) => match decode_png_sampled(bytes, sample_size)? {
                Some(image) => Ok(image),
                None => self.decode_generic(bytes, source, width, height),
            },
            _ => self.decode_generic(bytes, source, width, height),
        };

        decoded.map_err(|e| match e {
            LoadError::OutOfMemory { .. } => LoadError::OutOfMemory { sample_size },
            other => other,
        })
    }

    /// Full-resolution decode followed by a resample. The full bitmap is
    /// reserved against the budget before the codec runs.
    fn decode_generic(
        &self,
        bytes: &[u8],
        source: &ImageBounds,
        width: u32,
        height: u32,
    ) -> Result<DecodedImage, LoadError> {
        let mut limits = Limits::default();
        if let Some(budget) = self.config.memory_budget {
            limits.max_alloc = Some(budget);
        }
        limits
            .clone()
            .reserve(bitmap_bytes(source.width, source.height))?;

        let mut reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        reader.limits(limits);
        let img = reader.decode()?;
        let rgb = DecodedImage::from_rgb_image(img.into_rgb8());
        resample(rgb, width, height, self.config.filter)
    }
}

fn check_max_dimension(max_dimension: u32) -> Result<(), LoadError> {
    if max_dimension == 0 {
        return Err(LoadError::InvalidRequest(
            "max dimension must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Read natural dimensions and format from image bytes without decoding pixels.
pub fn probe_bounds(bytes: &[u8]) -> Result<ImageBounds, LoadError> {
    bounds_from_reader(ImageReader::new(Cursor::new(bytes)))
}

/// Read natural dimensions and format of the file at `path`.
pub fn read_bounds(path: &Path) -> Result<ImageBounds, LoadError> {
    bounds_from_reader(ImageReader::open(path)?)
}

/// MIME type of the image file at `path`, e.g. `image/jpeg`.
pub fn mime_type_of_file(path: &Path) -> Result<&'static str, LoadError> {
    read_bounds(path)?
        .mime_type()
        .ok_or_else(|| LoadError::Decode("unrecognized image format".to_string()))
}

fn bounds_from_reader<R: BufRead + Seek>(reader: ImageReader<R>) -> Result<ImageBounds, LoadError> {
    let reader = reader.with_guessed_format()?;
    let format = reader
        .format()
        .ok_or_else(|| LoadError::Decode("unrecognized image format".to_string()))?;
    let (width, height) = reader.into_dimensions()?;
    if width == 0 || height == 0 {
        return Err(LoadError::Decode(format!(
            "empty image: {}x{}",
            width, height
        )));
    }
    Ok(ImageBounds {
        width,
        height,
        format: Some(format),
    })
}


// ============================================================================
// Property-Based Tests
// ============================================================================
