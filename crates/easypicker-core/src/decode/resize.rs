//! Resampling a decoded bitmap to exact sampled dimensions.
//!
//! Codecs only shrink by the factors they support (JPEG: 1/2, 1/4, 1/8) and
//! round up; this finishes the job so every path yields `dim / sample_size`.

use super::{DecodedImage, FilterType, LoadError};

/// Resample `image` to exactly `width` x `height`.
///
/// Consumes the input. When the dimensions already match, the same buffer is
/// returned without touching it.
///
/// # Errors
///
/// Returns `LoadError::InvalidRequest` for zero target dimensions and
/// `LoadError::Decode` if the pixel buffer does not match its dimensions.
pub fn resample(
    image: DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, LoadError> {
    if width == 0 || height == 0 {
        return Err(LoadError::InvalidRequest(format!(
            "cannot resample to {}x{}",
            width, height
        )));
    }

    if image.width == width && image.height == height {
        return Ok(image);
    }

    let rgb_image = image
        .into_rgb_image()
        .ok_or_else(|| LoadError::Decode("pixel buffer size mismatch".to_string()))?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgb_image(resized))
}
