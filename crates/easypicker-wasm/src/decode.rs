//! Image loading WASM bindings.
//!
//! In the browser there is no filesystem path to hand over, so these take the
//! file's bytes (e.g. from `File.arrayBuffer()`) and run the same loader.
//!
//! # Functions
//!
//! - [`load_image`] - Decode bytes into a bounded, orientation-corrected image
//! - [`load_image_with_budget`] - Same, with a memory budget for the bitmap
//! - [`read_image_info`] - Width, height, EXIF orientation and MIME type
//! - [`compute_sample_size`] - The power-of-two divisor a load would use
//!
//! # Example
//!
//! ```typescript
//! import { load_image, read_image_info } from '@easypicker/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const info = read_image_info(bytes);
//! const thumb = load_image(bytes, 256);
//! console.log(`${info.mimeType} ${info.width}x${info.height} -> ${thumb.width}x${thumb.height}`);
//! ```

use crate::types::{ImageInfo, JsDecodedImage};
use easypicker_core::config::LoaderConfig;
use easypicker_core::decode::{self, DecodedImage, ImageLoader, LoadError, Orientation};
use wasm_bindgen::prelude::*;

/// Decode image bytes so the result respects `max_dimension`.
///
/// The image is downsampled by a power of two while both sides exceed
/// `max_dimension`, then EXIF orientation is applied.
///
/// # Errors
///
/// Returns an error string if the bytes are not a supported image, are
/// corrupted, or `max_dimension` is zero.
///
/// # Example
///
/// ```typescript
/// const thumb = load_image(bytes, 256);
/// ```
#[wasm_bindgen]
pub fn load_image(bytes: &[u8], max_dimension: u32) -> Result<JsDecodedImage, JsValue> {
    load(bytes, max_dimension, None)
        .map(JsDecodedImage::from_decoded)
        .map_err(to_js_error)
}

/// Decode image bytes under a memory budget (bytes of RGB bitmap).
///
/// If the bitmap would exceed the budget, the load retries once with a
/// four times coarser sample size before giving up with an out-of-memory error.
///
/// # Example
///
/// ```typescript
/// // Keep previews under 16 MiB
/// const preview = load_image_with_budget(bytes, 2048, 16 * 1024 * 1024);
/// ```
#[wasm_bindgen]
pub fn load_image_with_budget(
    bytes: &[u8],
    max_dimension: u32,
    memory_budget: u32,
) -> Result<JsDecodedImage, JsValue> {
    load(bytes, max_dimension, Some(memory_budget as u64))
        .map(JsDecodedImage::from_decoded)
        .map_err(to_js_error)
}

/// Read dimensions, EXIF orientation and MIME type without decoding pixels.
///
/// Returns a plain object: `{ width, height, orientation, mimeType }`.
#[wasm_bindgen]
pub fn read_image_info(bytes: &[u8]) -> Result<JsValue, JsValue> {
    let info = image_info(bytes).map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&info).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// The power-of-two sample size a load of a `width` x `height` image would use.
///
/// A zero `max_dimension` is treated as 1.
#[wasm_bindgen]
pub fn compute_sample_size(width: u32, height: u32, max_dimension: u32) -> u32 {
    decode::compute_sample_size(width, height, max_dimension.max(1))
}

fn load(bytes: &[u8], max_dimension: u32, budget: Option<u64>) -> Result<DecodedImage, LoadError> {
    let config = LoaderConfig {
        memory_budget: budget,
        ..LoaderConfig::default()
    };
    ImageLoader::new(config)
        .map_err(|e| LoadError::InvalidRequest(e.to_string()))?
        .load_bytes(bytes, max_dimension)
}

fn image_info(bytes: &[u8]) -> Result<ImageInfo, LoadError> {
    let bounds = decode::probe_bounds(bytes)?;
    let orientation = decode::orientation_from_bytes(bytes).unwrap_or(Orientation::Normal);
    Ok(ImageInfo::new(&bounds, orientation))
}

fn to_js_error(err: LoadError) -> JsValue {
    let message = err.to_string();
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(&format!("easypicker: {}", message)));
    JsValue::from_str(&message)
}
