//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core EasyPicker
//! types, handling the conversion between Rust and JavaScript representations.

use easypicker_core::decode::{DecodedImage, ImageBounds, Orientation};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// A decoded image wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 3 for RGB)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array (a copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl JsDecodedImage {
    /// Take ownership of a core DecodedImage without copying its pixels.
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }
}

/// Header facts about an image, handed to JavaScript as a plain object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// EXIF orientation value (1-8).
    pub orientation: u8,
    pub mime_type: Option<&'static str>,
}

impl ImageInfo {
    pub(crate) fn new(bounds: &ImageBounds, orientation: Orientation) -> Self {
        Self {
            width: bounds.width,
            height: bounds.height,
            orientation: orientation.exif_value(),
            mime_type: bounds.mime_type(),
        }
    }
}
