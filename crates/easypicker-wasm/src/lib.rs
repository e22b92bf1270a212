//! EasyPicker WASM - WebAssembly bindings for EasyPicker
//!
//! This crate exposes the easypicker-core image loader to JavaScript hosts,
//! which hand over file bytes rather than filesystem paths.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Image loading bindings (bounded decode, image info)
//!
//! # Usage
//!
//! ```typescript
//! import init, { load_image } from '@easypicker/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const thumb = load_image(bytes, 256);
//! console.log(`Loaded ${thumb.width}x${thumb.height}`);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod types;

pub use decode::{compute_sample_size, load_image, load_image_with_budget, read_image_info};
pub use types::JsDecodedImage;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
