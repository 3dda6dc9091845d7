//! Image decoding and export WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode PNG or JPEG bytes to RGBA
//! - [`encode_png`] - Encode a JsRasterImage to PNG bytes
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, encode_png } from '@cropkit/wasm';
//!
//! const image = decode_image(bytes);
//! const png = encode_png(image);
//! const blob = new Blob([png], { type: 'image/png' });
//! ```

use crate::types::JsRasterImage;
use cropkit_core::{encode, raster};
use wasm_bindgen::prelude::*;

/// Decode image bytes (PNG or JPEG) into RGBA pixels.
///
/// # Errors
///
/// Returns an error if the bytes are not a supported image or the image is
/// empty.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsRasterImage, JsValue> {
    raster::decode_image(bytes)
        .map(JsRasterImage::from_raster)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode a JsRasterImage to PNG bytes.
///
/// Lossless, so transparent corners left by a rotation are kept.
#[wasm_bindgen]
pub fn encode_png(image: &JsRasterImage) -> Result<Vec<u8>, JsValue> {
    encode::encode_png(image.raster())
        .map(|blob| blob.into_bytes())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
