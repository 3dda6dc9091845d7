//! Cropkit WASM - WebAssembly bindings for the crop-and-rotate pipeline
//!
//! This crate exposes cropkit-core to the dashboard's TypeScript code.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper for RGBA image data
//! - `crop` - Bounding box geometry, the initial crop area and one-shot compose
//! - `encode` - Byte-source decoding and PNG export
//! - `session` - The cropper dialog's state machine
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, JsCropSession } from '@cropkit/wasm';
//!
//! await init();
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const session = new JsCropSession();
//! session.set_rotation(12);
//! session.on_crop_complete(40, 40, 256, 256, 1.5);
//! const png = session.save(image);
//! const blob = new Blob([png], { type: 'image/png' });
//! ```
//!
//! Export runs synchronously here; call it from a Web Worker to keep the page
//! responsive.

use wasm_bindgen::prelude::*;

mod crop;
mod encode;
mod session;
mod types;

pub use crop::{centered_crop, compose_crop, rotated_bounding_box, JsBoundingBox, JsCropRect};
pub use encode::{decode_image, encode_png};
pub use session::JsCropSession;
pub use types::JsRasterImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
