//! Decoded raster images for the crop pipeline.
//!
//! This module provides:
//! - [`RasterImage`], the RGBA8 pixel buffer every stage consumes and produces
//! - Decoding from an in-memory byte source (PNG or JPEG)
//!
//! Fetching the bytes (network, file picker) belongs to the caller; this
//! module only turns bytes into pixels and refuses buffers it cannot trust.
//!
//! # Examples
//!
//! ```ignore
//! use cropkit_core::raster::decode_image;
//!
//! let bytes = std::fs::read("logo.png").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod decode;
mod types;

pub use decode::decode_image;
pub use types::{ImageLoadError, RasterImage, TRANSPARENT};
