//! Export pipeline for cropped surfaces.
//!
//! This module provides functionality for:
//! - Encoding an RGBA surface to a lossless PNG blob
//! - Running that encode off the caller's thread (feature `async`)
//!
//! # Architecture
//!
//! [`encode_png`] is the synchronous encoder. With the default `async`
//! feature, [`encode`] moves the same work onto Tokio's blocking pool so a
//! commit can await it. The WASM bindings build without the feature and call
//! [`encode_png`] directly.
//!
//! # Examples
//!
//! ```ignore
//! use cropkit_core::encode::encode_png;
//!
//! let blob = encode_png(&surface)?;
//! assert_eq!(blob.media_type().as_str(), "image/png");
//! ```

#[cfg(feature = "async")]
mod export;
mod png;

#[cfg(feature = "async")]
pub use export::encode;
pub use png::{encode_png, EncodeError, EncodedBlob, MediaType};
