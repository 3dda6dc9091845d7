//! PNG encoding for export.
//!
//! This module provides lossless PNG encoding using the `image` crate's PNG
//! encoder. Transparent corners from the rotation survive the round trip.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::ExtendedColorType;
use image::ImageEncoder;
use std::fmt;
use thiserror::Error;

use crate::raster::{ImageLoadError, RasterImage};

/// Errors that can occur during export encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The surface handed to the encoder is malformed
    #[error("Invalid surface: {0}")]
    InvalidSurface(#[from] ImageLoadError),

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),

    /// The encoder finished without producing any bytes
    #[error("Encoder produced no data")]
    EmptyOutput,

    /// The background encode task panicked or was cancelled
    #[error("Encode task failed: {0}")]
    TaskFailed(String),
}

/// Media type of an encoded blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Png,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Png => "image/png",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An encoded image, owned by whoever receives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBlob {
    bytes: Vec<u8>,
    media_type: MediaType,
}

impl EncodedBlob {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Encode an RGBA surface to PNG.
///
/// Uses best compression with adaptive filtering. The output is a complete
/// PNG file; nothing is returned unless the whole encode succeeded.
///
/// # Errors
///
/// * [`EncodeError::InvalidSurface`] if the buffer does not match the size
/// * [`EncodeError::EncodingFailed`] if the PNG encoder reports an error
/// * [`EncodeError::EmptyOutput`] if the encoder wrote nothing
pub fn encode_png(surface: &RasterImage) -> Result<EncodedBlob, EncodeError> {
    surface.validate()?;

    let mut buffer = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, FilterType::Adaptive);

    encoder
        .write_image(
            &surface.pixels,
            surface.width,
            surface.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    if buffer.is_empty() {
        return Err(EncodeError::EmptyOutput);
    }

    Ok(EncodedBlob {
        bytes: buffer,
        media_type: MediaType::Png,
    })
}
