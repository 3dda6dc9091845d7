//! Byte-source decoding into [`RasterImage`].

use std::io::Cursor;

use image::ImageReader;
use tracing::debug;

use super::{ImageLoadError, RasterImage};

/// Decode an image from bytes into RGBA pixels.
///
/// The format is sniffed from the content. Orientation metadata is ignored;
/// pixels come out in stored order.
///
/// # Errors
///
/// Returns `ImageLoadError::InvalidFormat` if the bytes are not a decodable
/// image, and `ImageLoadError::InvalidDimensions` for an empty image.
pub fn decode_image(bytes: &[u8]) -> Result<RasterImage, ImageLoadError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ImageLoadError::InvalidFormat(e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| ImageLoadError::InvalidFormat(e.to_string()))?;

    let image = RasterImage::from_rgba_image(img.into_rgba8());
    image.validate()?;

    debug!(
        width = image.width,
        height = image.height,
        bytes = bytes.len(),
        "decoded source image"
    );
    Ok(image)
}
