//! Core raster types.

use thiserror::Error;

/// Fully transparent RGBA pixel, used for every sample outside a surface.
pub const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Errors raised when an image cannot be used as pipeline input.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    /// The bytes are not a recognised image format.
    #[error("Invalid or unsupported image format: {0}")]
    InvalidFormat(String),

    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel buffer length doesn't match the declared dimensions.
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },
}

/// A decoded image with RGBA pixel data.
///
/// Straight (non-premultiplied) alpha, row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order.
    /// Length should be width * height * 4.
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Bytes per RGBA pixel.
    pub const CHANNELS: usize = 4;

    /// Create a new RasterImage with the given dimensions and pixel data.
    ///
    /// Use [`RasterImage::try_new`] for buffers from outside the crate.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            Self::buffer_len(width, height).unwrap_or(usize::MAX),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a RasterImage, checking dimensions and buffer length.
    pub fn try_new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ImageLoadError> {
        let image = Self {
            width,
            height,
            pixels,
        };
        image.validate()?;
        Ok(image)
    }

    /// Check that this image can be fed to the compositor or encoder.
    pub fn validate(&self) -> Result<(), ImageLoadError> {
        if self.width == 0 || self.height == 0 {
            return Err(ImageLoadError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let expected = Self::buffer_len(self.width, self.height).ok_or(
            ImageLoadError::InvalidDimensions {
                width: self.width,
                height: self.height,
            },
        )?;
        if self.pixels.len() != expected {
            return Err(ImageLoadError::InvalidPixelData {
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }

    /// Create a RasterImage from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an image::RgbaImage, consuming the buffer.
    pub fn into_rgba_image(self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels)
    }

    /// Byte length of an RGBA buffer, `None` on overflow.
    pub fn buffer_len(width: u32, height: u32) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(Self::CHANNELS)
    }

    /// Pixel at `(x, y)`, or [`TRANSPARENT`] outside the image.
    #[inline]
    pub fn pixel(&self, x: i64, y: i64) -> [u8; 4] {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return TRANSPARENT;
        }
        let idx = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// True when every pixel has alpha 0.
    pub fn is_fully_transparent(&self) -> bool {
        self.pixels
            .chunks_exact(Self::CHANNELS)
            .all(|px| px[3] == 0)
    }
}
