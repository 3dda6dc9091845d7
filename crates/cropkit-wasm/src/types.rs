//! WASM-compatible wrapper types for image data.

use cropkit_core::raster::RasterImage;
use cropkit_core::InterpolationFilter;
use wasm_bindgen::prelude::*;

/// An RGBA image held in WASM memory.
///
/// Pixels are straight-alpha RGBA, 4 bytes per pixel, row-major; the same
/// layout as a canvas `ImageData`. `pixels()` copies them out to JavaScript.
#[wasm_bindgen]
pub struct JsRasterImage {
    inner: RasterImage,
}

#[wasm_bindgen]
impl JsRasterImage {
    /// Wrap RGBA pixel data, for example from `ctx.getImageData(...).data`.
    ///
    /// The buffer is checked when the image is first used, so a mismatched
    /// length fails there rather than here.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsRasterImage {
        JsRasterImage {
            inner: RasterImage {
                width,
                height,
                pixels,
            },
        }
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array (a copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsRasterImage {
    pub(crate) fn from_raster(inner: RasterImage) -> Self {
        Self { inner }
    }

    pub(crate) fn raster(&self) -> &RasterImage {
        &self.inner
    }
}

/// Nearest when asked for, bilinear otherwise.
pub(crate) fn filter_from_flag(use_nearest: bool) -> InterpolationFilter {
    if use_nearest {
        InterpolationFilter::Nearest
    } else {
        InterpolationFilter::Bilinear
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_raster_image_creation() {
        let img = JsRasterImage::new(100, 50, vec![0u8; 100 * 50 * 4]);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 20000);
    }

    #[test]
    fn test_pixels_are_copied() {
        let pixels = vec![255u8, 128, 64, 32, 16, 8, 4, 2];
        let img = JsRasterImage::new(2, 1, pixels.clone());
        assert_eq!(img.pixels(), pixels);
    }

    #[test]
    fn test_from_raster() {
        let raster = RasterImage::new(3, 2, vec![9u8; 3 * 2 * 4]);
        let img = JsRasterImage::from_raster(raster.clone());
        assert_eq!(img.raster(), &raster);
    }

    #[test]
    fn test_mismatched_buffer_is_kept_until_used() {
        let img = JsRasterImage::new(4, 4, vec![0u8; 3]);
        assert!(img.raster().validate().is_err());
    }

    #[test]
    fn test_filter_from_flag() {
        assert_eq!(filter_from_flag(true), InterpolationFilter::Nearest);
        assert_eq!(filter_from_flag(false), InterpolationFilter::Bilinear);
    }
}
