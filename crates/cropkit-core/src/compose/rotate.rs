//! Drawing the source image onto the rotated canvas.
//!
//! # Algorithm
//!
//! The draw uses inverse mapping: for each pixel centre on the canvas we ask
//! [`RotatedFrame::rotated_to_source`] where it came from and sample the
//! source there. Samples outside the source are transparent, so the corners
//! the rotated image does not reach stay at alpha 0.
//!
//! Colour is interpolated on premultiplied alpha so that transparent source
//! pixels never bleed their (meaningless) colour into the edges.

use serde::{Deserialize, Serialize};

use crate::geometry::RotatedFrame;
use crate::raster::{RasterImage, TRANSPARENT};

/// Interpolation filter for the rotated draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationFilter {
    /// Nearest source pixel, hard edges.
    Nearest,
    /// Weighted 2x2 neighbourhood, what a browser canvas does by default.
    #[default]
    Bilinear,
}

/// Draw `image` onto `surface` through the frame's transform.
///
/// `surface` must be the frame's canvas size; it is fully overwritten.
pub(crate) fn draw_rotated(
    image: &RasterImage,
    frame: &RotatedFrame,
    surface: &mut RasterImage,
    filter: InterpolationFilter,
) {
    debug_assert_eq!((surface.width, surface.height), frame.canvas_size());

    let width = surface.width as usize;
    for (idx, px) in surface
        .pixels
        .chunks_exact_mut(RasterImage::CHANNELS)
        .enumerate()
    {
        let dst_x = (idx % width) as f64 + 0.5;
        let dst_y = (idx / width) as f64 + 0.5;
        let (src_x, src_y) = frame.rotated_to_source(dst_x, dst_y);

        let sample = match filter {
            InterpolationFilter::Nearest => sample_nearest(image, src_x, src_y),
            InterpolationFilter::Bilinear => sample_bilinear(image, src_x, src_y),
        };
        px.copy_from_slice(&sample);
    }
}

/// Sample the pixel whose square contains `(x, y)`.
fn sample_nearest(image: &RasterImage, x: f64, y: f64) -> [u8; 4] {
    if !x.is_finite() || !y.is_finite() {
        return TRANSPARENT;
    }
    image.pixel(x.floor() as i64, y.floor() as i64)
}

/// Sample a pixel using bilinear interpolation.
///
/// `(x, y)` is a continuous coordinate where pixel `(i, j)` covers
/// `[i, i+1) × [j, j+1)`, so its centre is at `(i + 0.5, j + 0.5)`.
/// Neighbours outside the image count as transparent.
fn sample_bilinear(image: &RasterImage, x: f64, y: f64) -> [u8; 4] {
    if !x.is_finite() || !y.is_finite() {
        return TRANSPARENT;
    }

    let sx = x - 0.5;
    let sy = y - 0.5;
    let x0 = sx.floor();
    let y0 = sy.floor();
    let fx = sx - x0;
    let fy = sy - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let taps = [
        (image.pixel(x0, y0), (1.0 - fx) * (1.0 - fy)),
        (image.pixel(x0 + 1, y0), fx * (1.0 - fy)),
        (image.pixel(x0, y0 + 1), (1.0 - fx) * fy),
        (image.pixel(x0 + 1, y0 + 1), fx * fy),
    ];

    let mut alpha = 0.0f64;
    let mut premul = [0.0f64; 3];
    for (px, weight) in taps {
        if weight == 0.0 || px[3] == 0 {
            continue;
        }
        let a = px[3] as f64 * weight;
        alpha += a;
        for c in 0..3 {
            premul[c] += px[c] as f64 * a;
        }
    }

    if alpha <= 0.0 {
        return TRANSPARENT;
    }

    let mut result = [0u8; 4];
    for c in 0..3 {
        result[c] = (premul[c] / alpha).clamp(0.0, 255.0).round() as u8;
    }
    result[3] = alpha.clamp(0.0, 255.0).round() as u8;
    result
}
