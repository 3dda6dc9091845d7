//! Reading a crop rectangle out of the rotated canvas.

use crate::geometry::RotatedFrameRect;
use crate::raster::RasterImage;

/// Copy the `crop` region of `canvas` into `output`.
///
/// `output` must be `crop.width × crop.height` and fully transparent; the
/// canvas pixel at `(crop.x, crop.y)` lands at `(0, 0)`. Parts of the crop
/// outside the canvas are left untouched, so they stay transparent.
pub(crate) fn copy_region(canvas: &RasterImage, crop: RotatedFrameRect, output: &mut RasterImage) {
    debug_assert_eq!((output.width, output.height), (crop.width(), crop.height()));

    let Some((x0, y0, x1, y1)) = crop.clip_to(canvas.width, canvas.height) else {
        return;
    };

    let channels = RasterImage::CHANNELS;
    let row_bytes = (x1 - x0) as usize * channels;
    let dst_x = (x0 as i64 - crop.x() as i64) as usize;

    for src_y in y0..y1 {
        let dst_y = (src_y as i64 - crop.y() as i64) as usize;

        let src_start = (src_y as usize * canvas.width as usize + x0 as usize) * channels;
        let dst_start = (dst_y * output.width as usize + dst_x) * channels;

        output.pixels[dst_start..dst_start + row_bytes]
            .copy_from_slice(&canvas.pixels[src_start..src_start + row_bytes]);
    }
}
