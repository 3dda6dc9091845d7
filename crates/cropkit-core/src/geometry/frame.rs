//! The rotated canvas and its affine mapping to the source image.

use super::{rotated_bounding_box, Angle, BoundingBox, GeometryError, RotatedFrameRect, SourceRect};

/// Snap tolerance when rounding mapped corners out to whole pixels.
const SNAP_EPSILON: f64 = 1e-9;

/// Geometry of one source image rotated by one angle.
///
/// The source is centred on a canvas of `ceil(bbox)` pixels:
///
/// ```text
/// rotated = R(θ) · (source - source_centre) + canvas_centre
/// source  = R(-θ) · (rotated - canvas_centre) + source_centre
/// ```
///
/// With y pointing down, `R(θ)` turns clockwise on screen for positive θ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedFrame {
    source_width: u32,
    source_height: u32,
    angle: Angle,
    sin: f64,
    cos: f64,
    bbox: BoundingBox,
    canvas_width: u32,
    canvas_height: u32,
}

impl RotatedFrame {
    pub fn new(source_width: u32, source_height: u32, angle: Angle) -> Self {
        let (sin, cos) = angle.sin_cos();
        let bbox = rotated_bounding_box(
            source_width as f64,
            source_height as f64,
            angle.degrees(),
        );
        let (canvas_width, canvas_height) = bbox.canvas_size();
        Self {
            source_width,
            source_height,
            angle,
            sin,
            cos,
            bbox,
            canvas_width,
            canvas_height,
        }
    }

    pub fn angle(&self) -> Angle {
        self.angle
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    /// Whole-pixel size of the intermediate surface.
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    pub fn source_size(&self) -> (u32, u32) {
        (self.source_width, self.source_height)
    }

    /// Where the unrotated source's top-left corner would sit on the canvas
    /// if it were centred without turning.
    pub fn offset(&self) -> (f64, f64) {
        (
            (self.canvas_width as f64 - self.source_width as f64) / 2.0,
            (self.canvas_height as f64 - self.source_height as f64) / 2.0,
        )
    }

    fn source_centre(&self) -> (f64, f64) {
        (self.source_width as f64 / 2.0, self.source_height as f64 / 2.0)
    }

    fn canvas_centre(&self) -> (f64, f64) {
        (self.canvas_width as f64 / 2.0, self.canvas_height as f64 / 2.0)
    }

    /// Map a point from source coordinates onto the rotated canvas.
    #[inline]
    pub fn source_to_rotated(&self, x: f64, y: f64) -> (f64, f64) {
        let (scx, scy) = self.source_centre();
        let (ccx, ccy) = self.canvas_centre();
        let dx = x - scx;
        let dy = y - scy;
        (
            dx * self.cos - dy * self.sin + ccx,
            dx * self.sin + dy * self.cos + ccy,
        )
    }

    /// Map a point on the rotated canvas back to source coordinates.
    #[inline]
    pub fn rotated_to_source(&self, x: f64, y: f64) -> (f64, f64) {
        let (scx, scy) = self.source_centre();
        let (ccx, ccy) = self.canvas_centre();
        let dx = x - ccx;
        let dy = y - ccy;
        (
            dx * self.cos + dy * self.sin + scx,
            -dx * self.sin + dy * self.cos + scy,
        )
    }

    /// Axis-aligned rectangle on the canvas enclosing a source rectangle
    /// after rotation.
    pub fn source_rect_to_rotated(&self, rect: SourceRect) -> Result<RotatedFrameRect, GeometryError> {
        let corners = [
            (rect.x() as f64, rect.y() as f64),
            (rect.right() as f64, rect.y() as f64),
            (rect.x() as f64, rect.bottom() as f64),
            (rect.right() as f64, rect.bottom() as f64),
        ];

        let mut min = (f64::INFINITY, f64::INFINITY);
        let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for (x, y) in corners {
            let (rx, ry) = self.source_to_rotated(x, y);
            min = (min.0.min(rx), min.1.min(ry));
            max = (max.0.max(rx), max.1.max(ry));
        }

        let x0 = (min.0 + SNAP_EPSILON).floor();
        let y0 = (min.1 + SNAP_EPSILON).floor();
        let x1 = (max.0 - SNAP_EPSILON).ceil();
        let y1 = (max.1 - SNAP_EPSILON).ceil();
        RotatedFrameRect::from_f64(x0, y0, (x1 - x0).max(1.0), (y1 - y0).max(1.0))
    }

    /// The whole canvas as a crop rectangle.
    pub fn full_rect(&self) -> RotatedFrameRect {
        RotatedFrameRect::at_origin(self.canvas_width, self.canvas_height)
    }
}
