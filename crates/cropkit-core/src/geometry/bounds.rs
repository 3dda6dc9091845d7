//! Bounding box of a rotated rectangle.

use super::Angle;

/// Slack applied before rounding a bounding box up to whole pixels, so that
/// `100.00000000001` from trig rounding still yields a 100 px canvas.
const CANVAS_EPSILON: f64 = 1e-9;

/// Real-valued size of the axis-aligned box around a rotated rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Whole-pixel canvas that holds this box: `ceil` of each side, at least 1.
    pub fn canvas_size(&self) -> (u32, u32) {
        (ceil_px(self.width), ceil_px(self.height))
    }
}

fn ceil_px(v: f64) -> u32 {
    if !v.is_finite() {
        return 1;
    }
    (v - CANVAS_EPSILON).ceil().clamp(1.0, u32::MAX as f64) as u32
}

/// Compute the bounding box of a `width × height` rectangle rotated about
/// its centre.
///
/// ```text
/// bbox_w = |cos θ| * w + |sin θ| * h
/// bbox_h = |sin θ| * w + |cos θ| * h
/// ```
///
/// # Arguments
///
/// * `width` - Original width
/// * `height` - Original height
/// * `angle_degrees` - Rotation angle in degrees, any finite value
///
/// # Example
///
/// ```
/// use cropkit_core::geometry::rotated_bounding_box;
///
/// let bbox = rotated_bounding_box(200.0, 100.0, 90.0);
/// assert_eq!((bbox.width, bbox.height), (100.0, 200.0));
/// ```
pub fn rotated_bounding_box(width: f64, height: f64, angle_degrees: f64) -> BoundingBox {
    let (sin, cos) = Angle::from_degrees(angle_degrees).sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());

    BoundingBox {
        width: cos * width + sin * height,
        height: sin * width + cos * height,
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
