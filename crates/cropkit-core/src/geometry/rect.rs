//! Frame-tagged pixel rectangles and aspect ratios.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from constructing geometry values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A rectangle with no area.
    #[error("Empty rectangle: width ({width}) and height ({height}) must be non-zero")]
    EmptyRect { width: u32, height: u32 },

    /// A coordinate or size that is NaN or infinite.
    #[error("Non-finite value in rectangle")]
    NonFinite,

    /// Aspect ratio that is zero, negative or not finite.
    #[error("Invalid aspect ratio: {0}")]
    InvalidAspectRatio(f64),
}

/// Marker for the coordinate frame a [`Rect`] is measured against.
pub trait FrameSpace {
    const NAME: &'static str;
}

/// Pixel frame of the unrotated source image.
#[derive(Debug)]
pub enum SourceSpace {}

/// Pixel frame of the rotated bounding-box canvas.
#[derive(Debug)]
pub enum RotatedSpace {}

impl FrameSpace for SourceSpace {
    const NAME: &'static str = "SourceRect";
}

impl FrameSpace for RotatedSpace {
    const NAME: &'static str = "RotatedFrameRect";
}

/// Rectangle in the source image's pixel frame.
pub type SourceRect = Rect<SourceSpace>;

/// Rectangle in the rotated canvas's pixel frame. This is what the
/// compositor crops with.
pub type RotatedFrameRect = Rect<RotatedSpace>;

/// Axis-aligned pixel rectangle tagged with its coordinate frame.
///
/// `x` and `y` may be negative; `width` and `height` are always at least 1.
pub struct Rect<F: FrameSpace> {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    frame: PhantomData<F>,
}

impl<F: FrameSpace> Rect<F> {
    /// Create a rectangle, refusing an empty one.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::EmptyRect { width, height });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
            frame: PhantomData,
        })
    }

    /// Rectangle at `(0, 0)` covering a surface; zero sides are raised to 1.
    pub(crate) fn at_origin(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width: width.max(1),
            height: height.max(1),
            frame: PhantomData,
        }
    }

    /// Create a rectangle from real-valued pixels, rounding each component.
    ///
    /// The cropper reports fractional pixel areas; they are rounded to the
    /// nearest whole pixel the way a canvas `drawImage` call would snap them.
    pub fn from_f64(x: f64, y: f64, width: f64, height: f64) -> Result<Self, GeometryError> {
        if !(x.is_finite() && y.is_finite() && width.is_finite() && height.is_finite()) {
            return Err(GeometryError::NonFinite);
        }
        let clamp_i32 = |v: f64| v.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32;
        let clamp_u32 = |v: f64| v.round().clamp(0.0, u32::MAX as f64) as u32;
        Self::new(clamp_i32(x), clamp_i32(y), clamp_u32(width), clamp_u32(height))
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Same rectangle moved by `(dx, dy)`, saturating at the i32 range.
    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..*self
        }
    }

    /// Overlap with a `width × height` surface anchored at the origin, as
    /// `(x0, y0, x1, y1)` with exclusive ends. `None` when disjoint.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = (self.x as i64).max(0);
        let y0 = (self.y as i64).max(0);
        let x1 = self.right().min(width as i64);
        let y1 = self.bottom().min(height as i64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

impl<F: FrameSpace> Clone for Rect<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: FrameSpace> Copy for Rect<F> {}

impl<F: FrameSpace> PartialEq for Rect<F> {
    fn eq(&self, other: &Self) -> bool {
        (self.x, self.y, self.width, self.height) == (other.x, other.y, other.width, other.height)
    }
}

impl<F: FrameSpace> Eq for Rect<F> {}

impl<F: FrameSpace> Hash for Rect<F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.x, self.y, self.width, self.height).hash(state);
    }
}

impl<F: FrameSpace> fmt::Debug for Rect<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(F::NAME)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Target `width / height` of the crop area.
///
/// Only the interactive cropper enforces this; the compositor crops whatever
/// rectangle it is handed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct AspectRatio(f64);

impl AspectRatio {
    /// Square crop, the dashboard's logo/avatar default.
    pub const SQUARE: AspectRatio = AspectRatio(1.0);

    pub fn new(ratio: f64) -> Result<Self, GeometryError> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(GeometryError::InvalidAspectRatio(ratio));
        }
        Ok(Self(ratio))
    }

    pub fn from_dimensions(width: u32, height: u32) -> Result<Self, GeometryError> {
        if height == 0 {
            return Err(GeometryError::InvalidAspectRatio(f64::INFINITY));
        }
        Self::new(width as f64 / height as f64)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Largest `(width, height)` with this ratio that fits inside the given area.
    pub fn largest_within(self, width: f64, height: f64) -> (f64, f64) {
        if width / height > self.0 {
            (height * self.0, height)
        } else {
            (width, width / self.0)
        }
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::SQUARE
    }
}

impl TryFrom<f64> for AspectRatio {
    type Error = GeometryError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AspectRatio> for f64 {
    fn from(ratio: AspectRatio) -> Self {
        ratio.0
    }
}
