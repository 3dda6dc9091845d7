//! Rotation geometry: bounding boxes and coordinate frames.
//!
//! Everything here is pure math with no allocation or I/O.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y grows downward
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - Two pixel frames exist and are kept apart by type:
//!   - [`SourceRect`]: measured against the unrotated source image
//!   - [`RotatedFrameRect`]: measured against the canvas that holds the
//!     rotated image (its bounding box, rounded up to whole pixels)
//!
//! # Transform Order
//!
//! The source is placed on the rotated canvas by
//! `translate(canvas centre) · rotate(θ) · translate(-w/2, -h/2)`.
//! [`RotatedFrame`] owns that transform and its inverse.

mod angle;
mod bounds;
mod frame;
mod rect;

pub use angle::Angle;
pub use bounds::{rotated_bounding_box, BoundingBox};
pub use frame::RotatedFrame;
pub use rect::{
    AspectRatio, FrameSpace, GeometryError, Rect, RotatedFrameRect, RotatedSpace, SourceRect,
    SourceSpace,
};
