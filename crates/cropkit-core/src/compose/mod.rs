//! Raster compositing: rotate onto a canvas, then cut out the crop.
//!
//! Compositing is two passes over caller-owned surfaces:
//!
//! 1. Allocate a canvas the size of the rotated bounding box and draw the
//!    source onto it through `translate · rotate · translate`.
//! 2. Allocate an output surface the size of the crop and copy the crop
//!    region of the canvas into it.
//!
//! The crop rectangle is a [`RotatedFrameRect`]: it is measured against the
//! canvas from step 1, not against the unrotated source. Any part of it that
//! falls outside the canvas comes out transparent.
//!
//! # Examples
//!
//! ```ignore
//! use cropkit_core::compose::compose;
//! use cropkit_core::geometry::{Angle, RotatedFrameRect};
//!
//! let crop = RotatedFrameRect::new(10, 10, 64, 64)?;
//! let avatar = compose(&image, crop, Angle::from_degrees(15.0))?;
//! ```

mod extract;
mod rotate;
mod surface;

pub use rotate::InterpolationFilter;
pub use surface::{
    AllocationFailure, HeapAllocator, SurfaceAllocationError, SurfaceAllocator,
    DEFAULT_MAX_SURFACE_PIXELS,
};

use thiserror::Error;
use tracing::debug;

use crate::geometry::{Angle, RotatedFrame, RotatedFrameRect};
use crate::raster::{ImageLoadError, RasterImage};
use crate::CropConfig;

/// Errors that can occur while compositing.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The source image is malformed and cannot be drawn.
    #[error("Invalid source image: {0}")]
    InvalidImage(#[from] ImageLoadError),

    /// A drawable surface could not be obtained.
    #[error(transparent)]
    SurfaceAllocation(#[from] SurfaceAllocationError),
}

/// Draws rotated crops using a chosen allocator and filter.
#[derive(Debug, Clone, Default)]
pub struct Compositor<A = HeapAllocator> {
    allocator: A,
    filter: InterpolationFilter,
}

impl Compositor<HeapAllocator> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a compositor honouring the config's filter and surface budget.
    pub fn from_config(config: &CropConfig) -> Self {
        let allocator = match config.max_surface_pixels {
            Some(limit) => HeapAllocator::with_max_pixels(limit),
            None => HeapAllocator::unbounded(),
        };
        Self {
            allocator,
            filter: config.filter,
        }
    }
}

impl<A: SurfaceAllocator> Compositor<A> {
    /// Swap the surface source, keeping the filter.
    pub fn with_allocator<B: SurfaceAllocator>(self, allocator: B) -> Compositor<B> {
        Compositor {
            allocator,
            filter: self.filter,
        }
    }

    pub fn with_filter(mut self, filter: InterpolationFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn filter(&self) -> InterpolationFilter {
        self.filter
    }

    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Draw `image` rotated by `rotation` onto a fresh canvas sized to the
    /// rotated bounding box.
    pub fn render_rotated(
        &self,
        image: &RasterImage,
        rotation: Angle,
    ) -> Result<RasterImage, ComposeError> {
        image.validate()?;
        let frame = RotatedFrame::new(image.width, image.height, rotation);
        self.draw(image, &frame)
    }

    fn draw(&self, image: &RasterImage, frame: &RotatedFrame) -> Result<RasterImage, ComposeError> {
        let (width, height) = frame.canvas_size();
        let mut canvas = self.allocator.allocate(width, height)?;
        rotate::draw_rotated(image, frame, &mut canvas, self.filter);
        Ok(canvas)
    }

    /// Copy `crop` out of an already rotated canvas.
    pub fn extract(
        &self,
        canvas: &RasterImage,
        crop: RotatedFrameRect,
    ) -> Result<RasterImage, ComposeError> {
        let mut output = self.allocator.allocate(crop.width(), crop.height())?;
        extract::copy_region(canvas, crop, &mut output);
        Ok(output)
    }

    /// Rotate `image` and cut `crop` out of the rotated canvas.
    ///
    /// The result is exactly `crop.width × crop.height`. Identical inputs give
    /// pixel-identical output; nothing is cached between calls.
    pub fn compose(
        &self,
        image: &RasterImage,
        crop: RotatedFrameRect,
        rotation: Angle,
    ) -> Result<RasterImage, ComposeError> {
        image.validate()?;

        let frame = RotatedFrame::new(image.width, image.height, rotation);
        let (canvas_w, canvas_h) = frame.canvas_size();
        debug!(
            source_width = image.width,
            source_height = image.height,
            angle = rotation.normalized(),
            canvas_width = canvas_w,
            canvas_height = canvas_h,
            crop = ?crop,
            "composing crop"
        );

        let canvas = self.draw(image, &frame)?;
        self.extract(&canvas, crop)
    }
}

/// Compose with a default heap allocator and bilinear filtering.
pub fn compose(
    image: &RasterImage,
    crop: RotatedFrameRect,
    rotation: Angle,
) -> Result<RasterImage, ComposeError> {
    Compositor::new().compose(image, crop, rotation)
}



// ============================================================================
// Property-Based Tests
// ============================================================================
