//! Drawable surfaces and the allocators that hand them out.
//!
//! Every surface is a zero-filled (fully transparent) [`RasterImage`] owned
//! by exactly one compose call. Nothing is pooled; a surface is dropped as
//! soon as the call that allocated it returns.

use thiserror::Error;

use crate::raster::RasterImage;

/// Why a surface could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationFailure {
    /// `width * height * 4` does not fit in memory addressing.
    #[error("buffer size overflows")]
    Overflow,

    /// The configured pixel budget is smaller than the request.
    #[error("exceeds limit of {limit} pixels")]
    LimitExceeded { limit: u64 },

    /// The system allocator refused the reservation.
    #[error("out of memory")]
    OutOfMemory,

    /// A custom allocator declined for its own reason.
    #[error("{0}")]
    Refused(String),
}

/// A drawable surface of the requested size could not be allocated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Surface allocation failed for {width}x{height}: {reason}")]
pub struct SurfaceAllocationError {
    pub width: u32,
    pub height: u32,
    pub reason: AllocationFailure,
}

impl SurfaceAllocationError {
    pub fn new(width: u32, height: u32, reason: AllocationFailure) -> Self {
        Self {
            width,
            height,
            reason,
        }
    }
}

/// Source of drawable surfaces for the compositor.
pub trait SurfaceAllocator {
    /// Allocate a fully transparent `width × height` RGBA surface.
    fn allocate(&self, width: u32, height: u32) -> Result<RasterImage, SurfaceAllocationError>;
}

impl<A: SurfaceAllocator + ?Sized> SurfaceAllocator for &A {
    fn allocate(&self, width: u32, height: u32) -> Result<RasterImage, SurfaceAllocationError> {
        (**self).allocate(width, height)
    }
}

/// Pixel budget of a default [`HeapAllocator`]: 64 megapixels, 256 MiB of RGBA.
pub const DEFAULT_MAX_SURFACE_PIXELS: u64 = 64 * 1024 * 1024;

/// Heap-backed allocator with a pixel budget.
///
/// `try_reserve_exact` alone is not enough on hosts that overcommit memory:
/// the reservation succeeds and zero-filling the buffer gets the process
/// killed. The budget turns such requests into an error up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapAllocator {
    max_pixels: Option<u64>,
}

impl Default for HeapAllocator {
    fn default() -> Self {
        Self::with_max_pixels(DEFAULT_MAX_SURFACE_PIXELS)
    }
}

impl HeapAllocator {
    /// Allocator limited to [`DEFAULT_MAX_SURFACE_PIXELS`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse surfaces larger than `max_pixels`.
    pub fn with_max_pixels(max_pixels: u64) -> Self {
        Self {
            max_pixels: Some(max_pixels),
        }
    }

    /// No budget; only the system allocator can refuse.
    pub fn unbounded() -> Self {
        Self { max_pixels: None }
    }

    pub fn max_pixels(&self) -> Option<u64> {
        self.max_pixels
    }
}

impl SurfaceAllocator for HeapAllocator {
    fn allocate(&self, width: u32, height: u32) -> Result<RasterImage, SurfaceAllocationError> {
        let fail = |reason| SurfaceAllocationError::new(width, height, reason);

        if let Some(limit) = self.max_pixels {
            if width as u64 * height as u64 > limit {
                return Err(fail(AllocationFailure::LimitExceeded { limit }));
            }
        }

        let len = RasterImage::buffer_len(width, height).ok_or(fail(AllocationFailure::Overflow))?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| fail(AllocationFailure::OutOfMemory))?;
        pixels.resize(len, 0);

        Ok(RasterImage::new(width, height, pixels))
    }
}
