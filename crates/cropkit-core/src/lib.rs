//! Cropkit Core - crop-and-rotate pipeline
//!
//! This crate turns a source image, a rotation angle and a crop rectangle into
//! an encoded PNG, and tracks the interactive state of the cropper that
//! produces those inputs.
//!
//! The pipeline, leaves first:
//! - [`geometry`]: rotated bounding boxes and coordinate frames
//! - [`compose`]: rotate onto a surface, then cut out the crop
//! - [`encode`]: lossless export of the cropped surface
//! - [`session`]: the `Idle → Adjusting → Committing` state machine

pub mod compose;
pub mod encode;
pub mod geometry;
pub mod raster;
pub mod session;

pub use compose::{compose, ComposeError, Compositor, InterpolationFilter};
pub use encode::{encode_png, EncodeError, EncodedBlob, MediaType};
pub use geometry::{
    rotated_bounding_box, Angle, AspectRatio, BoundingBox, RotatedFrame, RotatedFrameRect,
    SourceRect,
};
pub use raster::{decode_image, ImageLoadError, RasterImage};
pub use session::{centered_crop, CommitError, CropSession, SessionError, SessionState};

#[cfg(feature = "async")]
pub use encode::encode;

/// Settings for a crop session and its compositor.
///
/// Missing fields take their defaults when deserialized, so a partial
/// config from the dashboard is enough.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Target crop ratio passed to the cropper (default 1:1)
    pub aspect: AspectRatio,
    /// Lower zoom bound, also the zoom a reset returns to
    pub min_zoom: f64,
    /// Upper zoom bound
    pub max_zoom: f64,
    /// Sampling filter for the rotated draw
    pub filter: InterpolationFilter,
    /// Largest surface, in pixels, a compose may allocate. `None` is unbounded.
    /// Defaults to [`compose::DEFAULT_MAX_SURFACE_PIXELS`].
    pub max_surface_pixels: Option<u64>,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            aspect: AspectRatio::SQUARE,
            min_zoom: 1.0,
            max_zoom: 5.0,
            filter: InterpolationFilter::Bilinear,
            max_surface_pixels: Some(compose::DEFAULT_MAX_SURFACE_PIXELS),
        }
    }
}

impl CropConfig {
    /// Create a new CropConfig with default values
    pub fn new() -> Self {
        Self::default()
    }
}
