//! Interactive crop session: the state behind the cropper dialog.
//!
//! A [`CropSession`] records pan, zoom, rotation and the last crop rectangle
//! reported by the cropper. Adjustments only update fields; all pixel work
//! waits for an explicit commit.
//!
//! ```text
//!            set_* / on_crop_complete
//!   Idle ───────────────────────────────▶ Adjusting
//!    ▲  ▲                                     │
//!    │  └────────── begin_commit ─────────────┤ (Idle works too once a crop is known)
//!    │                                        ▼
//!    └─── finish_commit / abort_commit / reset ─── Committing
//! ```
//!
//! A commit can be driven in one call ([`CropSession::commit`]) or in three
//! steps when the caller needs to drop its borrow of the session while the
//! encode runs:
//!
//! ```ignore
//! let request = session.begin_commit()?;
//! let result = request.execute(&image, &compositor).await;
//! let blob = session.finish_commit(request.id(), result)?;
//! ```
//!
//! A caller that gives up on a three-step commit calls
//! [`CropSession::abort_commit`] instead. The one-call forms do that on their
//! own when their future is dropped.

use thiserror::Error;
use tracing::{debug, warn};

use crate::compose::{ComposeError, Compositor, HeapAllocator, SurfaceAllocator};
use crate::encode::{encode_png, EncodeError, EncodedBlob};
use crate::geometry::{Angle, AspectRatio, GeometryError, RotatedFrame, RotatedFrameRect};
use crate::raster::{ImageLoadError, RasterImage};
use crate::CropConfig;

/// Errors from driving the session state machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// A commit is in flight; adjustments and further commits must wait.
    #[error("A commit is already in progress")]
    Busy,

    /// Commit requested before the cropper reported any crop rectangle.
    #[error("No crop area has been selected")]
    NoCropArea,

    /// Rotation that is NaN or infinite.
    #[error("Rotation angle must be finite, got {0}")]
    NonFiniteAngle(f64),

    /// Pan or zoom that is NaN or infinite.
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },

    /// Zoom bounds that are not `0 < min <= max`.
    #[error("Invalid zoom range: min ({min}) must be positive and not exceed max ({max})")]
    InvalidZoomRange { min: f64, max: f64 },
}

/// Anything that can stop a commit from producing a blob.
#[derive(Debug, Error)]
pub enum CommitError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    InvalidImage(#[from] ImageLoadError),

    #[error(transparent)]
    Compose(#[from] ComposeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Adjusting,
    Committing,
}

/// Inclusive zoom bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomRange {
    min: f64,
    max: f64,
}

impl ZoomRange {
    pub fn new(min: f64, max: f64) -> Result<Self, SessionError> {
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
            return Err(SessionError::InvalidZoomRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min, self.max)
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self { min: 1.0, max: 5.0 }
    }
}

/// The user-adjustable transform. Pan and zoom belong to the cropper's view;
/// only the rotation reaches the compositor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformParams {
    pub pan: (f64, f64),
    pub zoom: f64,
    pub rotation: Angle,
}

impl TransformParams {
    fn initial(zoom_range: &ZoomRange) -> Self {
        Self {
            pan: (0.0, 0.0),
            zoom: zoom_range.min(),
            rotation: Angle::ZERO,
        }
    }
}

/// Identifies one commit so a late `finish_commit` cannot close a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommitId(u64);

/// Snapshot of the crop and rotation taken when a commit starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommitRequest {
    id: CommitId,
    crop: RotatedFrameRect,
    rotation: Angle,
}

impl CommitRequest {
    pub fn id(&self) -> CommitId {
        self.id
    }

    pub fn crop(&self) -> RotatedFrameRect {
        self.crop
    }

    pub fn rotation(&self) -> Angle {
        self.rotation
    }

    fn compose<A: SurfaceAllocator>(
        &self,
        image: &RasterImage,
        compositor: &Compositor<A>,
    ) -> Result<RasterImage, CommitError> {
        image.validate()?;
        Ok(compositor.compose(image, self.crop, self.rotation)?)
    }

    /// Compose on the caller, then await the encode on the blocking pool.
    #[cfg(feature = "async")]
    pub async fn execute<A: SurfaceAllocator>(
        &self,
        image: &RasterImage,
        compositor: &Compositor<A>,
    ) -> Result<EncodedBlob, CommitError> {
        let surface = self.compose(image, compositor)?;
        Ok(crate::encode::encode(surface).await?)
    }

    /// Compose and encode on the current thread.
    pub fn execute_blocking<A: SurfaceAllocator>(
        &self,
        image: &RasterImage,
        compositor: &Compositor<A>,
    ) -> Result<EncodedBlob, CommitError> {
        let surface = self.compose(image, compositor)?;
        Ok(encode_png(&surface)?)
    }
}

/// State of one crop dialog.
#[derive(Debug, Clone)]
pub struct CropSession {
    config: CropConfig,
    zoom_range: ZoomRange,
    state: SessionState,
    params: TransformParams,
    crop: Option<RotatedFrameRect>,
    in_flight: Option<CommitId>,
    next_commit: u64,
}

impl Default for CropSession {
    fn default() -> Self {
        let zoom_range = ZoomRange::default();
        Self {
            config: CropConfig::default(),
            zoom_range,
            state: SessionState::Idle,
            params: TransformParams::initial(&zoom_range),
            crop: None,
            in_flight: None,
            next_commit: 0,
        }
    }
}

impl CropSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CropConfig) -> Result<Self, SessionError> {
        let zoom_range = ZoomRange::new(config.min_zoom, config.max_zoom)?;
        Ok(Self {
            config,
            zoom_range,
            params: TransformParams::initial(&zoom_range),
            ..Self::default()
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_committing(&self) -> bool {
        self.state == SessionState::Committing
    }

    /// True when a save would be accepted right now.
    pub fn can_commit(&self) -> bool {
        self.crop.is_some() && self.in_flight.is_none()
    }

    pub fn params(&self) -> TransformParams {
        self.params
    }

    pub fn crop(&self) -> Option<RotatedFrameRect> {
        self.crop
    }

    pub fn aspect(&self) -> AspectRatio {
        self.config.aspect
    }

    pub fn zoom_range(&self) -> ZoomRange {
        self.zoom_range
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "crop session state change");
            self.state = next;
        }
    }

    fn begin_adjust(&mut self) -> Result<(), SessionError> {
        if self.is_committing() {
            return Err(SessionError::Busy);
        }
        self.transition(SessionState::Adjusting);
        Ok(())
    }

    pub fn set_pan(&mut self, x: f64, y: f64) -> Result<(), SessionError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(SessionError::NonFinite { field: "pan" });
        }
        self.begin_adjust()?;
        self.params.pan = (x, y);
        Ok(())
    }

    /// Set the zoom, clamped into the configured range. Returns the value kept.
    pub fn set_zoom(&mut self, zoom: f64) -> Result<f64, SessionError> {
        if !zoom.is_finite() {
            return Err(SessionError::NonFinite { field: "zoom" });
        }
        self.begin_adjust()?;
        self.params.zoom = self.zoom_range.clamp(zoom);
        Ok(self.params.zoom)
    }

    pub fn set_rotation(&mut self, degrees: f64) -> Result<(), SessionError> {
        if !degrees.is_finite() {
            return Err(SessionError::NonFiniteAngle(degrees));
        }
        self.begin_adjust()?;
        self.params.rotation = Angle::from_degrees(degrees);
        Ok(())
    }

    /// Record the cropper's latest rectangle, in the rotated frame, and the
    /// zoom it was drawn at.
    pub fn on_crop_complete(&mut self, rect: RotatedFrameRect, zoom: f64) -> Result<(), SessionError> {
        if !zoom.is_finite() {
            return Err(SessionError::NonFinite { field: "zoom" });
        }
        self.begin_adjust()?;
        self.crop = Some(rect);
        self.params.zoom = self.zoom_range.clamp(zoom);
        Ok(())
    }

    /// Snapshot the crop and rotation and enter `Committing`.
    pub fn begin_commit(&mut self) -> Result<CommitRequest, SessionError> {
        if self.in_flight.is_some() {
            return Err(SessionError::Busy);
        }
        let crop = self.crop.ok_or(SessionError::NoCropArea)?;

        let id = CommitId(self.next_commit);
        self.next_commit += 1;
        self.in_flight = Some(id);
        self.transition(SessionState::Committing);

        Ok(CommitRequest {
            id,
            crop,
            rotation: self.params.rotation,
        })
    }

    /// Close the commit `id`, returning its result unchanged.
    ///
    /// The session leaves `Committing` on success and failure alike.
    pub fn finish_commit<T, E>(&mut self, id: CommitId, result: Result<T, E>) -> Result<T, E> {
        if self.in_flight != Some(id) {
            warn!(?id, "finish_commit for a commit that is not in flight");
            return result;
        }
        self.in_flight = None;
        if self.is_committing() {
            self.transition(SessionState::Idle);
        }
        result
    }

    /// Give up on commit `id` without a result, for a caller that cancelled
    /// it or dropped its future. Returns false if `id` was not in flight.
    ///
    /// Whatever the abandoned commit still produces is discarded by the
    /// caller; the session is free for the next save.
    pub fn abort_commit(&mut self, id: CommitId) -> bool {
        if self.in_flight != Some(id) {
            return false;
        }
        warn!(?id, "commit abandoned before it finished");
        self.in_flight = None;
        if self.is_committing() {
            self.transition(SessionState::Idle);
        }
        true
    }

    /// Restore the default transform and forget the crop rectangle.
    ///
    /// The source image is untouched. A commit already running keeps the
    /// re-entrancy guard armed until it is finished or aborted.
    pub fn reset(&mut self) {
        self.params = TransformParams::initial(&self.zoom_range);
        self.crop = None;
        self.transition(SessionState::Idle);
    }

    /// Compositor built from this session's config.
    pub fn compositor(&self) -> Compositor<HeapAllocator> {
        Compositor::from_config(&self.config)
    }

    /// Run a whole commit with the configured compositor.
    #[cfg(feature = "async")]
    pub async fn commit(&mut self, image: &RasterImage) -> Result<EncodedBlob, CommitError> {
        let compositor = self.compositor();
        self.commit_with(image, &compositor).await
    }

    #[cfg(feature = "async")]
    pub async fn commit_with<A: SurfaceAllocator>(
        &mut self,
        image: &RasterImage,
        compositor: &Compositor<A>,
    ) -> Result<EncodedBlob, CommitError> {
        let request = self.begin_commit()?;
        let guard = CommitGuard {
            session: self,
            id: request.id(),
        };
        let result = request.execute(image, compositor).await;
        guard.session.finish_commit(guard.id, result)
    }

    /// Run a whole commit on the current thread.
    pub fn commit_blocking(&mut self, image: &RasterImage) -> Result<EncodedBlob, CommitError> {
        let compositor = self.compositor();
        self.commit_blocking_with(image, &compositor)
    }

    pub fn commit_blocking_with<A: SurfaceAllocator>(
        &mut self,
        image: &RasterImage,
        compositor: &Compositor<A>,
    ) -> Result<EncodedBlob, CommitError> {
        let request = self.begin_commit()?;
        let guard = CommitGuard {
            session: self,
            id: request.id(),
        };
        let result = request.execute_blocking(image, compositor);
        guard.session.finish_commit(guard.id, result)
    }
}

/// Aborts its commit when dropped before `finish_commit` ran, so a cancelled
/// `commit` future or a panic mid-commit cannot leave the session busy.
struct CommitGuard<'a> {
    session: &'a mut CropSession,
    id: CommitId,
}

impl Drop for CommitGuard<'_> {
    fn drop(&mut self) {
        self.session.abort_commit(self.id);
    }
}

/// Largest crop of `aspect` centred on the rotated canvas of an image.
///
/// This is the rectangle a cropper starts from before the user drags it.
pub fn centered_crop(
    image_width: u32,
    image_height: u32,
    rotation: Angle,
    aspect: AspectRatio,
) -> Result<RotatedFrameRect, GeometryError> {
    let frame = RotatedFrame::new(image_width, image_height, rotation);
    let (canvas_w, canvas_h) = frame.canvas_size();
    let (w, h) = aspect.largest_within(canvas_w as f64, canvas_h as f64);
    let (w, h) = (w.floor().max(1.0), h.floor().max(1.0));
    RotatedFrameRect::from_f64(
        ((canvas_w as f64 - w) / 2.0).floor(),
        ((canvas_h as f64 - h) / 2.0).floor(),
        w,
        h,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::test_support::FailingAllocator;
    use crate::compose::AllocationFailure;
    use crate::raster::decode_image;

    fn test_image(width: u32, height: u32) -> RasterImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[x as u8, y as u8, 90, 255]);
            }
        }
        RasterImage::new(width, height, pixels)
    }

    fn rect(x: i32, y: i32, w: u32, h: u32) -> RotatedFrameRect {
        RotatedFrameRect::new(x, y, w, h).unwrap()
    }

    #[test]
    fn test_new_session_defaults() {
        let session = CropSession::new();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.params().pan, (0.0, 0.0));
        assert_eq!(session.params().zoom, 1.0);
        assert_eq!(session.params().rotation, Angle::ZERO);
        assert_eq!(session.crop(), None);
        assert_eq!(session.aspect(), AspectRatio::SQUARE);
        assert!(!session.can_commit());
    }

    #[test]
    fn test_adjustment_enters_adjusting() {
        let mut session = CropSession::new();
        session.set_rotation(12.5).unwrap();
        assert_eq!(session.state(), SessionState::Adjusting);
        assert_eq!(session.params().rotation.degrees(), 12.5);

        session.set_pan(3.0, -4.0).unwrap();
        assert_eq!(session.params().pan, (3.0, -4.0));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut session = CropSession::new();
        assert_eq!(session.set_zoom(0.2).unwrap(), 1.0);
        assert_eq!(session.set_zoom(9.0).unwrap(), 5.0);
        assert_eq!(session.set_zoom(2.5).unwrap(), 2.5);

        session.on_crop_complete(rect(0, 0, 10, 10), 7.0).unwrap();
        assert_eq!(session.params().zoom, 5.0);
    }

    #[test]
    fn test_non_finite_input_refused() {
        let mut session = CropSession::new();
        assert!(matches!(
            session.set_rotation(f64::NAN),
            Err(SessionError::NonFiniteAngle(a)) if a.is_nan()
        ));
        assert_eq!(
            session.set_zoom(f64::INFINITY).unwrap_err(),
            SessionError::NonFinite { field: "zoom" }
        );
        assert_eq!(
            session.set_pan(0.0, f64::NEG_INFINITY).unwrap_err(),
            SessionError::NonFinite { field: "pan" }
        );
        // Refused input does not count as an adjustment
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_commit_without_crop() {
        let mut session = CropSession::new();
        session.set_rotation(30.0).unwrap();
        assert_eq!(session.begin_commit().unwrap_err(), SessionError::NoCropArea);
        assert_eq!(session.state(), SessionState::Adjusting);
    }

    #[test]
    fn test_commit_snapshots_crop_and_rotation() {
        let mut session = CropSession::new();
        session.set_rotation(90.0).unwrap();
        session.on_crop_complete(rect(4, 5, 6, 7), 2.0).unwrap();

        let request = session.begin_commit().unwrap();
        assert_eq!(session.state(), SessionState::Committing);
        assert_eq!(request.crop(), rect(4, 5, 6, 7));
        assert_eq!(request.rotation().degrees(), 90.0);
    }

    #[test]
    fn test_reentrant_commit_is_busy() {
        let mut session = CropSession::new();
        session.on_crop_complete(rect(0, 0, 5, 5), 1.0).unwrap();

        let request = session.begin_commit().unwrap();
        assert!(session.is_committing());
        assert!(!session.can_commit());
        assert_eq!(session.begin_commit().unwrap_err(), SessionError::Busy);
        assert_eq!(session.set_zoom(2.0).unwrap_err(), SessionError::Busy);
        assert_eq!(session.set_pan(1.0, 1.0).unwrap_err(), SessionError::Busy);

        let image = test_image(10, 10);
        let result = request.execute_blocking(&image, &Compositor::new());
        session.finish_commit(request.id(), result).unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.can_commit());
    }

    #[test]
    fn test_commit_from_idle_with_known_crop() {
        let mut session = CropSession::new();
        session.on_crop_complete(rect(0, 0, 4, 4), 1.0).unwrap();
        let image = test_image(8, 8);
        session.commit_blocking(&image).unwrap();
        assert_eq!(session.state(), SessionState::Idle);

        // A second save with nothing changed recomputes from the kept crop
        let blob = session.commit_blocking(&image).unwrap();
        let decoded = decode_image(blob.bytes()).unwrap();
        assert_eq!((decoded.width, decoded.height), (4, 4));
    }

    #[test]
    fn test_commit_blocking_produces_crop() {
        let mut session = CropSession::new();
        session.set_rotation(0.0).unwrap();
        session.on_crop_complete(rect(0, 0, 50, 50), 1.0).unwrap();

        let image = test_image(100, 100);
        let blob = session.commit_blocking(&image).unwrap();
        assert_eq!(session.state(), SessionState::Idle);

        let decoded = decode_image(blob.bytes()).unwrap();
        assert_eq!((decoded.width, decoded.height), (50, 50));
        assert_eq!(decoded.pixel(49, 49), image.pixel(49, 49));
    }

    #[test]
    fn test_allocation_failure_returns_to_idle() {
        let mut session = CropSession::new();
        session.on_crop_complete(rect(0, 0, 20, 20), 1.0).unwrap();
        assert_eq!(session.state(), SessionState::Adjusting);

        let compositor = Compositor::new().with_allocator(FailingAllocator::always());
        let request = session.begin_commit().unwrap();
        assert_eq!(session.state(), SessionState::Committing);

        let result = request.execute_blocking(&test_image(40, 40), &compositor);
        let err = session.finish_commit(request.id(), result).unwrap_err();

        assert_eq!(session.state(), SessionState::Idle);
        match err {
            CommitError::Compose(ComposeError::SurfaceAllocation(e)) => {
                assert!(matches!(e.reason, AllocationFailure::Refused(_)));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(session.can_commit());
    }

    #[test]
    fn test_invalid_image_returns_to_idle() {
        let mut session = CropSession::new();
        session.on_crop_complete(rect(0, 0, 2, 2), 1.0).unwrap();
        let broken = RasterImage {
            width: 3,
            height: 3,
            pixels: vec![1, 2, 3],
        };

        let err = session.commit_blocking(&broken).unwrap_err();
        assert!(matches!(err, CommitError::InvalidImage(_)));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut session = CropSession::new();
        session.set_pan(10.0, 20.0).unwrap();
        session.set_zoom(3.0).unwrap();
        session.set_rotation(45.0).unwrap();
        session.on_crop_complete(rect(1, 1, 3, 3), 3.0).unwrap();

        session.reset();

        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.params().pan, (0.0, 0.0));
        assert_eq!(session.params().zoom, 1.0);
        assert_eq!(session.params().rotation, Angle::ZERO);
        assert_eq!(session.crop(), None);
    }

    #[test]
    fn test_reset_during_commit_keeps_guard() {
        let mut session = CropSession::new();
        session.on_crop_complete(rect(0, 0, 2, 2), 1.0).unwrap();
        let request = session.begin_commit().unwrap();

        session.reset();
        assert_eq!(session.state(), SessionState::Idle);

        session.on_crop_complete(rect(0, 0, 3, 3), 1.0).unwrap();
        assert_eq!(session.begin_commit().unwrap_err(), SessionError::Busy);

        let result = request.execute_blocking(&test_image(4, 4), &Compositor::new());
        session.finish_commit(request.id(), result).unwrap();
        // The user kept adjusting after the reset; finishing does not undo that
        assert_eq!(session.state(), SessionState::Adjusting);
        assert!(session.begin_commit().is_ok());
    }

    #[test]
    fn test_stale_finish_is_ignored() {
        let mut session = CropSession::new();
        session.on_crop_complete(rect(0, 0, 2, 2), 1.0).unwrap();
        let first = session.begin_commit().unwrap();
        session.finish_commit(first.id(), Ok::<(), ()>(())).unwrap();

        let second = session.begin_commit().unwrap();
        session.finish_commit(first.id(), Ok::<(), ()>(())).unwrap();
        assert!(session.is_committing());

        session.finish_commit(second.id(), Ok::<(), ()>(())).unwrap();
        assert!(!session.is_committing());
    }

    #[test]
    fn test_encode_failure_returns_to_idle() {
        let mut session = CropSession::new();
        session.on_crop_complete(rect(0, 0, 4, 4), 1.0).unwrap();
        assert_eq!(session.state(), SessionState::Adjusting);

        let request = session.begin_commit().unwrap();
        assert_eq!(session.state(), SessionState::Committing);

        let result: Result<EncodedBlob, CommitError> =
            Err(EncodeError::EmptyOutput.into());
        let err = session.finish_commit(request.id(), result).unwrap_err();

        assert!(matches!(err, CommitError::Encode(EncodeError::EmptyOutput)));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.can_commit());
    }

    #[test]
    fn test_encode_task_failure_returns_to_idle() {
        let mut session = CropSession::new();
        session.on_crop_complete(rect(0, 0, 4, 4), 1.0).unwrap();
        let request = session.begin_commit().unwrap();

        let result: Result<EncodedBlob, CommitError> =
            Err(EncodeError::TaskFailed("task cancelled".to_string()).into());
        let err = session.finish_commit(request.id(), result).unwrap_err();

        assert!(matches!(err, CommitError::Encode(EncodeError::TaskFailed(_))));
        assert_eq!(session.state(), SessionState::Idle);

        // The retry goes through with the same crop
        let blob = session.commit_blocking(&test_image(8, 8)).unwrap();
        assert_eq!(decode_image(blob.bytes()).unwrap().width, 4);
    }

    #[test]
    fn test_abort_commit_frees_session() {
        let mut session = CropSession::new();
        session.on_crop_complete(rect(0, 0, 2, 2), 1.0).unwrap();
        let request = session.begin_commit().unwrap();

        assert!(session.abort_commit(request.id()));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.can_commit());

        // A second abort, or a late finish, of the same commit changes nothing
        assert!(!session.abort_commit(request.id()));
        let next = session.begin_commit().unwrap();
        session.finish_commit(request.id(), Ok::<(), ()>(())).unwrap();
        assert!(session.is_committing());
        session.finish_commit(next.id(), Ok::<(), ()>(())).unwrap();
    }

    #[test]
    fn test_abort_after_reset_frees_session() {
        let mut session = CropSession::new();
        session.on_crop_complete(rect(0, 0, 2, 2), 1.0).unwrap();
        let request = session.begin_commit().unwrap();

        session.reset();
        session.on_crop_complete(rect(0, 0, 3, 3), 1.0).unwrap();
        assert_eq!(session.begin_commit().unwrap_err(), SessionError::Busy);

        assert!(session.abort_commit(request.id()));
        // The user kept adjusting after the reset; aborting does not undo that
        assert_eq!(session.state(), SessionState::Adjusting);
        assert_eq!(session.begin_commit().unwrap().crop(), rect(0, 0, 3, 3));
    }

    #[test]
    fn test_dropped_guard_aborts_commit() {
        let mut session = CropSession::new();
        session.on_crop_complete(rect(0, 0, 2, 2), 1.0).unwrap();
        let request = session.begin_commit().unwrap();

        drop(CommitGuard {
            session: &mut session,
            id: request.id(),
        });

        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.can_commit());
    }

    #[test]
    fn test_guard_after_finish_is_noop() {
        let mut session = CropSession::new();
        session.on_crop_complete(rect(0, 0, 2, 2), 1.0).unwrap();
        let first = session.begin_commit().unwrap();
        session.finish_commit(first.id(), Ok::<(), ()>(())).unwrap();
        let second = session.begin_commit().unwrap();

        // A guard for the finished commit must not close the newer one
        drop(CommitGuard {
            session: &mut session,
            id: first.id(),
        });
        assert!(session.is_committing());
        session.finish_commit(second.id(), Ok::<(), ()>(())).unwrap();
    }

    #[test]
    fn test_with_config() {
        let config = CropConfig {
            min_zoom: 0.5,
            max_zoom: 2.0,
            aspect: AspectRatio::new(16.0 / 9.0).unwrap(),
            ..Default::default()
        };
        let mut session = CropSession::with_config(config).unwrap();
        assert_eq!(session.params().zoom, 0.5);
        assert_eq!(session.set_zoom(4.0).unwrap(), 2.0);
        assert_eq!(session.aspect().value(), 16.0 / 9.0);
    }

    #[test]
    fn test_with_config_rejects_bad_zoom_range() {
        let config = CropConfig {
            min_zoom: 3.0,
            max_zoom: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            CropSession::with_config(config),
            Err(SessionError::InvalidZoomRange { .. })
        ));
    }

    #[test]
    fn test_centered_crop_square() {
        let crop = centered_crop(200, 100, Angle::ZERO, AspectRatio::SQUARE).unwrap();
        assert_eq!(crop, rect(50, 0, 100, 100));

        let crop = centered_crop(200, 100, Angle::from_degrees(90.0), AspectRatio::SQUARE).unwrap();
        assert_eq!(crop, rect(0, 50, 100, 100));
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_cancelled_commit_does_not_leave_session_busy() {
        let mut session = CropSession::new();
        session.on_crop_complete(rect(0, 0, 256, 256), 1.0).unwrap();
        let image = test_image(256, 256);

        // The commit is polled until it waits on the encoder, then dropped
        tokio::select! {
            biased;
            _ = session.commit(&image) => {}
            _ = std::future::ready(()) => {}
        }

        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.can_commit());
        let blob = session.commit(&image).await.unwrap();
        assert_eq!(decode_image(blob.bytes()).unwrap().width, 256);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_cancelled_commit_then_reset() {
        let mut session = CropSession::new();
        session.on_crop_complete(rect(0, 0, 128, 128), 1.0).unwrap();
        let image = test_image(128, 128);

        tokio::select! {
            biased;
            _ = session.commit(&image) => {}
            _ = std::future::ready(()) => {}
        }
        session.reset();
        session.on_crop_complete(rect(0, 0, 16, 16), 1.0).unwrap();

        assert!(session.begin_commit().is_ok());
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_async_commit() {
        let mut session = CropSession::new();
        session.set_rotation(-90.0).unwrap();
        session.on_crop_complete(rect(0, 0, 10, 20), 1.0).unwrap();

        let blob = session.commit(&test_image(20, 10)).await.unwrap();
        assert_eq!(session.state(), SessionState::Idle);

        let decoded = decode_image(blob.bytes()).unwrap();
        assert_eq!((decoded.width, decoded.height), (10, 20));
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_async_commit_failure_returns_to_idle() {
        let mut session = CropSession::new();
        session.on_crop_complete(rect(0, 0, 8, 8), 1.0).unwrap();

        let compositor = Compositor::new().with_allocator(FailingAllocator::after(1));
        let err = session
            .commit_with(&test_image(8, 8), &compositor)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CommitError::Compose(ComposeError::SurfaceAllocation(_))
        ));
        assert_eq!(session.state(), SessionState::Idle);
    }
}
