//! Off-thread export on Tokio's blocking pool.

use tracing::{debug, warn};

use super::png::{encode_png, EncodeError, EncodedBlob};
use crate::raster::RasterImage;

/// Encode `surface` to PNG without blocking the calling task.
///
/// The surface moves onto the blocking pool and is dropped there once the
/// encode finishes. The future resolves exactly once, with the blob or the
/// first error.
pub async fn encode(surface: RasterImage) -> Result<EncodedBlob, EncodeError> {
    let (width, height) = (surface.width, surface.height);

    let blob = tokio::task::spawn_blocking(move || encode_png(&surface))
        .await
        .map_err(|e| {
            warn!(width, height, "encode task did not complete: {e}");
            EncodeError::TaskFailed(e.to_string())
        })??;

    debug!(width, height, bytes = blob.len(), "encoded png");
    Ok(blob)
}
