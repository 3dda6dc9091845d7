//! Crop session WASM bindings.
//!
//! Wraps [`CropSession`] for the cropper dialog. Adjustments are cheap field
//! updates; `save` runs compose and PNG export synchronously.

use crate::types::JsRasterImage;
use cropkit_core::session::{CropSession, SessionState};
use cropkit_core::{CropConfig, RotatedFrameRect};
use wasm_bindgen::prelude::*;

/// Crop session wrapper for JavaScript
#[wasm_bindgen]
pub struct JsCropSession {
    inner: CropSession,
}

#[wasm_bindgen]
impl JsCropSession {
    /// Create a session with the default config (1:1, zoom 1 to 5, bilinear)
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: CropSession::new(),
        }
    }

    /// Create a session from a config object such as
    /// `{ aspect: 1.5, max_zoom: 3, filter: "nearest" }`.
    pub fn with_config(config: JsValue) -> Result<JsCropSession, JsValue> {
        let config: CropConfig =
            serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let inner = CropSession::with_config(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { inner })
    }

    /// The active config as a plain object
    pub fn config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.config())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// `"idle"`, `"adjusting"` or `"committing"`
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        state_name(self.inner.state()).to_string()
    }

    /// True while a save is running; the save button should be disabled
    #[wasm_bindgen(getter)]
    pub fn is_committing(&self) -> bool {
        self.inner.is_committing()
    }

    #[wasm_bindgen(getter)]
    pub fn can_commit(&self) -> bool {
        self.inner.can_commit()
    }

    #[wasm_bindgen(getter)]
    pub fn pan_x(&self) -> f64 {
        self.inner.params().pan.0
    }

    #[wasm_bindgen(getter)]
    pub fn pan_y(&self) -> f64 {
        self.inner.params().pan.1
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.inner.params().zoom
    }

    /// Rotation in degrees, clockwise
    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> f64 {
        self.inner.params().rotation.degrees()
    }

    /// Target crop ratio for the cropper
    #[wasm_bindgen(getter)]
    pub fn aspect(&self) -> f64 {
        self.inner.aspect().value()
    }

    #[wasm_bindgen(getter)]
    pub fn has_crop(&self) -> bool {
        self.inner.crop().is_some()
    }

    pub fn set_pan(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.inner
            .set_pan(x, y)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Set the zoom; returns the value after clamping to the configured range
    pub fn set_zoom(&mut self, zoom: f64) -> Result<f64, JsValue> {
        self.inner
            .set_zoom(zoom)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn set_rotation(&mut self, degrees: f64) -> Result<(), JsValue> {
        self.inner
            .set_rotation(degrees)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Called by the cropper when a gesture ends, with the crop area in
    /// rotated-canvas pixels and the zoom it was drawn at.
    pub fn on_crop_complete(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        zoom: f64,
    ) -> Result<(), JsValue> {
        let rect = RotatedFrameRect::from_f64(x, y, width, height)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.inner
            .on_crop_complete(rect, zoom)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Back to pan 0, minimum zoom, no rotation and no crop
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Compose the current crop and encode it to PNG bytes.
    ///
    /// The session is back in `"idle"` afterwards whether or not this
    /// succeeds.
    pub fn save(&mut self, image: &JsRasterImage) -> Result<Vec<u8>, JsValue> {
        match self.inner.commit_blocking(image.raster()) {
            Ok(blob) => Ok(blob.into_bytes()),
            Err(e) => {
                #[cfg(target_arch = "wasm32")]
                web_sys::console::warn_1(&format!("crop save failed: {e}").into());
                Err(JsValue::from_str(&e.to_string()))
            }
        }
    }
}

impl Default for JsCropSession {
    fn default() -> Self {
        Self::new()
    }
}

fn state_name(state: SessionState) -> &'static str {
    match state {
        SessionState::Idle => "idle",
        SessionState::Adjusting => "adjusting",
        SessionState::Committing => "committing",
    }
}
