//! WASM bindings for crop geometry and compositing.
//!
//! The preview only needs [`rotated_bounding_box`] to size its canvas; pixels
//! are produced by [`compose_crop`] or a session save.

use crate::types::{filter_from_flag, JsRasterImage};
use cropkit_core::compose::Compositor;
use cropkit_core::geometry::{self, Angle, AspectRatio, RotatedFrameRect};
use cropkit_core::session;
use wasm_bindgen::prelude::*;

/// Size of a rotated image's bounding box.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct JsBoundingBox {
    width: f64,
    height: f64,
    canvas_width: u32,
    canvas_height: u32,
}

#[wasm_bindgen]
impl JsBoundingBox {
    /// Exact bounding box width
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Exact bounding box height
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Whole-pixel canvas width that holds the rotated image
    #[wasm_bindgen(getter)]
    pub fn canvas_width(&self) -> u32 {
        self.canvas_width
    }

    /// Whole-pixel canvas height that holds the rotated image
    #[wasm_bindgen(getter)]
    pub fn canvas_height(&self) -> u32 {
        self.canvas_height
    }
}

/// Bounding box of a `width × height` image rotated by `angle_degrees`.
///
/// Positive angles turn clockwise, like CSS `rotate()`.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const bbox = rotated_bounding_box(img.width, img.height, 30);
/// canvas.width = bbox.canvas_width;
/// canvas.height = bbox.canvas_height;
/// ```
#[wasm_bindgen]
pub fn rotated_bounding_box(width: f64, height: f64, angle_degrees: f64) -> JsBoundingBox {
    let bbox = geometry::rotated_bounding_box(width, height, angle_degrees);
    let (canvas_width, canvas_height) = bbox.canvas_size();
    JsBoundingBox {
        width: bbox.width,
        height: bbox.height,
        canvas_width,
        canvas_height,
    }
}

/// Rotate `image` and cut out a crop measured on the rotated canvas.
///
/// `x` and `y` may be negative; any part of the crop outside the canvas is
/// transparent. The result is always `width × height`.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const avatar = compose_crop(image, 10, 10, 128, 128, 15, false);
/// ```
#[wasm_bindgen]
pub fn compose_crop(
    image: &JsRasterImage,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    angle_degrees: f64,
    use_nearest: bool,
) -> Result<JsRasterImage, JsValue> {
    let crop =
        RotatedFrameRect::new(x, y, width, height).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let result = Compositor::new()
        .with_filter(filter_from_flag(use_nearest))
        .compose(image.raster(), crop, Angle::from_degrees(angle_degrees))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(JsRasterImage::from_raster(result))
}

/// A crop area on the rotated canvas, in whole pixels.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct JsCropRect {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

#[wasm_bindgen]
impl JsCropRect {
    #[wasm_bindgen(getter)]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Largest crop of ratio `aspect` centred on the rotated canvas.
///
/// Use it as the cropper's starting rectangle when the dialog opens or the
/// rotation changes.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const start = centered_crop(img.width, img.height, session.rotation, session.aspect);
/// session.on_crop_complete(start.x, start.y, start.width, start.height, session.zoom);
/// ```
#[wasm_bindgen]
pub fn centered_crop(
    image_width: u32,
    image_height: u32,
    angle_degrees: f64,
    aspect: f64,
) -> Result<JsCropRect, JsValue> {
    let aspect = AspectRatio::new(aspect).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let rect = session::centered_crop(
        image_width,
        image_height,
        Angle::from_degrees(angle_degrees),
        aspect,
    )
    .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(JsCropRect {
        x: rect.x(),
        y: rect.y(),
        width: rect.width(),
        height: rect.height(),
    })
}
