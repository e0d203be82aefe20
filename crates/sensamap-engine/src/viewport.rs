//! Display-space ↔ image-space coordinate mapping.
//!
//! The hand photograph is rendered into a widget with aspect-ratio-
//! preserving scaling and centering, so the image occupies only a
//! sub-rectangle of the widget (letterboxing). Pointer samples arrive
//! in display space; everything downstream of the gesture works in
//! image space. This module owns the conversion in both directions.
//!
//! Samples outside the letterboxed rect are rejected, not clamped: a
//! drag that leaves the image boundary simply stops accumulating
//! points until it re-enters.

use serde::{Deserialize, Serialize};

use crate::types::{Dimensions, Point};

/// The sub-rectangle of the display area actually covered by the image
/// after aspect-ratio-preserving scaling and centering.
///
/// This is NOT the full widget bounds; use [`fit`](Self::fit) to derive
/// it from the widget size and the image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportRect {
    /// Left edge in display pixels.
    pub x: f64,
    /// Top edge in display pixels.
    pub y: f64,
    /// Width in display pixels.
    pub width: f64,
    /// Height in display pixels.
    pub height: f64,
}

impl ViewportRect {
    /// Create a viewport rect from its origin and size.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Compute the letterboxed rect the image occupies inside a widget
    /// of the given display size.
    ///
    /// The image is scaled by `min(dw/iw, dh/ih)` and centered; the
    /// returned rect is the scaled image's extent. Empty images or
    /// non-positive display sizes produce a zero-sized rect at the
    /// origin, which maps nothing.
    #[must_use]
    pub fn fit(display_width: f64, display_height: f64, image: Dimensions) -> Self {
        if image.is_empty() || display_width <= 0.0 || display_height <= 0.0 {
            return Self::new(0.0, 0.0, 0.0, 0.0);
        }

        let iw = f64::from(image.width);
        let ih = f64::from(image.height);
        let scale = (display_width / iw).min(display_height / ih);

        let scaled_width = iw * scale;
        let scaled_height = ih * scale;
        Self::new(
            (display_width - scaled_width) / 2.0,
            (display_height - scaled_height) / 2.0,
            scaled_width,
            scaled_height,
        )
    }

    /// The scale applied when rendering an image of the given
    /// dimensions into this rect: `min(vw/iw, vh/ih)`.
    ///
    /// Returns `None` for empty images or zero-sized rects.
    #[must_use]
    pub fn scale(&self, image: Dimensions) -> Option<f64> {
        if image.is_empty() || self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let sx = self.width / f64::from(image.width);
        let sy = self.height / f64::from(image.height);
        Some(sx.min(sy))
    }

    /// Whether a display-space point falls inside the rect.
    ///
    /// Left and top edges are inclusive, right and bottom exclusive,
    /// so adjacent rects never both claim a sample.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// Convert a display-space pointer position into image-space pixels.
///
/// Returns `None` when the sample lies outside the viewport rect: such
/// samples are silently dropped by the gesture layer rather than
/// clamped onto the image edge.
#[must_use]
pub fn to_image_space(display: Point, viewport: &ViewportRect, image: Dimensions) -> Option<Point> {
    if !viewport.contains(display) {
        return None;
    }
    let scale = viewport.scale(image)?;

    Some(Point::new(
        (display.x - viewport.x) / scale,
        (display.y - viewport.y) / scale,
    ))
}

/// Convert an image-space point back into display-space pixels.
///
/// Inverse of [`to_image_space`]. Used to hand overlay geometry (the
/// selection, the in-progress lasso) back to the caller for rendering.
/// Zero-sized viewports or empty images collapse everything onto the
/// viewport origin.
#[must_use]
pub fn to_display_space(image_point: Point, viewport: &ViewportRect, image: Dimensions) -> Point {
    let scale = viewport.scale(image).unwrap_or(0.0);
    Point::new(
        viewport.x + image_point.x * scale,
        viewport.y + image_point.y * scale,
    )
}
