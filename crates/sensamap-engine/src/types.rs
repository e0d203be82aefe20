//! Shared types for the sensamap selection engine.

use serde::{Deserialize, Serialize};

/// Re-export `GrayImage` so downstream crates can reference mask and
/// fill buffers without depending on `image` directly.
pub use image::GrayImage;

/// A 2D point as a pair of floating-point coordinates.
///
/// The same struct is used in all three coordinate spaces the engine
/// deals with; which space a value lives in is part of each API's
/// contract:
///
/// - **display space** — pixels within the on-screen viewport,
/// - **image space** — pixels within the original, unscaled image,
/// - **normalized space** — image coordinates as fractions in `[0, 1]`
///   of image width/height, used for the persisted selection so it
///   survives image-size changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns `true` if both coordinates are finite (neither NaN nor
    /// infinite).
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Image (and mask) dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Create new dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either dimension is zero.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Total pixel count.
    #[must_use]
    pub fn pixel_count(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Which hand's photograph and anatomical mask are active.
///
/// The engine resolves the mask resource for a side through the
/// caller-supplied [`MaskLoader`](crate::session::MaskLoader); the
/// identifier handed over is [`as_str`](Self::as_str).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandSide {
    /// The left hand.
    Left,
    /// The right hand.
    #[default]
    Right,
}

impl HandSide {
    /// The identifier used in load requests and persisted records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl std::fmt::Display for HandSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The cumulative, mask-clipped selection as a set of normalized points.
///
/// Points are kept in row-major pixel order (ascending row, then
/// ascending column) and are unique at pixel granularity: the merge
/// path rasterizes unions back onto a mask-sized buffer, so overlapping
/// strokes collapse into one pixel bucket instead of growing the set
/// unboundedly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionSet(Vec<Point>);

impl SelectionSet {
    /// Create a selection set from a vector of normalized points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the selection is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of points in the selection.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// All points, in row-major pixel order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Consumes the set and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }

    /// Arithmetic mean of all points, or `None` when the set is empty.
    ///
    /// This is the representative location handed to the recording
    /// step; the `None` sentinel holds exactly when the set is empty.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn centroid(&self) -> Option<Point> {
        if self.0.is_empty() {
            return None;
        }
        let n = self.0.len() as f64;
        let sum_x: f64 = self.0.iter().map(|p| p.x).sum();
        let sum_y: f64 = self.0.iter().map(|p| p.y).sum();
        Some(Point::new(sum_x / n, sum_y / n))
    }
}

/// Errors that can occur inside the selection engine.
///
/// Nothing here is fatal to a session: decode failures degrade the
/// mask store, processing faults leave the selection at its pre-call
/// value, and gesture-ordering violations are reported back so the
/// caller can retry from `Idle`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The mask resource could not be read or decoded.
    #[error("failed to decode mask: {0}")]
    DecodeFailure(String),

    /// A stroke contained NaN or infinite coordinates.
    #[error("stroke contains non-finite coordinates")]
    MalformedGeometry,

    /// A fill buffer and the mask disagree on dimensions.
    #[error("buffer size mismatch: fill is {fill_width}x{fill_height}, mask is {mask_width}x{mask_height}")]
    BufferMismatch {
        /// Width of the offending fill buffer.
        fill_width: u32,
        /// Height of the offending fill buffer.
        fill_height: u32,
        /// Width of the loaded mask.
        mask_width: u32,
        /// Height of the loaded mask.
        mask_height: u32,
    },

    /// `clear` or a hand switch was requested while a stroke was being
    /// drawn; both are valid only from the idle state.
    #[error("operation is only valid while idle: a stroke is in progress")]
    GestureInProgress,
}
