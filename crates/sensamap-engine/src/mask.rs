//! Anatomical mask store: membership queries against the hand region.
//!
//! The mask is a grayscale buffer with the same dimensions as the
//! active hand photograph. Dark pixels (intensity below
//! [`HAND_THRESHOLD`]) are the valid anatomical region; light pixels
//! (above [`BACKGROUND_THRESHOLD`]) are background. Intermediate
//! values are don't-care for the diagnostic counts but still classify
//! through the inverse-binary threshold used for intersection.
//!
//! When no mask is available the store runs in **degraded mode**: every
//! fill pixel of every stroke is treated as inside. The mode is an
//! explicit, queryable state ([`MaskStore::is_degraded`]), never a
//! silent default.

use imageproc::contrast::{ThresholdType, threshold};

use crate::raster;
use crate::types::{Dimensions, EngineError, GrayImage, Point};

/// Intensity below which a mask pixel counts as inside the hand.
pub const HAND_THRESHOLD: u8 = 50;

/// Intensity above which a mask pixel counts as background.
pub const BACKGROUND_THRESHOLD: u8 = 200;

/// Diagnostic pixel counts for a loaded mask.
///
/// Pixels with intermediate intensity (between the two thresholds)
/// are counted by neither field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskStats {
    /// Pixels darker than [`HAND_THRESHOLD`] (the anatomical region).
    pub hand_pixels: u64,
    /// Pixels lighter than [`BACKGROUND_THRESHOLD`] (the background).
    pub background_pixels: u64,
}

/// Holds the decoded anatomical mask for the active hand variant and
/// answers point and region membership queries.
#[derive(Debug, Clone)]
pub struct MaskStore {
    mask: Option<LoadedMask>,
}

#[derive(Debug, Clone)]
struct LoadedMask {
    gray: GrayImage,
    /// Inverse-binary threshold of `gray` at [`HAND_THRESHOLD`]:
    /// 255 where the hand is, 0 elsewhere. Computed once at load.
    inside: GrayImage,
}

impl MaskStore {
    /// Create a store with no mask: the explicit accept-everything mode.
    #[must_use]
    pub const fn degraded() -> Self {
        Self { mask: None }
    }

    /// Build a store from a pre-decoded grayscale mask image.
    pub fn from_image(gray: GrayImage) -> Self {
        let inside = threshold(&gray, HAND_THRESHOLD, ThresholdType::BinaryInverted);
        Self {
            mask: Some(LoadedMask { gray, inside }),
        }
    }

    /// Build a store from a raw grayscale byte buffer.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DecodeFailure`] when the dimensions are
    /// empty or the buffer length does not match them.
    pub fn load(buffer: Vec<u8>, dimensions: Dimensions) -> Result<Self, EngineError> {
        if dimensions.is_empty() {
            return Err(EngineError::DecodeFailure(format!(
                "mask dimensions are empty: {}x{}",
                dimensions.width, dimensions.height,
            )));
        }
        let expected = dimensions.pixel_count();
        let actual = buffer.len() as u64;
        if actual != expected {
            return Err(EngineError::DecodeFailure(format!(
                "mask buffer holds {actual} bytes, {expected} required for {}x{}",
                dimensions.width, dimensions.height,
            )));
        }
        let gray =
            GrayImage::from_raw(dimensions.width, dimensions.height, buffer).ok_or_else(|| {
                EngineError::DecodeFailure("mask buffer rejected by the image container".to_string())
            })?;
        Ok(Self::from_image(gray))
    }

    /// Whether the store is in the accept-everything degraded mode.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.mask.is_none()
    }

    /// Dimensions of the loaded mask, or `None` in degraded mode.
    #[must_use]
    pub fn dimensions(&self) -> Option<Dimensions> {
        self.mask
            .as_ref()
            .map(|m| Dimensions::new(m.gray.width(), m.gray.height()))
    }

    /// Whether an image-space point falls inside the anatomical region.
    ///
    /// The point is floor-truncated to a pixel and its intensity
    /// compared against [`HAND_THRESHOLD`]. Out-of-bounds points are
    /// outside. In degraded mode every point is inside.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn is_inside(&self, image_point: Point) -> bool {
        let Some(mask) = &self.mask else {
            return true;
        };
        if !image_point.is_finite() || image_point.x < 0.0 || image_point.y < 0.0 {
            return false;
        }
        let x = image_point.x.floor() as u32;
        let y = image_point.y.floor() as u32;
        if x >= mask.gray.width() || y >= mask.gray.height() {
            return false;
        }
        mask.gray.get_pixel(x, y).0[0] < HAND_THRESHOLD
    }

    /// The inverse-binary thresholded buffer (255 = hand), or `None`
    /// in degraded mode.
    #[must_use]
    pub fn inside_map(&self) -> Option<&GrayImage> {
        self.mask.as_ref().map(|m| &m.inside)
    }

    /// Clip a binary fill buffer to the anatomical region by pixelwise
    /// AND with the inside map. In degraded mode the fill passes
    /// through unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::BufferMismatch`] when the fill buffer and
    /// the loaded mask disagree on dimensions.
    pub fn clip_fill(&self, fill: &GrayImage) -> Result<GrayImage, EngineError> {
        let Some(mask) = &self.mask else {
            return Ok(fill.clone());
        };
        if fill.dimensions() != mask.inside.dimensions() {
            return Err(EngineError::BufferMismatch {
                fill_width: fill.width(),
                fill_height: fill.height(),
                mask_width: mask.inside.width(),
                mask_height: mask.inside.height(),
            });
        }

        let mut clipped = fill.clone();
        for (x, y, pixel) in clipped.enumerate_pixels_mut() {
            if mask.inside.get_pixel(x, y).0[0] != raster::FILLED {
                pixel.0[0] = 0;
            }
        }
        Ok(clipped)
    }

    /// Rasterize a closed stroke at the mask's resolution and clip it
    /// to the anatomical region, returning the surviving pixel
    /// coordinates in row-major order.
    ///
    /// Returns `Ok(None)` in degraded mode, where there is no mask
    /// resolution to rasterize at; callers fall back to the raw stroke
    /// vertices.
    ///
    /// # Errors
    ///
    /// Propagates [`EngineError::BufferMismatch`] from the clip step.
    pub fn intersect_polygon_fill(
        &self,
        stroke: &[Point],
    ) -> Result<Option<Vec<(u32, u32)>>, EngineError> {
        let Some(dimensions) = self.dimensions() else {
            return Ok(None);
        };
        let fill = raster::fill_polygon(stroke, dimensions);
        let clipped = self.clip_fill(&fill)?;
        Ok(Some(raster::filled_coordinates(&clipped)))
    }

    /// Hand/background pixel counts for the loaded mask, or `None` in
    /// degraded mode.
    #[must_use]
    pub fn stats(&self) -> Option<MaskStats> {
        self.mask.as_ref().map(|m| {
            let mut hand_pixels = 0;
            let mut background_pixels = 0;
            for pixel in m.gray.pixels() {
                let v = pixel.0[0];
                if v < HAND_THRESHOLD {
                    hand_pixels += 1;
                } else if v > BACKGROUND_THRESHOLD {
                    background_pixels += 1;
                }
            }
            MaskStats {
                hand_pixels,
                background_pixels,
            }
        })
    }

    /// Plain binary threshold of the mask at [`HAND_THRESHOLD`]
    /// (dark ⇒ 0, light ⇒ 255), or `None` in degraded mode.
    ///
    /// This is the normalized binary-mask artifact used when preparing
    /// mask resources, kept for debugging and caching.
    #[must_use]
    pub fn binary_mask(&self) -> Option<GrayImage> {
        self.mask
            .as_ref()
            .map(|m| threshold(&m.gray, HAND_THRESHOLD, ThresholdType::Binary))
    }
}

impl Default for MaskStore {
    fn default() -> Self {
        Self::degraded()
    }
}
