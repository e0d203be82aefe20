//! Polygon rasterization: fill a closed lasso into a binary pixel buffer.
//!
//! The fill is an even-odd scanline algorithm sampling pixel centers:
//! a pixel `(x, y)` is filled when the point `(x + 0.5, y + 0.5)` lies
//! inside the polygon under the even-odd rule. Polygon vertices are
//! floor-truncated to the integer grid before scanning, so crossing
//! positions are exact and scanlines at half-integer heights never pass
//! through a vertex.
//!
//! Filled buffers use [`GrayImage`] with 255 = filled, 0 = background,
//! so they compose with the mask store's inside map by pixelwise AND.

use crate::types::{Dimensions, GrayImage, Point};

/// Pixel value marking a filled/selected cell in a binary buffer.
pub const FILLED: u8 = 255;

/// Fill a closed polygon into a `width × height` binary buffer.
///
/// Vertices are floor-truncated to integers; the polygon is treated as
/// implicitly closed (an edge from the last vertex back to the first),
/// so passing either an open or an explicitly closed ring yields the
/// same fill. Degenerate polygons — fewer than 3 vertices, or all
/// vertices collinear — produce an all-background buffer, as do
/// non-finite vertices.
#[must_use = "returns the filled pixel buffer"]
pub fn fill_polygon(vertices: &[Point], dimensions: Dimensions) -> GrayImage {
    let mut buffer = GrayImage::new(dimensions.width, dimensions.height);
    if vertices.len() < 3 || vertices.iter().any(|v| !v.is_finite()) {
        return buffer;
    }

    // Floor-truncate to the integer grid.
    #[allow(clippy::cast_possible_truncation)]
    let grid: Vec<(i64, i64)> = vertices
        .iter()
        .map(|v| (v.x.floor() as i64, v.y.floor() as i64))
        .collect();

    let mut crossings: Vec<f64> = Vec::new();
    for row in 0..dimensions.height {
        // Sample at the pixel-center height. Vertices sit on integer
        // rows, so the scanline never passes exactly through one.
        let sy = f64::from(row) + 0.5;

        crossings.clear();
        for i in 0..grid.len() {
            let (x0, y0) = grid[i];
            let (x1, y1) = grid[(i + 1) % grid.len()];
            if y0 == y1 {
                continue;
            }
            #[allow(clippy::cast_precision_loss)]
            let (x0, y0, x1, y1) = (x0 as f64, y0 as f64, x1 as f64, y1 as f64);
            if (y0 <= sy) == (y1 <= sy) {
                continue;
            }
            crossings.push((sy - y0).mul_add((x1 - x0) / (y1 - y0), x0));
        }

        crossings.sort_by(f64::total_cmp);
        for pair in crossings.chunks_exact(2) {
            fill_span(&mut buffer, row, pair[0], pair[1], dimensions.width);
        }
    }

    buffer
}

/// Fill pixels of one row whose centers fall in the half-open span
/// `[left, right)`, clipped to the buffer width.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn fill_span(buffer: &mut GrayImage, row: u32, left: f64, right: f64, width: u32) {
    // Pixel x is covered when x + 0.5 >= left and x + 0.5 < right.
    let start = (left - 0.5).ceil().max(0.0) as i64;
    let end = (right - 0.5).ceil().min(f64::from(width)) as i64;
    for x in start..end {
        buffer.put_pixel(x as u32, row, image::Luma([FILLED]));
    }
}

/// Scatter normalized points onto a pixel buffer.
///
/// Each point is denormalized by the buffer dimensions and
/// floor-truncated; out-of-range and non-finite points are skipped.
/// This is the quantizing half of the selection union: points from
/// overlapping strokes that land in the same pixel collapse into one
/// filled cell.
#[allow(clippy::cast_possible_truncation)]
pub fn scatter_normalized(buffer: &mut GrayImage, points: &[Point], dimensions: Dimensions) {
    let w = i64::from(dimensions.width);
    let h = i64::from(dimensions.height);
    for p in points {
        if !p.is_finite() {
            continue;
        }
        let x = (p.x * f64::from(dimensions.width)).floor() as i64;
        let y = (p.y * f64::from(dimensions.height)).floor() as i64;
        if (0..w).contains(&x) && (0..h).contains(&y) {
            #[allow(clippy::cast_sign_loss)]
            buffer.put_pixel(x as u32, y as u32, image::Luma([FILLED]));
        }
    }
}

/// Collect the coordinates of all filled pixels, in row-major order
/// (ascending row, then ascending column).
#[must_use]
pub fn filled_coordinates(buffer: &GrayImage) -> Vec<(u32, u32)> {
    let mut coords = Vec::new();
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            if buffer.get_pixel(x, y).0[0] == FILLED {
                coords.push((x, y));
            }
        }
    }
    coords
}

/// Count the filled pixels in a binary buffer.
#[must_use]
pub fn count_filled(buffer: &GrayImage) -> u64 {
    buffer.pixels().filter(|p| p.0[0] == FILLED).count() as u64
}
