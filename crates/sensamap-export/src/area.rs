//! Selected-area serialization: the compact point-list form stored in
//! the `Area` column of the sensation log.
//!
//! The format is `x,y;x,y;...` with one decimal place per coordinate.
//! The points are normalized (fractions of image width/height), so one
//! decimal place quantizes them to a tenth of the image — coarse, but
//! it is the established on-disk format and downstream tooling parses
//! it, so the precision is kept as-is.

use std::fmt::Write;

use sensamap_engine::Point;

/// Serialize a selection's points as semicolon-separated `x,y` pairs
/// with one decimal place. Empty selections yield the empty string.
#[must_use]
pub fn area_string(points: &[Point]) -> String {
    let mut out = String::new();
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        let _ = write!(out, "{:.1},{:.1}", p.x, p.y);
    }
    out
}

/// The centroid's two CSV fields, full precision.
///
/// The `None` sentinel (empty selection) serializes as a pair of empty
/// fields.
#[must_use]
pub fn centroid_fields(centroid: Option<Point>) -> (String, String) {
    centroid.map_or_else(
        || (String::new(), String::new()),
        |c| (c.x.to_string(), c.y.to_string()),
    )
}
