//! Ring orientation: shoelace area, winding classification, reversal.

use geo::{Coord, LineString};

/// Signed shoelace area of a closed coordinate sequence.
/// Positive for counter-clockwise winding, negative for clockwise.
pub(crate) fn signed_area(coords: &[Coord<f64>]) -> f64 {
    let mut sum = 0.0;
    for w in coords.windows(2) {
        sum += w[0].x * w[1].y - w[1].x * w[0].y;
    }
    sum / 2.0
}

/// Whether a closed coordinate sequence winds counter-clockwise.
#[inline]
pub(crate) fn is_ccw(coords: &[Coord<f64>]) -> bool {
    signed_area(coords) > 0.0
}

/// The same ring with its coordinate order reversed.
pub(crate) fn reversed(ring: &LineString<f64>) -> LineString<f64> {
    LineString(ring.0.iter().rev().copied().collect())
}
