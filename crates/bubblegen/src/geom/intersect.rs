//! Segment vs. axis-aligned rectangle predicate.
//!
//! Known approximation: edges are tested for *proper* crossings only, so a
//! segment that grazes a corner or runs collinear along an edge, with both
//! endpoints outside, is reported as not intersecting. Cut locking was built
//! against exactly this predicate; keep it.
//!
//! A segment that enters the open interior always crosses one of the two
//! diagonals properly, even when it passes through corners (e.g. corner to
//! corner), so the diagonals are tested too.

use super::types::{cross, Point, Rect};

/// True when the open segments `p1p2` and `p3p4` cross at a single interior point.
pub fn segments_cross_properly(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    let d1 = cross(p1, p2, p3);
    let d2 = cross(p1, p2, p4);
    let d3 = cross(p3, p4, p1);
    let d4 = cross(p3, p4, p2);
    opposite(d1, d2) && opposite(d3, d4)
}

#[inline]
fn opposite(a: f64, b: f64) -> bool {
    (a > 0.0 && b < 0.0) || (a < 0.0 && b > 0.0)
}

/// Does segment `p1p2` touch `rect` (endpoint inside the closed box, or a
/// proper crossing with one of its edges or diagonals)?
pub fn segment_intersects_rect(p1: Point, p2: Point, rect: &Rect) -> bool {
    if rect.contains(p1) || rect.contains(p2) {
        return true;
    }
    let [tl, tr, br, bl] = rect.corners();
    [(tl, tr), (tr, br), (br, bl), (bl, tl), (tl, br), (tr, bl)]
        .into_iter()
        .any(|(a, b)| segments_cross_properly(p1, p2, a, b))
}
