//! Tapered cut segments and the half-plane masks they induce on images.

use crate::error::GeometryError;

use super::cfg::HALF_PLANE_EXTENT;
use super::path::Path;
use super::types::{is_finite_point, Point};

/// Corners of the tapered quad, in emission order
/// `p1_left → p2_left → p2_right → p1_right`; `None` for a zero-length segment.
pub fn tapered_corners(p1: Point, p2: Point, t1: f64, t2: f64) -> Option<[Point; 4]> {
    let d = p2 - p1;
    let len = d.norm();
    if len == 0.0 {
        return None;
    }
    let u = d / len;
    let perp = Point::new(-u.y, u.x);
    let (h1, h2) = (t1 / 2.0, t2 / 2.0);
    Some([
        p1 + perp * h1,
        p2 + perp * h2,
        p2 - perp * h2,
        p1 - perp * h1,
    ])
}

/// Quadrilateral of width `t1` at `p1` narrowing/widening linearly to `t2` at `p2`.
///
/// A zero-length segment yields an empty path ("nothing to draw").
pub fn tapered_segment(p1: Point, p2: Point, t1: f64, t2: f64) -> Result<Path, GeometryError> {
    if !(is_finite_point(p1) && is_finite_point(p2)) {
        return Err(GeometryError::invalid("cut", "endpoint is not finite"));
    }
    if !(t1.is_finite() && t2.is_finite()) || t1 < 0.0 || t2 < 0.0 {
        return Err(GeometryError::invalid(
            "cut",
            "thickness must be finite and non-negative",
        ));
    }
    Ok(tapered_corners(p1, p2, t1, t2)
        .map(|c| Path::polygon(&c))
        .unwrap_or_default())
}

/// Unit normal of the line `p1 → p2` pointing away from `keep`.
///
/// A keep point on the line gets the unflipped normal `(-dy, dx)`; a zero-length
/// segment gets the zero vector.
pub fn away_normal(p1: Point, p2: Point, keep: Point) -> Point {
    let d = p2 - p1;
    let len = d.norm();
    if len == 0.0 {
        return Point::zeros();
    }
    let n = Point::new(-d.y, d.x) / len;
    if n.dot(&(keep - p1)) > 0.0 {
        -n
    } else {
        n
    }
}

/// Large quad covering the side of the infinite line through `p1, p2` opposite `keep`.
///
/// Meant to be filled as a subtractive mask. Degenerate input gives four copies
/// of `p1`, never an error.
pub fn half_plane_mask(p1: Point, p2: Point, keep: Point) -> Path {
    half_plane_mask_with_extent(p1, p2, keep, HALF_PLANE_EXTENT)
}

pub fn half_plane_mask_with_extent(p1: Point, p2: Point, keep: Point, extent: f64) -> Path {
    let d = p2 - p1;
    let len = d.norm();
    let u = if len == 0.0 { Point::zeros() } else { d / len };
    let m = away_normal(p1, p2, keep) * extent;
    let far1 = p1 - u * extent;
    let far2 = p2 + u * extent;
    Path::polygon(&[far1, far2, far2 + m, far1 + m])
}
