//! Rounded-rectangle bubble outline with a triangular tail.
//!
//! Model
//! - Cast a ray from the rectangle center toward the anchor; whichever
//!   half-extent it reaches first names the edge that carries the tail.
//! - The tail base is centered on the ray hit, clamped to the straight part of
//!   that edge (inset by the effective corner radius on both ends). The base
//!   keeps its full width; only an edge whose straight part is shorter than
//!   the base pulls the vertices back onto the edge.
//! - The outline runs clockwise from just after the top-left corner; on the
//!   tail edge the two base vertices are emitted in traversal order with the
//!   anchor between them.

use crate::error::GeometryError;

use super::cfg::BubbleCfg;
use super::path::Path;
use super::types::{is_finite_point, Point, Rect, Side};

/// Where the tail attaches and the three points that make it up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TailGeometry {
    pub side: Side,
    /// Ray hit after clamping into the straight part of `side`.
    pub base_center: Point,
    /// First base vertex in clockwise traversal order.
    pub base_a: Point,
    pub apex: Point,
    /// Second base vertex in clockwise traversal order.
    pub base_b: Point,
    /// Corner radius actually used, `min(radius, min(w, h) / 2)`.
    pub radius: f64,
}

/// Effective corner radius for a `w × h` box.
#[inline]
pub fn clamp_radius(width: f64, height: f64, radius: f64) -> f64 {
    radius.min(width.min(height) / 2.0)
}

/// Classify which edge the center→anchor ray leaves through; returns the side
/// and the unclamped boundary point.
pub fn hit_side(rect: &Rect, anchor: Point, cfg: &BubbleCfg) -> (Side, Point) {
    let c = rect.center();
    let delta = anchor - c;
    let len = delta.norm();
    let d = if len == 0.0 { Point::zeros() } else { delta / len };
    let (hw, hh) = (rect.width / 2.0, rect.height / 2.0);

    let t_x = if d.x != 0.0 { hw / d.x.abs() } else { f64::INFINITY };
    let t_y = if d.y != 0.0 { hh / d.y.abs() } else { f64::INFINITY };
    let t = t_x.min(t_y);
    // anchor at the center: no direction, stay on the center
    let t = if t.is_finite() { t } else { 0.0 };

    let side = if (t - t_x).abs() < cfg.side_tie_eps {
        if d.x > 0.0 {
            Side::Right
        } else {
            Side::Left
        }
    } else if d.y > 0.0 {
        Side::Bottom
    } else {
        Side::Top
    };
    (side, c + d * t)
}

/// Base vertex coordinates along the hit edge, smaller first. The full base
/// width is kept unless the straight part `(lo, hi)` is shorter than it; then
/// both vertices are held on the edge `(start, end)`.
fn base_span(
    center: f64,
    half: f64,
    (lo, hi): (f64, f64),
    (start, end): (f64, f64),
    cfg: &BubbleCfg,
) -> (f64, f64) {
    let (a, b) = (center - half, center + half);
    if hi - lo < cfg.tail_base_width {
        (a.max(start), b.min(end))
    } else {
        (a, b)
    }
}

/// Tail placement for a bubble. Inputs are assumed validated.
pub fn tail_geometry(rect: &Rect, anchor: Point, radius: f64, cfg: &BubbleCfg) -> TailGeometry {
    let r = clamp_radius(rect.width, rect.height, radius);
    let (side, hit) = hit_side(rect, anchor, cfg);
    let half = cfg.tail_base_width / 2.0;

    let (base_center, a, b) = if side.is_horizontal() {
        let lo = rect.x + r;
        let hi = rect.right() - r;
        let px = hit.x.min(hi).max(lo);
        let py = if side == Side::Top { rect.y } else { rect.bottom() };
        let (ax, bx) = base_span(px, half, (lo, hi), (rect.x, rect.right()), cfg);
        let a = Point::new(ax, py);
        let b = Point::new(bx, py);
        (Point::new(px, py), a, b)
    } else {
        let lo = rect.y + r;
        let hi = rect.bottom() - r;
        let py = hit.y.min(hi).max(lo);
        let px = if side == Side::Left { rect.x } else { rect.right() };
        let (ay, by) = base_span(py, half, (lo, hi), (rect.y, rect.bottom()), cfg);
        let a = Point::new(px, ay);
        let b = Point::new(px, by);
        (Point::new(px, py), a, b)
    };

    // a has the smaller coordinate; bottom and left edges run backwards
    let (base_a, base_b) = match side {
        Side::Top | Side::Right => (a, b),
        Side::Bottom | Side::Left => (b, a),
    };

    TailGeometry {
        side,
        base_center,
        base_a,
        apex: anchor,
        base_b,
        radius: r,
    }
}

/// Closed outline of a rounded `rect` whose tail points at `anchor`.
pub fn bubble_path(
    rect: &Rect,
    anchor: Point,
    radius: f64,
    cfg: &BubbleCfg,
) -> Result<Path, GeometryError> {
    rect.validate()?;
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return Err(GeometryError::invalid(
            "bubble",
            "width and height must be positive",
        ));
    }
    if !is_finite_point(anchor) {
        return Err(GeometryError::invalid("bubble", "anchor is not finite"));
    }
    if !radius.is_finite() || radius < 0.0 {
        return Err(GeometryError::invalid(
            "bubble",
            "corner radius must be finite and non-negative",
        ));
    }

    let tail = tail_geometry(rect, anchor, radius, cfg);
    let r = tail.radius;
    let (x, y, w, h) = (rect.x, rect.y, rect.width, rect.height);
    let p = |x: f64, y: f64| Point::new(x, y);

    let mut path = Path::new();
    let splice = |path: &mut Path, side: Side| {
        if tail.side == side {
            path.line_to(tail.base_a)
                .line_to(tail.apex)
                .line_to(tail.base_b);
        }
    };

    path.move_to(p(x + r, y));
    splice(&mut path, Side::Top);
    path.line_to(p(x + w - r, y))
        .quad_to(p(x + w, y), p(x + w, y + r));
    splice(&mut path, Side::Right);
    path.line_to(p(x + w, y + h - r))
        .quad_to(p(x + w, y + h), p(x + w - r, y + h));
    splice(&mut path, Side::Bottom);
    path.line_to(p(x + r, y + h))
        .quad_to(p(x, y + h), p(x, y + h - r));
    splice(&mut path, Side::Left);
    path.line_to(p(x, y + r)).quad_to(p(x, y), p(x + r, y)).close();
    Ok(path)
}
