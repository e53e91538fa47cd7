//! Basic 2D value types shared by the builders.
//!
//! - `Point`: plain `Vector2<f64>`; coordinates are screen-style (y grows down).
//! - `Rect`: axis-aligned box with top-left origin, never rotated.
//! - `Side`: which rectangle edge a bubble tail sits on.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// A point in the plane (y grows downward, as in SVG user space).
pub type Point = Vector2<f64>;

/// Axis-aligned rectangle `(x, y, width, height)` with `(x, y)` the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Validated constructor: finite coordinates, non-negative extents.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self, GeometryError> {
        let r = Self {
            x,
            y,
            width,
            height,
        };
        r.validate()?;
        Ok(r)
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        if !(self.x.is_finite() && self.y.is_finite()) {
            return Err(GeometryError::invalid("rect", "origin is not finite"));
        }
        if !(self.width.is_finite() && self.height.is_finite()) {
            return Err(GeometryError::invalid("rect", "extent is not finite"));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(GeometryError::invalid("rect", "negative width or height"));
        }
        Ok(())
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Closed containment (boundary counts as inside).
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Corners clockwise from top-left: TL, TR, BR, BL.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
    }
}

/// Rectangle edge, listed in clockwise traversal order starting at the top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// True for the edges that run along the x axis.
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }
}

#[inline]
pub(crate) fn is_finite_point(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// z-component of `(b - a) × (c - a)`.
#[inline]
pub(crate) fn cross(a: Point, b: Point, c: Point) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}
