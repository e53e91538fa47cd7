//! Pure 2D geometry for bubbles, cuts and image masks.
//!
//! Purpose
//! - Turn shape descriptors into closed `Path`s usable directly as fill regions.
//! - Decide which cut segments touch which image rectangle.
//!
//! Everything here is stateless: same inputs, same output, no logging, no I/O.
//! Builders validate at the boundary and return `GeometryError` on misuse;
//! degenerate-but-legal inputs resolve to degenerate geometry instead.

mod bubble;
pub mod cfg;
mod intersect;
mod path;
mod taper;
mod types;

pub use bubble::{bubble_path, clamp_radius, hit_side, tail_geometry, TailGeometry};
pub use cfg::BubbleCfg;
pub use intersect::{segment_intersects_rect, segments_cross_properly};
pub use path::{Path, PathSeg};
pub use taper::{
    away_normal, half_plane_mask, half_plane_mask_with_extent, tapered_corners, tapered_segment,
};
pub use types::{Point, Rect, Side};

#[cfg(test)]
mod tests;
