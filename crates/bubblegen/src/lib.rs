//! Geometry engine and scene export for comic-style bubble/cut/frame compositions.
//!
//! Layout
//! - `geom`: pure builders (tailed bubble outline, tapered cut, half-plane mask)
//!   and the segment/rectangle predicate. No state, no logging.
//! - `scene`: immutable scene snapshots, edits, image lock state.
//! - `export`: standalone SVG document assembly.
//!
//! Coordinates are SVG user space: x to the right, y downward.

pub mod error;
pub mod export;
pub mod geom;
pub mod scene;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{GeometryError, PathParseError};
pub use geom::{Path, PathSeg, Point, Rect, Side};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::{GeometryError, PathParseError};
    pub use crate::export::{render_svg, ExportCfg};
    pub use crate::geom::{
        bubble_path, half_plane_mask, segment_intersects_rect, tail_geometry, tapered_segment,
        BubbleCfg, Path, PathSeg, Point, Rect, Side, TailGeometry,
    };
    pub use crate::scene::{Bubble, Cut, CutEnd, Frame, ImageBox, Scene, Viewport};
}
