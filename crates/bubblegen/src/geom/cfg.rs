//! Fixed sizes and tolerances used by the builders.
//!
//! Policy
//! - Defaults are fixed constants; `BubbleCfg` bundles the two that callers
//!   occasionally want to vary (tests, alternative tail styles).

/// Width of the tail where it meets the bubble edge.
pub const TAIL_BASE_WIDTH: f64 = 20.0;
/// Tie tolerance between a left/right and a top/bottom hit; ties go to left/right.
pub const SIDE_TIE_EPS: f64 = 0.1;
/// Corner radius given to newly added bubbles.
pub const DEFAULT_CORNER_RADIUS: f64 = 16.0;
/// Extension/offset distance standing in for "infinity" in half-plane masks.
pub const HALF_PLANE_EXTENT: f64 = 20_000.0;
/// Half-size of the opaque wall square a frame window is cut out of.
pub const WALL_EXTENT: f64 = 10_000.0;

/// Tail construction parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BubbleCfg {
    pub tail_base_width: f64,
    pub side_tie_eps: f64,
}

impl Default for BubbleCfg {
    fn default() -> Self {
        Self {
            tail_base_width: TAIL_BASE_WIDTH,
            side_tie_eps: SIDE_TIE_EPS,
        }
    }
}
