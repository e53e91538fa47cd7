//! Default placement of newly added shapes.
//!
//! Determinism: callers pass the RNG (typically `StdRng::seed_from_u64`), so a
//! seed replays the same ids, jitter and demo texts.

use nalgebra::vector;
use rand::Rng;

use crate::geom::cfg::DEFAULT_CORNER_RADIUS;

use super::{Bubble, Cut, Frame, ImageBox, Scene};

pub const DEMO_TEXTS: [&str; 5] = [
    "Hello there! I'm a dynamic speech bubble.",
    "You can drag my body or my tail independently.",
    "I will automatically truncate my text if it gets too long for the container. This ensures the design never breaks even with overflow.",
    "Try moving the anchor point all the way around me. The tail logic generalizes to any angle!",
    "Rust + SVG = <3",
];

pub const DEFAULT_BUBBLE_WIDTH: f64 = 220.0;
pub const DEFAULT_BUBBLE_HEIGHT: f64 = 100.0;
/// New bubbles land within ±this of the viewport center on each axis.
pub const PLACEMENT_JITTER: f64 = 20.0;
pub const DEFAULT_CUT_THICKNESS: f64 = 10.0;
pub const FRAME_MARGIN: f64 = 100.0;
pub const DEFAULT_IMAGE_SIZE: f64 = 256.0;
/// Image containers snap their origin to this grid.
pub const IMAGE_GRID: f64 = 16.0;

const ID_LEN: usize = 9;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Size of the visible canvas new shapes are placed relative to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Nine lowercase base-36 characters.
pub fn random_id<R: Rng>(rng: &mut R) -> String {
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

pub(super) fn place_bubble<R: Rng>(rng: &mut R, vp: Viewport) -> Bubble {
    let id = random_id(rng);
    let cx = vp.width / 2.0 - DEFAULT_BUBBLE_WIDTH / 2.0;
    let cy = vp.height / 2.0 - DEFAULT_BUBBLE_HEIGHT / 2.0;
    let x = cx + rng.gen_range(-PLACEMENT_JITTER..PLACEMENT_JITTER);
    let y = cy + rng.gen_range(-PLACEMENT_JITTER..PLACEMENT_JITTER);
    let text = DEMO_TEXTS[rng.gen_range(0..DEMO_TEXTS.len())].to_string();
    Bubble {
        id,
        x,
        y,
        width: DEFAULT_BUBBLE_WIDTH,
        height: DEFAULT_BUBBLE_HEIGHT,
        anchor: vector![
            cx + DEFAULT_BUBBLE_WIDTH / 2.0,
            cy + DEFAULT_BUBBLE_HEIGHT + 50.0
        ],
        text,
        border_radius: DEFAULT_CORNER_RADIUS,
    }
}

pub(super) fn place_cut<R: Rng>(rng: &mut R, vp: Viewport) -> Cut {
    Cut {
        id: random_id(rng),
        p1: vector![vp.width * 0.3, vp.height * 0.2],
        p2: vector![vp.width * 0.7, vp.height * 0.8],
        t1: DEFAULT_CUT_THICKNESS,
        t2: DEFAULT_CUT_THICKNESS,
    }
}

pub(super) fn place_frame<R: Rng>(rng: &mut R, vp: Viewport) -> Frame {
    let m = FRAME_MARGIN;
    Frame {
        id: random_id(rng),
        p1: vector![m, m],
        p2: vector![vp.width - m, m],
        p3: vector![vp.width - m, vp.height - m],
        p4: vector![m, vp.height - m],
        color: "#000000".to_string(),
    }
}

pub(super) fn place_image<R: Rng>(rng: &mut R, vp: Viewport) -> ImageBox {
    let half = DEFAULT_IMAGE_SIZE / 2.0;
    let snap = |v: f64| (v / IMAGE_GRID).round() * IMAGE_GRID;
    ImageBox {
        id: random_id(rng),
        x: snap(vp.width / 2.0 - half),
        y: snap(vp.height / 2.0 - half),
        width: DEFAULT_IMAGE_SIZE,
        height: DEFAULT_IMAGE_SIZE,
        scale: 1.0,
        src: None,
        is_locked: false,
        locked_cut_ids: Vec::new(),
    }
}

/// Starter scene: the two stock bubbles plus one seeded cut, frame and image.
pub fn starter_scene<R: Rng>(rng: &mut R, vp: Viewport) -> Scene {
    let stock = Scene {
        bubbles: vec![
            Bubble {
                id: "1".to_string(),
                x: 100.0,
                y: 150.0,
                width: 240.0,
                height: 120.0,
                anchor: vector![400.0, 350.0],
                text: DEMO_TEXTS[0].to_string(),
                border_radius: DEFAULT_CORNER_RADIUS,
            },
            Bubble {
                id: "2".to_string(),
                x: 500.0,
                y: 100.0,
                width: 200.0,
                height: 100.0,
                anchor: vector![450.0, 250.0],
                text: DEMO_TEXTS[2].to_string(),
                border_radius: 40.0,
            },
        ],
        ..Scene::default()
    };
    stock
        .add_image(rng, vp)
        .add_cut(rng, vp)
        .add_frame(rng, vp)
}
