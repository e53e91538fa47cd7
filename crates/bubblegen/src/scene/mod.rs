//! Scene snapshots: the shape lists an editor keeps and the geometry consumes.
//!
//! A `Scene` is never mutated in place. Every edit borrows the current snapshot
//! and returns the next one, so the pure builders in `geom` always see a
//! consistent set of descriptors.
//!
//! Lock semantics
//! - Locking an image records the ids of the cuts that currently intersect it.
//! - While locked, a cut masks the image only if it is in that set *and* still
//!   intersects the image rectangle.

pub mod demo;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::geom::{segment_intersects_rect, Point, Rect};

pub use demo::{random_id, Viewport, DEMO_TEXTS};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bubble {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Absolute tail tip position.
    pub anchor: Point,
    pub text: String,
    pub border_radius: f64,
}

impl Bubble {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cut {
    pub id: String,
    pub p1: Point,
    pub p2: Point,
    /// Thickness at `p1`.
    pub t1: f64,
    /// Thickness at `p2`.
    pub t2: f64,
}

/// Which end of a cut a thickness edit applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CutEnd {
    P1,
    P2,
}

/// Window cut out of an opaque wall; corners clockwise from top-left.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub id: String,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
    pub p4: Point,
    pub color: String,
}

impl Frame {
    pub fn corners(&self) -> [Point; 4] {
        [self.p1, self.p2, self.p3, self.p4]
    }
}

/// Image container; `scale` zooms the image around the container center.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBox {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub locked_cut_ids: Vec<String>,
}

impl ImageBox {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    /// Placement of the scaled image, centered on the container.
    pub fn scaled_rect(&self) -> Rect {
        let w = self.width * self.scale;
        let h = self.height * self.scale;
        Rect {
            x: self.x + (self.width - w) / 2.0,
            y: self.y + (self.height - h) / 2.0,
            width: w,
            height: h,
        }
    }
}

/// Immutable snapshot of everything on the canvas.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub bubbles: Vec<Bubble>,
    #[serde(default)]
    pub cuts: Vec<Cut>,
    #[serde(default)]
    pub frames: Vec<Frame>,
    #[serde(default)]
    pub images: Vec<ImageBox>,
}

fn check_finite(id: &str, what: &str, vals: &[f64]) -> Result<(), GeometryError> {
    if vals.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(GeometryError::invalid(
            format!("{what} {id}"),
            "coordinate is not finite",
        ))
    }
}

fn check_thickness(id: &str, t: f64) -> Result<(), GeometryError> {
    if t.is_finite() && t >= 0.0 {
        Ok(())
    } else {
        Err(GeometryError::invalid(
            format!("cut {id}"),
            "thickness must be finite and non-negative",
        ))
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check every descriptor; the first offending shape is named in the error.
    pub fn validate(&self) -> Result<(), GeometryError> {
        for b in &self.bubbles {
            let what = format!("bubble {}", b.id);
            check_finite(&b.id, "bubble", &[b.x, b.y, b.anchor.x, b.anchor.y])?;
            if !(b.width > 0.0 && b.height > 0.0 && b.width.is_finite() && b.height.is_finite())
            {
                return Err(GeometryError::invalid(what, "width and height must be positive"));
            }
            if !(b.border_radius.is_finite() && b.border_radius >= 0.0) {
                return Err(GeometryError::invalid(what, "negative corner radius"));
            }
        }
        for c in &self.cuts {
            check_finite(&c.id, "cut", &[c.p1.x, c.p1.y, c.p2.x, c.p2.y])?;
            check_thickness(&c.id, c.t1)?;
            check_thickness(&c.id, c.t2)?;
        }
        for f in &self.frames {
            let coords: Vec<f64> = f.corners().iter().flat_map(|p| [p.x, p.y]).collect();
            check_finite(&f.id, "frame", &coords)?;
        }
        for img in &self.images {
            img.rect()
                .validate()
                .map_err(|e| e.within(format!("image {}", img.id)))?;
            if !(img.scale.is_finite() && img.scale > 0.0) {
                return Err(GeometryError::invalid(
                    format!("image {}", img.id),
                    "scale must be positive",
                ));
            }
        }
        Ok(())
    }

    pub fn bubble(&self, id: &str) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.id == id)
    }

    pub fn cut(&self, id: &str) -> Option<&Cut> {
        self.cuts.iter().find(|c| c.id == id)
    }

    pub fn image(&self, id: &str) -> Option<&ImageBox> {
        self.images.iter().find(|i| i.id == id)
    }

    pub fn add_bubble<R: Rng>(&self, rng: &mut R, viewport: Viewport) -> Scene {
        let mut next = self.clone();
        let b = demo::place_bubble(rng, viewport);
        tracing::debug!(id = %b.id, x = b.x, y = b.y, "add bubble");
        next.bubbles.push(b);
        next
    }

    pub fn add_cut<R: Rng>(&self, rng: &mut R, viewport: Viewport) -> Scene {
        let mut next = self.clone();
        let c = demo::place_cut(rng, viewport);
        tracing::debug!(id = %c.id, "add cut");
        next.cuts.push(c);
        next
    }

    pub fn add_frame<R: Rng>(&self, rng: &mut R, viewport: Viewport) -> Scene {
        let mut next = self.clone();
        let f = demo::place_frame(rng, viewport);
        tracing::debug!(id = %f.id, "add frame");
        next.frames.push(f);
        next
    }

    pub fn add_image<R: Rng>(&self, rng: &mut R, viewport: Viewport) -> Scene {
        let mut next = self.clone();
        let img = demo::place_image(rng, viewport);
        tracing::debug!(id = %img.id, x = img.x, y = img.y, "add image");
        next.images.push(img);
        next
    }

    pub fn delete_bubble(&self, id: &str) -> Scene {
        let mut next = self.clone();
        next.bubbles.retain(|b| b.id != id);
        next
    }

    pub fn delete_cut(&self, id: &str) -> Scene {
        let mut next = self.clone();
        next.cuts.retain(|c| c.id != id);
        next
    }

    pub fn delete_frame(&self, id: &str) -> Scene {
        let mut next = self.clone();
        next.frames.retain(|f| f.id != id);
        next
    }

    pub fn delete_image(&self, id: &str) -> Scene {
        let mut next = self.clone();
        next.images.retain(|i| i.id != id);
        next
    }

    pub fn update_bubble_text(&self, id: &str, text: &str) -> Scene {
        let mut next = self.clone();
        for b in next.bubbles.iter_mut().filter(|b| b.id == id) {
            b.text = text.to_string();
        }
        next
    }

    pub fn update_frame_color(&self, id: &str, color: &str) -> Scene {
        let mut next = self.clone();
        for f in next.frames.iter_mut().filter(|f| f.id == id) {
            f.color = color.to_string();
        }
        next
    }

    pub fn update_cut_thickness(
        &self,
        id: &str,
        end: CutEnd,
        thickness: f64,
    ) -> Result<Scene, GeometryError> {
        check_thickness(id, thickness)?;
        let mut next = self.clone();
        for c in next.cuts.iter_mut().filter(|c| c.id == id) {
            match end {
                CutEnd::P1 => c.t1 = thickness,
                CutEnd::P2 => c.t2 = thickness,
            }
        }
        Ok(next)
    }

    pub fn set_image_source(&self, id: &str, src: Option<String>) -> Scene {
        let mut next = self.clone();
        for img in next.images.iter_mut().filter(|i| i.id == id) {
            img.src = src.clone();
        }
        next
    }

    /// Cuts whose segment currently touches `rect`.
    pub fn intersecting_cut_ids(&self, rect: &Rect) -> Vec<String> {
        self.cuts
            .iter()
            .filter(|c| segment_intersects_rect(c.p1, c.p2, rect))
            .map(|c| c.id.clone())
            .collect()
    }

    /// Lock an unlocked image to the cuts crossing it now, or unlock a locked one.
    pub fn toggle_image_lock(&self, id: &str) -> Scene {
        let mut next = self.clone();
        for img in next.images.iter_mut().filter(|i| i.id == id) {
            if img.is_locked {
                img.is_locked = false;
                img.locked_cut_ids.clear();
                tracing::debug!(image = %img.id, "unlock image");
            } else {
                img.locked_cut_ids = self.intersecting_cut_ids(&img.rect());
                img.is_locked = true;
                tracing::debug!(
                    image = %img.id,
                    cuts = img.locked_cut_ids.len(),
                    "lock image"
                );
            }
        }
        next
    }

    /// Cuts that mask `img`: every intersecting cut, or for a locked image only
    /// the recorded ones that still intersect.
    pub fn masking_cuts(&self, img: &ImageBox) -> Vec<&Cut> {
        let rect = img.rect();
        self.cuts
            .iter()
            .filter(|c| !img.is_locked || img.locked_cut_ids.iter().any(|id| *id == c.id))
            .filter(|c| segment_intersects_rect(c.p1, c.p2, &rect))
            .collect()
    }
}
