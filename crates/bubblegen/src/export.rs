//! Standalone SVG export of a scene.
//!
//! Layering (bottom to top): background, images (clipped to their container and
//! masked by the half-planes of the cuts that touch them), cuts, frame walls,
//! bubbles with their text. All path data comes from the same builders the
//! display layer uses, so re-parsing an exported `d` attribute reproduces the
//! in-process geometry.

use std::fmt::Write;

use crate::error::GeometryError;
use crate::geom::cfg::WALL_EXTENT;
use crate::geom::{bubble_path, half_plane_mask, tapered_segment, BubbleCfg, Path, Point};
use crate::scene::{Frame, ImageBox, Scene};

pub const DEFAULT_BACKGROUND: &str = "#0f172a";
pub const SHADOW_FILTER_ID: &str = "solid-shadow";

const SHADOW_FILTER: &str = r##"<filter id="solid-shadow" x="-50%" y="-50%" width="200%" height="200%"><feMorphology in="SourceAlpha" operator="dilate" radius="3" result="dilated"/><feFlood flood-color="#000" result="color"/><feComposite in="color" in2="dilated" operator="in" result="outline"/><feOffset in="outline" dx="0" dy="0" result="shadow"/><feMerge><feMergeNode in="shadow"/><feMergeNode in="SourceGraphic"/></feMerge></filter>"##;

const TEXT_STYLE: &str = "width:100%; height:100%; display:flex; align-items:center; justify-content:center; text-align:center; color:#0f172a; font-family:system-ui, sans-serif; font-weight:500; line-height:1.375; padding:1rem; box-sizing:border-box; overflow:hidden; word-wrap:break-word;";

/// Document-level export options.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportCfg {
    pub width: f64,
    pub height: f64,
    pub background: String,
    /// Half-size of the wall square each frame window is cut from.
    pub wall_extent: f64,
    pub bubble: BubbleCfg,
}

impl ExportCfg {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

impl Default for ExportCfg {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            background: DEFAULT_BACKGROUND.to_string(),
            wall_extent: WALL_EXTENT,
            bubble: BubbleCfg::default(),
        }
    }
}

/// Escape `< > & ' "` for XML text and attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_xml_into(&mut out, text);
    out
}

pub fn escape_xml_into(out: &mut String, text: &str) {
    let mut start = 0usize;
    for (i, b) in text.bytes().enumerate() {
        let esc = match b {
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'&' => "&amp;",
            b'\'' => "&apos;",
            b'"' => "&quot;",
            _ => continue,
        };
        out.push_str(&text[start..i]);
        out.push_str(esc);
        start = i + 1;
    }
    out.push_str(&text[start..]);
}

/// Opaque square of half-size `extent` with the frame quad as a second subpath;
/// filled even-odd, the quad becomes a window.
pub fn frame_wall_path(frame: &Frame, extent: f64) -> Path {
    let e = extent;
    let mut path = Path::polygon(&[
        Point::new(-e, -e),
        Point::new(e, -e),
        Point::new(e, e),
        Point::new(-e, e),
    ]);
    path.segs.extend(Path::polygon(&frame.corners()).segs);
    path
}

/// Alpha mask for one image: white container, black half-plane per masking cut.
pub fn image_mask_paths(scene: &Scene, img: &ImageBox) -> Vec<Path> {
    let keep = img.rect().center();
    scene
        .masking_cuts(img)
        .into_iter()
        .map(|c| half_plane_mask(c.p1, c.p2, keep))
        .collect()
}

/// Render `scene` into a self-contained SVG document.
pub fn render_svg(scene: &Scene, cfg: &ExportCfg) -> Result<String, GeometryError> {
    scene.validate()?;
    let (w, h) = (cfg.width, cfg.height);
    let mut out = String::new();

    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    let _ = write!(out, "<defs>{SHADOW_FILTER}</defs>");
    out.push_str(r#"<rect width="100%" height="100%" fill=""#);
    escape_xml_into(&mut out, &cfg.background);
    out.push_str(r#"" />"#);

    for img in &scene.images {
        write_image(&mut out, scene, img);
    }

    for cut in &scene.cuts {
        let path = tapered_segment(cut.p1, cut.p2, cut.t1, cut.t2)?;
        if path.is_empty() {
            continue;
        }
        let _ = write!(out, r#"<path d="{path}" fill="black" />"#);
    }

    for frame in &scene.frames {
        let path = frame_wall_path(frame, cfg.wall_extent);
        let _ = write!(out, r#"<path d="{path}" fill=""#);
        escape_xml_into(&mut out, &frame.color);
        out.push_str(r#"" fill-rule="evenodd" />"#);
    }

    for b in &scene.bubbles {
        let rect = b.rect();
        let path = bubble_path(&rect, b.anchor, b.border_radius, &cfg.bubble)?;
        let _ = write!(
            out,
            r#"<path d="{path}" fill="white" filter="url(#{SHADOW_FILTER_ID})" />"#
        );
        let _ = write!(
            out,
            r#"<foreignObject x="{}" y="{}" width="{}" height="{}"><div xmlns="http://www.w3.org/1999/xhtml" style="{TEXT_STYLE}">"#,
            rect.x, rect.y, rect.width, rect.height
        );
        escape_xml_into(&mut out, &b.text);
        out.push_str("</div></foreignObject>");
    }

    out.push_str("</svg>");
    tracing::debug!(
        bubbles = scene.bubbles.len(),
        cuts = scene.cuts.len(),
        frames = scene.frames.len(),
        images = scene.images.len(),
        bytes = out.len(),
        "rendered svg"
    );
    Ok(out)
}

fn write_image(out: &mut String, scene: &Scene, img: &ImageBox) {
    let id = escape_xml(&img.id);
    let r = img.rect();
    let _ = write!(
        out,
        r#"<defs><mask id="mask-{id}"><rect x="{}" y="{}" width="{}" height="{}" fill="white" />"#,
        r.x, r.y, r.width, r.height
    );
    for mask in image_mask_paths(scene, img) {
        let _ = write!(out, r#"<path d="{mask}" fill="black" />"#);
    }
    let _ = write!(
        out,
        r#"</mask><clipPath id="clip-{id}"><rect x="{}" y="{}" width="{}" height="{}" /></clipPath></defs>"#,
        r.x, r.y, r.width, r.height
    );

    let Some(src) = &img.src else {
        return;
    };
    let s = img.scaled_rect();
    out.push_str(r#"<image href=""#);
    escape_xml_into(out, src);
    let _ = write!(
        out,
        r#"" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid slice" clip-path="url(#clip-{id})" mask="url(#mask-{id})" />"#,
        s.x, s.y, s.width, s.height
    );
}
