use anyhow::{bail, Context, Result};
use bubblegen::export::{render_svg, ExportCfg, DEFAULT_BACKGROUND};
use bubblegen::geom::{bubble_path, tapered_segment};
use bubblegen::scene::{demo::starter_scene, Scene, Viewport};
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Parser)]
#[command(name = "bubblegen-cli")]
#[command(about = "Build, lock and export bubble/cut/frame scenes")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Write a starter scene (two bubbles plus a seeded cut, frame and image)
    Demo {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 1280.0)]
        width: f64,
        #[arg(long, default_value_t = 720.0)]
        height: f64,
    },
    /// Render a scene JSON file to a standalone SVG
    Export {
        #[arg(long)]
        scene: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 1280.0)]
        width: f64,
        #[arg(long, default_value_t = 720.0)]
        height: f64,
        #[arg(long, default_value = DEFAULT_BACKGROUND)]
        background: String,
    },
    /// Toggle the cut lock of one image container
    Lock {
        #[arg(long)]
        scene: PathBuf,
        #[arg(long)]
        image: String,
        /// Defaults to rewriting the input scene
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print computed path data and masking cuts as JSON
    Inspect {
        #[arg(long)]
        scene: PathBuf,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Demo {
            out,
            seed,
            width,
            height,
        } => demo(&out, seed, Viewport::new(width, height)),
        Action::Export {
            scene,
            out,
            width,
            height,
            background,
        } => {
            let cfg = ExportCfg {
                background,
                ..ExportCfg::new(width, height)
            };
            export(&scene, &out, &cfg)
        }
        Action::Lock { scene, image, out } => {
            let out = out.unwrap_or_else(|| scene.clone());
            lock(&scene, &image, &out)
        }
        Action::Inspect { scene } => {
            let report = inspect(&load_scene(&scene)?)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

fn load_scene(path: &Path) -> Result<Scene> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let scene: Scene = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing scene {}", path.display()))?;
    scene
        .validate()
        .with_context(|| format!("validating scene {}", path.display()))?;
    Ok(scene)
}

fn write_output(out: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    std::fs::write(out, bytes).with_context(|| format!("writing {}", out.display()))
}

fn save_scene(scene: &Scene, out: &Path) -> Result<()> {
    write_output(out, &serde_json::to_vec_pretty(scene)?)
}

fn demo(out: &Path, seed: u64, viewport: Viewport) -> Result<()> {
    tracing::info!(out = %out.display(), seed, "demo");
    let mut rng = StdRng::seed_from_u64(seed);
    save_scene(&starter_scene(&mut rng, viewport), out)
}

fn export(scene_path: &Path, out: &Path, cfg: &ExportCfg) -> Result<()> {
    tracing::info!(
        scene = %scene_path.display(),
        out = %out.display(),
        width = cfg.width,
        height = cfg.height,
        "export"
    );
    let scene = load_scene(scene_path)?;
    let svg = render_svg(&scene, cfg).context("rendering svg")?;
    write_output(out, svg.as_bytes())
}

fn lock(scene_path: &Path, image: &str, out: &Path) -> Result<()> {
    let scene = load_scene(scene_path)?;
    if scene.image(image).is_none() {
        bail!("no image with id {image:?} in {}", scene_path.display());
    }
    let next = scene.toggle_image_lock(image);
    if let Some(img) = next.image(image) {
        tracing::info!(
            image,
            locked = img.is_locked,
            cuts = ?img.locked_cut_ids,
            "lock"
        );
    }
    save_scene(&next, out)
}

fn inspect(scene: &Scene) -> Result<serde_json::Value> {
    let cfg = ExportCfg::default();
    let mut bubbles = Vec::with_capacity(scene.bubbles.len());
    for b in &scene.bubbles {
        let path = bubble_path(&b.rect(), b.anchor, b.border_radius, &cfg.bubble)?;
        bubbles.push(serde_json::json!({ "id": b.id, "d": path.to_svg_data() }));
    }
    let mut cuts = Vec::with_capacity(scene.cuts.len());
    for c in &scene.cuts {
        let path = tapered_segment(c.p1, c.p2, c.t1, c.t2)?;
        cuts.push(serde_json::json!({ "id": c.id, "d": path.to_svg_data() }));
    }
    let images: Vec<_> = scene
        .images
        .iter()
        .map(|img| {
            let masking: Vec<&str> = scene
                .masking_cuts(img)
                .iter()
                .map(|c| c.id.as_str())
                .collect();
            serde_json::json!({
                "id": img.id,
                "locked": img.is_locked,
                "maskingCuts": masking,
            })
        })
        .collect();
    Ok(serde_json::json!({
        "version": bubblegen::VERSION,
        "bubbles": bubbles,
        "cuts": cuts,
        "images": images,
    }))
}
