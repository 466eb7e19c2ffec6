//! Headless canvas demo.
//!
//! Builds a small scene, spins it for a number of frames on the threaded
//! software backend and writes the last frame to a PNG.
//!
//! Usage: `vellum-studio [OUTPUT.png] [FRAMES]`

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;

use vellum_engine::canvas::Canvas;
use vellum_engine::color::Color;
use vellum_engine::coords::{Rect, Transform, Vec2};
use vellum_engine::logging::{LoggingConfig, init_logging};
use vellum_engine::paint::{self, PaintRef, Scene, Shape};
use vellum_engine::render::BackendRef;
use vellum_engine::render::sw::{SwConfig, SwRenderer, Threading};

const SIZE: u32 = 320;
const DEFAULT_FRAMES: u32 = 24;

/// Spins a clipped pinwheel on the threaded software backend and saves the last frame.
#[derive(Parser, Debug)]
#[command(name = "vellum-studio", version, about)]
struct Args {
    /// PNG file to write
    #[arg(default_value = "vellum-frame.png")]
    output: PathBuf,

    /// Number of update/draw/sync cycles to run
    #[arg(default_value_t = DEFAULT_FRAMES)]
    frames: u32,
}

/// Rotating pinwheel clipped to the middle of the target.
fn pinwheel(center: Vec2) -> Scene {
    let palette = [
        Color::from_srgb_u8(0xe6, 0x39, 0x46, 255),
        Color::from_srgb_u8(0xf4, 0xa2, 0x61, 255),
        Color::from_srgb_u8(0x2a, 0x9d, 0x8f, 255),
        Color::from_srgb_u8(0x45, 0x7b, 0x9d, 255),
    ];

    let mut scene = Scene::new();
    for (i, color) in palette.into_iter().enumerate() {
        let mut blade = Shape::rect(Rect::new(0.0, -14.0, 110.0, 28.0), color);
        blade.set_transform(
            Transform::rotate(90.0 * i as f32).then(Transform::translate(center.x, center.y)),
        );
        blade.set_opacity(220);
        scene.push(paint::shared(blade));
    }
    scene.push(paint::shared(Shape::circle(center, 18.0, Color::WHITE)));
    scene.set_clip(Some(Rect::new(40.0, 40.0, 240.0, 240.0)));
    scene
}

fn spin(center: Vec2, degrees: f32) -> Transform {
    Transform::translate(-center.x, -center.y)
        .then(Transform::rotate(degrees))
        .then(Transform::translate(center.x, center.y))
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    let args = Args::parse();

    let sw = SwRenderer::shared(SwConfig {
        width: SIZE,
        height: SIZE,
        clear_color: Color::from_srgb_u8(0x1d, 0x35, 0x57, 255),
        threading: Threading::Worker,
    })
    .context("failed to create software renderer")?;
    let backend: BackendRef = sw.clone();

    let center = Vec2::new(SIZE as f32 / 2.0, SIZE as f32 / 2.0);
    let scene = Rc::new(RefCell::new(pinwheel(center)));
    let scene_ref: PaintRef = scene.clone();

    let mut canvas = Canvas::new(&backend);
    canvas
        .push(Shape::rect(
            Rect::new(0.0, SIZE as f32 - 24.0, SIZE as f32, 24.0),
            Color::from_srgb_u8(0xa8, 0xda, 0xdc, 255),
        ))
        .context("failed to push footer")?;
    canvas.push_shared(&scene_ref).context("failed to push pinwheel")?;

    for frame in 0..args.frames {
        scene
            .borrow_mut()
            .set_transform(spin(center, frame as f32 * 7.5));

        canvas.update(None, false).context("update failed")?;
        canvas.clear(false, true).context("clear failed")?;
        canvas.draw().with_context(|| format!("draw of frame {frame} failed"))?;
        canvas.sync().context("sync failed")?;

        log::debug!("frame {frame} done");
    }

    let frame = sw.borrow_mut().snapshot().context("failed to read back frame")?;
    let image = image::RgbaImage::from_raw(frame.width(), frame.height(), frame.to_straight_rgba8())
        .context("frame buffer size does not match its dimensions")?;
    image
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    log::info!(
        "wrote {} frame(s) of {}x{} to {}",
        args.frames,
        frame.width(),
        frame.height(),
        args.output.display()
    );
    Ok(())
}
