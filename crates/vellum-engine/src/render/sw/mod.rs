//! CPU software backend.
//!
//! Frames are recorded between `pre_render` and `post_render` as a list of
//! prepared [`SwShape`]s and composited onto an RGBA8 [`Framebuffer`], either
//! immediately or on a dedicated worker thread. With the worker, at most one
//! frame is in flight; `sync` (and any call that touches the target) waits for
//! it.

mod raster;
mod shape;
mod target;
mod worker;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Result, anyhow, ensure};

use crate::color::Color;
use crate::coords::Transform;
use crate::paint::{ShapeDesc, UpdateFlag};
use crate::render::{RenderBackend, RenderData};

pub use shape::SwShape;
pub use target::{Framebuffer, Pixel};

use worker::{Job, Worker};

/// Where recorded frames are rasterized.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Threading {
    /// On the calling thread, inside `post_render`.
    #[default]
    Inline,
    /// On one dedicated thread; `post_render` only dispatches.
    Worker,
}

/// Software backend configuration.
#[derive(Debug, Clone)]
pub struct SwConfig {
    /// Target width in device pixels.
    pub width: u32,
    /// Target height in device pixels.
    pub height: u32,
    /// Color written by `clear`.
    pub clear_color: Color,
    pub threading: Threading,
}

impl Default for SwConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            clear_color: Color::TRANSPARENT,
            threading: Threading::Inline,
        }
    }
}

/// CPU rasterizer implementing [`RenderBackend`].
pub struct SwRenderer {
    config: SwConfig,
    target: Arc<Mutex<Framebuffer>>,
    /// Shapes recorded for the current frame.
    frame: Vec<RenderData>,
    recording: bool,
    /// A frame was dispatched to the worker and not yet joined.
    pending: bool,
    worker: Option<Worker>,
}

impl SwRenderer {
    pub fn new(config: SwConfig) -> Result<Self> {
        ensure!(
            config.width > 0 && config.height > 0,
            "software target has zero size ({}x{})",
            config.width,
            config.height
        );

        let target = Arc::new(Mutex::new(Framebuffer::new(config.width, config.height)));
        let worker = match config.threading {
            Threading::Inline => None,
            Threading::Worker => Some(Worker::spawn(Arc::clone(&target))?),
        };

        log::debug!(
            "software renderer created: {}x{}, {:?}",
            config.width,
            config.height,
            config.threading
        );

        Ok(Self {
            config,
            target,
            frame: Vec::new(),
            recording: false,
            pending: false,
            worker,
        })
    }

    /// Creates a renderer behind a shared handle, ready to bind to canvases.
    pub fn shared(config: SwConfig) -> Result<Rc<RefCell<Self>>> {
        Ok(Rc::new(RefCell::new(Self::new(config)?)))
    }

    #[inline]
    pub fn config(&self) -> &SwConfig {
        &self.config
    }

    /// Whether a dispatched frame has not been joined yet.
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.pending
    }

    /// Replaces the target with a transparent one of the given size.
    pub fn set_target(&mut self, width: u32, height: u32) -> Result<()> {
        ensure!(width > 0 && height > 0, "software target has zero size ({width}x{height})");
        self.join()?;
        *self.lock_target()? = Framebuffer::new(width, height);
        self.config.width = width;
        self.config.height = height;
        Ok(())
    }

    /// Copy of the target after any in-flight frame finished.
    pub fn snapshot(&mut self) -> Result<Framebuffer> {
        self.join()?;
        Ok(self.lock_target()?.clone())
    }

    /// Waits for the in-flight frame. A frame lost with its worker stays
    /// pending, so every later join fails too.
    fn join(&mut self) -> Result<()> {
        if !self.pending {
            return Ok(());
        }
        if let Some(worker) = &self.worker {
            worker.wait()?;
        }
        self.pending = false;
        Ok(())
    }

    fn lock_target(&self) -> Result<MutexGuard<'_, Framebuffer>> {
        self.target
            .lock()
            .map_err(|_| anyhow!("software target mutex poisoned"))
    }
}

impl RenderBackend for SwRenderer {
    fn name(&self) -> &str {
        "SwRenderer"
    }

    fn clear(&mut self) -> Result<()> {
        self.join()?;
        self.lock_target()?.fill(self.config.clear_color);
        Ok(())
    }

    fn pre_render(&mut self) -> Result<()> {
        self.join()?;
        if self.recording {
            log::debug!("pre_render restarts an unfinished frame");
        }
        self.frame.clear();
        self.recording = true;
        Ok(())
    }

    fn post_render(&mut self) -> Result<()> {
        ensure!(self.recording, "post_render without a matching pre_render");
        self.recording = false;
        let shapes = std::mem::take(&mut self.frame);

        match &self.worker {
            Some(worker) => {
                ensure!(!self.pending, "a frame is already in flight");
                worker.submit(Job { shapes })?;
                self.pending = true;
            }
            None => {
                let mut target = self.lock_target()?;
                raster::rasterize(&mut target, &shapes);
            }
        }
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        self.join()
    }

    fn prepare(
        &mut self,
        shape: &ShapeDesc,
        data: Option<&RenderData>,
        transform: &Transform,
        clips: &[RenderData],
        opacity: u8,
        flag: UpdateFlag,
    ) -> Option<RenderData> {
        if flag.is_empty() {
            if let Some(data) = data.filter(|d| d.downcast_ref::<SwShape>().is_some()) {
                return Some(data.clone());
            }
        }
        Some(RenderData::new(SwShape::new(shape, transform, clips, opacity)))
    }

    fn render_shape(&mut self, data: &RenderData) -> bool {
        if !self.recording {
            log::warn!("render_shape outside pre_render/post_render; ignored");
            return false;
        }
        match data.downcast_ref::<SwShape>() {
            Some(shape) if shape.is_visible() => {
                self.frame.push(data.clone());
                true
            }
            Some(_) => false,
            None => {
                log::warn!("render data was not produced by the software backend");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rect;
    use crate::paint::Geometry;

    fn square(x: f32, y: f32, size: f32) -> ShapeDesc {
        ShapeDesc { geometry: Geometry::Rect(Rect::new(x, y, size, size)), fill: Color::BLACK }
    }

    fn config(threading: Threading) -> SwConfig {
        SwConfig { width: 16, height: 16, threading, ..SwConfig::default() }
    }

    fn draw_square(sw: &mut SwRenderer) -> bool {
        let data = sw
            .prepare(&square(0.0, 0.0, 4.0), None, &Transform::IDENTITY, &[], 255, UpdateFlag::all())
            .unwrap();
        sw.pre_render().unwrap();
        let visible = sw.render_shape(&data);
        sw.post_render().unwrap();
        visible
    }

    #[test]
    fn zero_sized_target_is_rejected() {
        assert!(SwRenderer::new(SwConfig { width: 0, ..SwConfig::default() }).is_err());
    }

    #[test]
    fn inline_frame_is_visible_immediately() {
        let mut sw = SwRenderer::new(config(Threading::Inline)).unwrap();
        assert!(draw_square(&mut sw));
        assert!(!sw.is_busy());
        assert_eq!(sw.snapshot().unwrap().pixel(1, 1).map(|p| p.a), Some(255));
    }

    #[test]
    fn worker_frame_is_joined_by_sync() {
        let mut sw = SwRenderer::new(config(Threading::Worker)).unwrap();
        assert!(draw_square(&mut sw));
        assert!(sw.is_busy());
        sw.sync().unwrap();
        assert!(!sw.is_busy());
        assert_eq!(sw.snapshot().unwrap().pixel(1, 1).map(|p| p.a), Some(255));
        assert_eq!(sw.snapshot().unwrap().pixel(8, 8).map(|p| p.a), Some(0));
    }

    #[test]
    fn clear_waits_and_fills() {
        let mut sw = SwRenderer::new(SwConfig {
            clear_color: Color::WHITE,
            ..config(Threading::Worker)
        })
        .unwrap();
        draw_square(&mut sw);
        sw.clear().unwrap();
        assert!(!sw.is_busy());
        let fb = sw.snapshot().unwrap();
        assert!(fb.pixels().iter().all(|p| *p == Pixel::from_color(Color::WHITE)));
    }

    #[test]
    fn unchanged_data_is_reused() {
        let mut sw = SwRenderer::new(config(Threading::Inline)).unwrap();
        let desc = square(0.0, 0.0, 4.0);
        let first = sw
            .prepare(&desc, None, &Transform::IDENTITY, &[], 255, UpdateFlag::all())
            .unwrap();

        let reused = sw
            .prepare(&desc, Some(&first), &Transform::IDENTITY, &[], 255, UpdateFlag::empty())
            .unwrap();
        assert!(reused.ptr_eq(&first));

        let rebuilt = sw
            .prepare(&desc, Some(&first), &Transform::IDENTITY, &[], 255, UpdateFlag::COLOR)
            .unwrap();
        assert!(!rebuilt.ptr_eq(&first));
    }

    #[test]
    fn invisible_shapes_are_not_recorded() {
        let mut sw = SwRenderer::new(config(Threading::Inline)).unwrap();
        let hidden = sw
            .prepare(&square(0.0, 0.0, 4.0), None, &Transform::IDENTITY, &[], 0, UpdateFlag::all())
            .unwrap();
        sw.pre_render().unwrap();
        assert!(!sw.render_shape(&hidden));
        sw.post_render().unwrap();
        assert!(sw.snapshot().unwrap().pixels().iter().all(|p| p.a == 0));
    }

    #[test]
    fn post_render_requires_pre_render() {
        let mut sw = SwRenderer::new(config(Threading::Inline)).unwrap();
        assert!(sw.post_render().is_err());
    }

    #[test]
    fn render_outside_frame_is_ignored() {
        let mut sw = SwRenderer::new(config(Threading::Inline)).unwrap();
        let data = sw
            .prepare(&square(0.0, 0.0, 4.0), None, &Transform::IDENTITY, &[], 255, UpdateFlag::all())
            .unwrap();
        assert!(!sw.render_shape(&data));
    }

    #[test]
    fn lost_worker_keeps_failing() {
        let mut sw = SwRenderer::new(config(Threading::Worker)).unwrap();

        // A poisoned target makes the raster thread stop and hang up.
        let target = Arc::clone(&sw.target);
        let _ = std::thread::spawn(move || {
            let _guard = target.lock().unwrap();
            panic!("poison the software target");
        })
        .join();

        draw_square(&mut sw);
        assert!(sw.sync().is_err());
        assert!(sw.is_busy());
        assert!(sw.sync().is_err());
        assert!(sw.clear().is_err());
        assert!(sw.pre_render().is_err());
    }

    #[test]
    fn set_target_resizes() {
        let mut sw = SwRenderer::new(config(Threading::Worker)).unwrap();
        draw_square(&mut sw);
        sw.set_target(8, 4).unwrap();
        let fb = sw.snapshot().unwrap();
        assert_eq!((fb.width(), fb.height()), (8, 4));
        assert!(sw.set_target(0, 4).is_err());
    }
}
