use crate::color::Color;
use crate::coords::{Rect, Transform};
use crate::render::{RenderBackend, RenderData};

use super::{Geometry, Paint, PaintRef, PaintState, ShapeDesc, UpdateFlag};

/// A group of paints sharing a transform, an opacity and an optional clip.
///
/// Children are held through shared handles, so the same paint may also sit
/// directly on a canvas or inside another scene.
#[derive(Default)]
pub struct Scene {
    state: PaintState,
    children: Vec<PaintRef>,
    clip: Option<Rect>,
    clip_data: Option<RenderData>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a child on top of the existing ones.
    pub fn push(&mut self, child: PaintRef) {
        self.children.push(child);
    }

    /// Drops every child handle.
    pub fn clear(&mut self) {
        self.children.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Restricts children to `clip` (in this scene's local space).
    pub fn set_clip(&mut self, clip: Option<Rect>) {
        if self.clip != clip {
            self.clip = clip;
            self.state.mark(UpdateFlag::CLIP);
        }
    }

    #[inline]
    pub fn clip(&self) -> Option<Rect> {
        self.clip
    }

    #[inline]
    pub fn set_transform(&mut self, transform: Transform) {
        self.state.set_transform(transform);
    }

    #[inline]
    pub fn set_opacity(&mut self, opacity: u8) {
        self.state.set_opacity(opacity);
    }

    #[inline]
    pub fn opacity(&self) -> u8 {
        self.state.opacity()
    }
}

impl Paint for Scene {
    fn update(
        &mut self,
        backend: &mut dyn RenderBackend,
        transform: Option<&Transform>,
        clips: &[RenderData],
        opacity: u8,
        flag: UpdateFlag,
    ) {
        let composed = self.state.compose(transform, opacity, flag);

        let mut scoped = Vec::new();
        match self.clip {
            Some(rect) => {
                let desc = ShapeDesc { geometry: Geometry::Rect(rect), fill: Color::WHITE };
                self.clip_data = backend.prepare(
                    &desc,
                    self.clip_data.as_ref(),
                    &composed.transform,
                    clips,
                    255,
                    composed.flag,
                );
                scoped.extend_from_slice(clips);
                scoped.extend(self.clip_data.clone());
            }
            None => self.clip_data = None,
        }
        let clips = if self.clip.is_some() { &scoped[..] } else { clips };

        for child in &self.children {
            match child.try_borrow_mut() {
                Ok(mut child) => child.update(
                    backend,
                    Some(&composed.transform),
                    clips,
                    composed.opacity,
                    composed.flag,
                ),
                Err(_) => log::warn!("scene child is already borrowed (cycle?); skipping update"),
            }
        }
    }

    fn render(&mut self, backend: &mut dyn RenderBackend) -> bool {
        let mut rendered = false;
        for child in &self.children {
            match child.try_borrow_mut() {
                Ok(mut child) => rendered |= child.render(backend),
                Err(_) => log::warn!("scene child is already borrowed (cycle?); skipping render"),
            }
        }
        rendered
    }
}
