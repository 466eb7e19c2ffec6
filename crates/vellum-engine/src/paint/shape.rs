use crate::color::Color;
use crate::coords::{Rect, Transform, Vec2};
use crate::render::{RenderBackend, RenderData};

use super::{Paint, PaintState, UpdateFlag};

/// Shape outline in local scene units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Geometry {
    Rect(Rect),
    Circle { center: Vec2, radius: f32 },
}

impl Geometry {
    /// Local-space bounds of the outline.
    pub fn bounds(&self) -> Rect {
        match *self {
            Geometry::Rect(rect) => rect.normalized(),
            Geometry::Circle { center, radius } => {
                let r = radius.abs();
                Rect::new(center.x - r, center.y - r, 2.0 * r, 2.0 * r)
            }
        }
    }
}

/// Everything a backend needs to prepare a filled shape.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShapeDesc {
    pub geometry: Geometry,
    pub fill: Color,
}

/// A filled geometric primitive.
///
/// Render data is produced by the backend during update and owned here; it is
/// only recomputed when something changed, either locally or upstream.
#[derive(Debug)]
pub struct Shape {
    state: PaintState,
    desc: ShapeDesc,
    data: Option<RenderData>,
}

impl Shape {
    pub fn new(geometry: Geometry, fill: Color) -> Self {
        Self {
            state: PaintState::new(),
            desc: ShapeDesc { geometry, fill },
            data: None,
        }
    }

    #[inline]
    pub fn rect(rect: Rect, fill: Color) -> Self {
        Self::new(Geometry::Rect(rect), fill)
    }

    #[inline]
    pub fn circle(center: Vec2, radius: f32, fill: Color) -> Self {
        Self::new(Geometry::Circle { center, radius }, fill)
    }

    #[inline]
    pub fn geometry(&self) -> Geometry {
        self.desc.geometry
    }

    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.desc.geometry = geometry;
        self.state.mark(UpdateFlag::PATH);
    }

    #[inline]
    pub fn fill(&self) -> Color {
        self.desc.fill
    }

    pub fn set_fill(&mut self, fill: Color) {
        self.desc.fill = fill;
        self.state.mark(UpdateFlag::COLOR);
    }

    #[inline]
    pub fn transform(&self) -> Transform {
        self.state.transform()
    }

    #[inline]
    pub fn set_transform(&mut self, transform: Transform) {
        self.state.set_transform(transform);
    }

    #[inline]
    pub fn opacity(&self) -> u8 {
        self.state.opacity()
    }

    #[inline]
    pub fn set_opacity(&mut self, opacity: u8) {
        self.state.set_opacity(opacity);
    }

    /// Changes not yet consumed by an update.
    #[inline]
    pub fn pending(&self) -> UpdateFlag {
        self.state.pending()
    }

    /// Backend data from the last update, if any.
    #[inline]
    pub fn render_data(&self) -> Option<&RenderData> {
        self.data.as_ref()
    }
}

impl Paint for Shape {
    fn update(
        &mut self,
        backend: &mut dyn RenderBackend,
        transform: Option<&Transform>,
        clips: &[RenderData],
        opacity: u8,
        flag: UpdateFlag,
    ) {
        let composed = self.state.compose(transform, opacity, flag);
        self.data = backend.prepare(
            &self.desc,
            self.data.as_ref(),
            &composed.transform,
            clips,
            composed.opacity,
            composed.flag,
        );
    }

    fn render(&mut self, backend: &mut dyn RenderBackend) -> bool {
        match &self.data {
            Some(data) => backend.render_shape(data),
            None => false,
        }
    }
}
