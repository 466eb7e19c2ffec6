use crate::color::Color;
use crate::coords::{Rect, Transform, Vec2};
use crate::paint::{Geometry, ShapeDesc};
use crate::render::RenderData;

/// Device-space shape baked by [`super::SwRenderer::prepare`].
///
/// Rasterization maps each pixel center back through `inverse` and tests it
/// against the local geometry, so rotated and scaled shapes stay exact.
#[derive(Debug, Clone, PartialEq)]
pub struct SwShape {
    geometry: Geometry,
    inverse: Transform,
    scale: f32,
    bounds: Rect,
    color: Color,
}

impl SwShape {
    pub(crate) fn new(
        desc: &ShapeDesc,
        transform: &Transform,
        clips: &[RenderData],
        opacity: u8,
    ) -> Self {
        let color = desc.fill.with_opacity(opacity);

        let Some(inverse) = transform.invert() else {
            // Collapsed to a line or a point: nothing to cover.
            return Self {
                geometry: desc.geometry,
                inverse: Transform::IDENTITY,
                scale: 0.0,
                bounds: Rect::default(),
                color,
            };
        };

        let mut bounds = transform.transform_bounds(desc.geometry.bounds());
        if matches!(desc.geometry, Geometry::Circle { .. }) {
            // Room for the anti-aliased rim.
            bounds = bounds.inflate(0.5);
        }

        for clip in clips {
            let Some(clip) = clip.downcast_ref::<SwShape>() else {
                log::debug!("ignoring clip data from a foreign backend");
                continue;
            };
            bounds = bounds.intersect(clip.bounds).unwrap_or_default();
        }

        Self {
            geometry: desc.geometry,
            inverse,
            scale: transform.scale_factor(),
            bounds,
            color,
        }
    }

    /// Device-space area that may be touched, already clipped.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Fill color with the effective opacity applied.
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        !self.bounds.is_empty() && !self.color.is_transparent()
    }

    /// Fraction of the pixel centered at `p` (device space) covered by the shape.
    pub(crate) fn coverage(&self, p: Vec2) -> f32 {
        let local = self.inverse.apply(p);
        match self.geometry {
            Geometry::Rect(rect) => {
                if rect.contains(local) {
                    1.0
                } else {
                    0.0
                }
            }
            Geometry::Circle { center, radius } => {
                let edge = radius.abs() - (local - center).length();
                (edge * self.scale + 0.5).clamp(0.0, 1.0)
            }
        }
    }
}
