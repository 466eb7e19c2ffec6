use crate::coords::Vec2;
use crate::render::RenderData;

use super::{Framebuffer, SwShape};

/// Composites `shapes` onto `target` in order (first is bottom-most).
pub(crate) fn rasterize(target: &mut Framebuffer, shapes: &[RenderData]) {
    for data in shapes {
        match data.downcast_ref::<SwShape>() {
            Some(shape) => fill(target, shape),
            None => log::warn!("skipping render data not produced by the software backend"),
        }
    }
}

fn fill(target: &mut Framebuffer, shape: &SwShape) {
    let Some(area) = shape.bounds().intersect(target.bounds()) else {
        return;
    };

    let min = area.min();
    let max = area.max();
    let (x0, y0) = (min.x.floor().max(0.0) as u32, min.y.floor().max(0.0) as u32);
    let (x1, y1) = (
        (max.x.ceil() as u32).min(target.width()),
        (max.y.ceil() as u32).min(target.height()),
    );

    for y in y0..y1 {
        for x in x0..x1 {
            let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            // Clip edges are honored at pixel centers.
            if !area.contains(center) {
                continue;
            }

            let coverage = shape.coverage(center);
            if coverage > 0.0 {
                target.blend(x, y, shape.color(), coverage);
            }
        }
    }
}
