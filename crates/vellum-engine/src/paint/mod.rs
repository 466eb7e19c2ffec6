//! Scene nodes ("paints").
//!
//! A paint is anything a canvas can hold: it is told to `update` (recompute
//! render-ready state for a transform, clip set, opacity and dirtiness) and to
//! `render` (hand that state to the backend). Paints are shared through
//! [`PaintRef`] handles; the last handle dropped destroys the paint.
//!
//! Built-in paints:
//! - [`Shape`]: filled rect or circle
//! - [`Scene`]: group with its own transform, opacity and clip

mod flag;
mod scene;
mod shape;
mod state;

use std::cell::RefCell;
use std::rc::Rc;

use crate::coords::Transform;
use crate::render::{RenderBackend, RenderData};

pub use flag::UpdateFlag;
pub use scene::Scene;
pub use shape::{Geometry, Shape, ShapeDesc};
pub use state::{Composed, PaintState};

/// Shared handle to a paint.
pub type PaintRef = Rc<RefCell<dyn Paint>>;

/// Contract between containers (canvas, scenes) and scene nodes.
pub trait Paint {
    /// Recomputes render-ready state.
    ///
    /// `transform` is the accumulated parent transform (`None` at the top level),
    /// `clips` the clip data of every enclosing scene, `opacity` the inherited
    /// opacity and `flag` what the caller knows to be invalid.
    fn update(
        &mut self,
        backend: &mut dyn RenderBackend,
        transform: Option<&Transform>,
        clips: &[RenderData],
        opacity: u8,
        flag: UpdateFlag,
    );

    /// Emits drawing commands. Returns `true` if anything visible was produced.
    fn render(&mut self, backend: &mut dyn RenderBackend) -> bool;
}

/// Wraps a uniquely owned paint into a shared handle.
pub fn shared<P: Paint + 'static>(paint: P) -> PaintRef {
    Rc::new(RefCell::new(paint))
}
