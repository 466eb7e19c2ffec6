use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;

use crate::coords::Transform;
use crate::paint::{ShapeDesc, UpdateFlag};

/// Shared handle to a backend. Several canvases may hold the same one.
pub type BackendRef = Rc<RefCell<dyn RenderBackend>>;

/// Opaque, backend-produced state for one prepared object.
///
/// Owned by the paint that asked for it and handed back on every later
/// `prepare`/`render_shape`. Cheap to clone; safe to move to worker threads.
#[derive(Clone)]
pub struct RenderData(Arc<dyn Any + Send + Sync>);

impl RenderData {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Returns the payload if it was created by the backend expecting `T`.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &RenderData) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for RenderData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RenderData").field(&Arc::as_ptr(&self.0)).finish()
    }
}

/// Rendering engine driven by a canvas and by paints.
///
/// The canvas calls the lifecycle hooks: `pre_render`, then `render_shape`
/// (through its paints) and `post_render` per frame; `sync` blocks until the
/// submitted frame is finished. Work submitted by `post_render` may complete
/// asynchronously.
pub trait RenderBackend {
    /// Short name used in diagnostics.
    fn name(&self) -> &str;

    /// Wipes the render target.
    fn clear(&mut self) -> Result<()>;

    /// Starts recording a frame.
    fn pre_render(&mut self) -> Result<()>;

    /// Submits the recorded frame.
    fn post_render(&mut self) -> Result<()>;

    /// Waits for every submitted frame to finish.
    fn sync(&mut self) -> Result<()>;

    /// Bakes a shape into backend data.
    ///
    /// `data` is what the previous call returned for the same paint; with an
    /// empty `flag` a backend may hand it back unchanged.
    fn prepare(
        &mut self,
        shape: &ShapeDesc,
        data: Option<&RenderData>,
        transform: &Transform,
        clips: &[RenderData],
        opacity: u8,
        flag: UpdateFlag,
    ) -> Option<RenderData>;

    /// Records a prepared shape into the current frame. Returns `true` if it is visible.
    fn render_shape(&mut self, data: &RenderData) -> bool;
}
