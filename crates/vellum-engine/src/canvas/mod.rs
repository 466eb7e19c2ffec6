//! Canvas controller.
//!
//! A [`Canvas`] owns the top-level paints of a scene and one shared backend
//! handle, and walks them through the frame lifecycle:
//!
//! ```text
//!   push / clear ──► update ──► draw ──► sync
//!        ▲                                 │
//!        └─────────────────────────────────┘
//! ```
//!
//! While a frame is in flight (`Drawing`) nothing may touch the paint list;
//! only `sync` can bring the canvas back. Every failing call leaves the canvas
//! exactly as it was.

mod error;
mod status;


use std::cell::RefCell;
use std::rc::Rc;

use crate::paint::{Paint, PaintRef, UpdateFlag};
use crate::render::{BackendRef, RenderBackend};

pub use error::{BackendStage, CanvasError, CanvasResult, ResultCode};
pub use status::CanvasStatus;

/// Ordered set of top-level paints bound to one rendering backend.
///
/// Paints are drawn in insertion order, so the first pushed paint ends up at
/// the bottom. The canvas is single-threaded; callers serialize access.
pub struct Canvas {
    paints: Vec<PaintRef>,
    backend: BackendRef,
    status: CanvasStatus,
    /// Forces a full update of every paint on the next update pass.
    refresh: bool,
}

impl Canvas {
    /// Binds a new, empty canvas to `backend`. The canvas keeps its own handle.
    pub fn new(backend: &BackendRef) -> Self {
        log::debug!("canvas created ({} backend holders)", Rc::strong_count(backend) + 1);
        Self {
            paints: Vec::new(),
            backend: Rc::clone(backend),
            status: CanvasStatus::Synced,
            refresh: false,
        }
    }

    #[inline]
    pub fn status(&self) -> CanvasStatus {
        self.status
    }

    /// Number of top-level paints.
    #[inline]
    pub fn len(&self) -> usize {
        self.paints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.paints.is_empty()
    }

    #[inline]
    pub fn needs_refresh(&self) -> bool {
        self.refresh
    }

    /// Takes ownership of `paint`, appends it on top and updates it.
    ///
    /// Only the new paint is updated, with a full flag; siblings are left alone.
    pub fn push<P: Paint + 'static>(&mut self, paint: P) -> CanvasResult<()> {
        if self.status == CanvasStatus::Drawing {
            return Err(CanvasError::Drawing);
        }
        let paint: PaintRef = Rc::new(RefCell::new(paint));
        self.attach(paint)
    }

    /// Appends a paint that is also referenced elsewhere (e.g. by a scene).
    ///
    /// The canvas adds its own handle; dropping it later does not destroy a
    /// paint that other holders still reference.
    pub fn push_shared(&mut self, paint: &PaintRef) -> CanvasResult<()> {
        if self.status == CanvasStatus::Drawing {
            return Err(CanvasError::Drawing);
        }
        if paint.try_borrow_mut().is_err() {
            return Err(CanvasError::PaintUnavailable);
        }
        self.attach(Rc::clone(paint))
    }

    fn attach(&mut self, paint: PaintRef) -> CanvasResult<()> {
        // The follow-up update must not fail once the paint is in the list.
        if self.backend.try_borrow_mut().is_err() {
            return Err(CanvasError::BackendBusy);
        }

        self.paints.push(Rc::clone(&paint));
        log::debug!("paint pushed ({} on canvas)", self.paints.len());
        self.update(Some(&paint), true)
    }

    /// Clears the render target (`buffer`) and/or drops every paint (`paints`).
    ///
    /// The target is cleared first; if the backend refuses, paints are kept.
    pub fn clear(&mut self, paints: bool, buffer: bool) -> CanvasResult<()> {
        if self.status == CanvasStatus::Drawing {
            return Err(CanvasError::Drawing);
        }

        if buffer {
            let mut backend = self
                .backend
                .try_borrow_mut()
                .map_err(|_| CanvasError::BackendBusy)?;
            backend
                .clear()
                .map_err(|source| refused(&*backend, BackendStage::Clear, source))?;
        }

        if paints {
            self.release_paints();
        }
        Ok(())
    }

    /// Requests a full update of every paint on the next update pass.
    pub fn need_refresh(&mut self) {
        self.refresh = true;
    }

    /// Updates one paint, or all of them when `paint` is `None`.
    ///
    /// Paints receive a full flag when `force` is set or a refresh is pending,
    /// otherwise an empty one and rely on their own change tracking. Only a
    /// pass over all paints consumes the pending refresh. Either way the whole
    /// canvas becomes `Updating`.
    pub fn update(&mut self, paint: Option<&PaintRef>, force: bool) -> CanvasResult<()> {
        if self.paints.is_empty() {
            return Err(CanvasError::EmptyScene);
        }
        if self.status == CanvasStatus::Drawing {
            return Err(CanvasError::Drawing);
        }

        let mut backend = self
            .backend
            .try_borrow_mut()
            .map_err(|_| CanvasError::BackendBusy)?;

        let targets = match paint {
            Some(paint) => std::slice::from_ref(paint),
            None => &self.paints[..],
        };
        if targets.iter().any(|p| p.try_borrow_mut().is_err()) {
            return Err(CanvasError::PaintBusy);
        }

        let flag = if self.refresh || force {
            UpdateFlag::all()
        } else {
            UpdateFlag::empty()
        };

        for target in targets {
            target.borrow_mut().update(&mut *backend, None, &[], 255, flag);
        }
        drop(backend);

        if paint.is_none() {
            self.refresh = false;
        }
        self.set_status(CanvasStatus::Updating);
        Ok(())
    }

    /// Renders every paint in order and submits the frame.
    ///
    /// Fails without changing state if no paint produced visible output; the
    /// frame is then not submitted.
    pub fn draw(&mut self) -> CanvasResult<()> {
        if self.status == CanvasStatus::Drawing {
            return Err(CanvasError::Drawing);
        }
        if self.paints.is_empty() {
            return Err(CanvasError::EmptyScene);
        }

        let mut backend = self
            .backend
            .try_borrow_mut()
            .map_err(|_| CanvasError::BackendBusy)?;
        if self.paints.iter().any(|p| p.try_borrow_mut().is_err()) {
            return Err(CanvasError::PaintBusy);
        }

        backend
            .pre_render()
            .map_err(|source| refused(&*backend, BackendStage::PreRender, source))?;

        let mut rendered = false;
        for paint in &self.paints {
            if paint.borrow_mut().render(&mut *backend) {
                rendered = true;
            }
        }
        if !rendered {
            log::debug!("draw skipped: nothing visible on {} paints", self.paints.len());
            return Err(CanvasError::NothingRendered);
        }

        backend
            .post_render()
            .map_err(|source| refused(&*backend, BackendStage::PostRender, source))?;
        drop(backend);

        self.set_status(CanvasStatus::Drawing);
        Ok(())
    }

    /// Blocks until the backend finished the submitted frame.
    pub fn sync(&mut self) -> CanvasResult<()> {
        if self.status == CanvasStatus::Synced {
            return Err(CanvasError::AlreadySynced);
        }

        let mut backend = self
            .backend
            .try_borrow_mut()
            .map_err(|_| CanvasError::BackendBusy)?;
        backend
            .sync()
            .map_err(|source| refused(&*backend, BackendStage::Sync, source))?;
        drop(backend);

        self.set_status(CanvasStatus::Synced);
        Ok(())
    }

    fn set_status(&mut self, next: CanvasStatus) {
        debug_assert!(
            self.status.can_transition_to(next),
            "illegal canvas transition {:?} -> {:?}",
            self.status,
            next
        );
        if self.status != next {
            log::trace!("canvas {:?} -> {:?}", self.status, next);
        }
        self.status = next;
    }

    fn release_paints(&mut self) {
        let count = self.paints.len();
        self.paints.clear();
        log::debug!("released {count} paints");
    }
}

impl Drop for Canvas {
    fn drop(&mut self) {
        // An in-flight frame may still read paint data.
        match self.backend.try_borrow_mut() {
            Ok(mut backend) => {
                if let Err(e) = backend.sync() {
                    log::warn!("{} sync failed during canvas teardown: {e:#}", backend.name());
                }
            }
            Err(_) => log::warn!("backend borrowed during canvas teardown; not joined"),
        }
        self.release_paints();
    }
}

fn refused(backend: &dyn RenderBackend, stage: BackendStage, source: anyhow::Error) -> CanvasError {
    let backend = backend.name().to_owned();
    log::warn!("{backend} refused {stage}: {source:#}");
    CanvasError::Backend { backend, stage, source }
}
