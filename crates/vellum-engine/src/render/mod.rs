//! Rendering backends.
//!
//! [`RenderBackend`] is the seam between the canvas/paints and whatever turns
//! prepared shapes into pixels. Each backend owns its target and decides
//! whether a frame is rasterized inline or on another thread.
//!
//! Provided backends:
//! - [`sw::SwRenderer`]: CPU rasterizer into an RGBA8 framebuffer

mod backend;
pub mod sw;

pub use backend::{BackendRef, RenderBackend, RenderData};
