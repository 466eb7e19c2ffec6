//! Vellum engine crate.
//!
//! Retained-mode 2D canvas: a [`Canvas`] holds shared [`paint`] nodes and
//! drives a pluggable [`RenderBackend`] through update, draw and sync. A CPU
//! backend lives in [`render::sw`].

pub mod canvas;
pub mod color;
pub mod coords;
pub mod logging;
pub mod paint;
pub mod render;

pub use canvas::{Canvas, CanvasError, CanvasResult, CanvasStatus, ResultCode};
pub use paint::{Paint, PaintRef};
pub use render::{BackendRef, RenderBackend};
