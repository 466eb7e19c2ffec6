//! Geometry value types shared by paints and backends.
//!
//! Scene space:
//! - origin top-left
//! - +X right, +Y down
//!
//! Backends map scene space to device pixels 1:1; any scaling is expressed
//! through [`Transform`].

mod rect;
mod transform;
mod vec2;

pub use rect::Rect;
pub use transform::Transform;
pub use vec2::Vec2;
