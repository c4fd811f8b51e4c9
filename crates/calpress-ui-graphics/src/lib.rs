//! Pure math/data for drawing in calpress
//!
//! Geometry primitives and colors shared by the gesture engine and the
//! visual feedback layer. Everything here is `Copy` and allocation free.

mod color;
mod geometry;

pub use color::*;
pub use geometry::*;

pub mod prelude {
    pub use crate::color::Color;
    pub use crate::geometry::{Point, Rect, Size};
}
