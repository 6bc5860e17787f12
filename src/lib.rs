//! Premultiplied ARGB sprite compositing
//!
//! A [`Sprite`] owns a pixel buffer and composites any rectangle of it onto
//! another buffer at any point, with source-over blending and clipping
//! against both buffers. Buffers may carry row padding.

pub mod config;
pub mod display;
pub mod geometry;
pub mod pixel;
pub mod sprite;
pub mod util;

pub use geometry::{Point, Rect, Size};
pub use sprite::Sprite;
