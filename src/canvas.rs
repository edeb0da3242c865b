//! The drawing surface the renderer paints on.
//!
//! Coordinates are surface pixels with the origin at the top-left. Colors are
//! straight (non-premultiplied) RGBA in `[0, 1]`.

use glam::{Vec2, Vec4};

/// A 2D surface that can be cleared and painted with simple primitives.
pub trait Canvas {
    /// Current size in pixels.
    fn size(&self) -> (u32, u32);

    /// Reallocate for a new size. Contents are discarded.
    fn resize(&mut self, width: u32, height: u32);

    /// Overwrite every pixel with `color`.
    fn clear(&mut self, color: Vec4);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec4);

    /// Fill a closed polygon (even-odd rule).
    fn fill_polygon(&mut self, points: &[Vec2], color: Vec4);

    /// Make the finished frame visible. Surfaces with nothing to flush can
    /// keep the default.
    fn present(&mut self) {}
}
