//! CPU software canvas.
//!
//! [`Framebuffer`] stores straight-alpha RGBA8 pixels and blends source-over
//! with a one-pixel anti-aliased edge on every primitive. Its byte layout
//! matches `wgpu::TextureFormat::Rgba8UnormSrgb`, so the window presenter can
//! upload it as-is.

use std::path::Path;

use glam::{Vec2, Vec3, Vec4};

use crate::canvas::Canvas;
use crate::error::EngineError;

/// An in-memory RGBA8 image.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

fn pack(color: Vec4) -> [u8; 4] {
    let c = (color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8, c.w as u8]
}

fn unpack(px: [u8; 4]) -> Vec4 {
    Vec4::new(px[0] as f32, px[1] as f32, px[2] as f32, px[3] as f32) / 255.0
}

/// Distance from `p` to the segment `a..b`.
fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

impl Framebuffer {
    /// A fully transparent framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 4]; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        (x < self.width && y < self.height).then(|| self.pixels[(y * self.width + x) as usize])
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Row-major RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Write the image to disk. The format follows the file extension.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        image::save_buffer(
            path,
            self.as_bytes(),
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(())
    }

    fn blend(&mut self, x: u32, y: u32, color: Vec4, coverage: f32) {
        let src_a = color.w * coverage;
        if !(src_a > 0.0) {
            return;
        }
        let dst_px = &mut self.pixels[(y * self.width + x) as usize];
        let dst = unpack(*dst_px);
        let keep = dst.w * (1.0 - src_a);
        let out_a = src_a + keep;
        let rgb = if out_a > 0.0 {
            (color.truncate() * src_a + dst.truncate() * keep) / out_a
        } else {
            Vec3::ZERO
        };
        *dst_px = pack(rgb.extend(out_a));
    }

    /// Pixel rectangle covering `min..max`, clipped to the image.
    fn span(&self, min: Vec2, max: Vec2) -> Option<(u32, u32, u32, u32)> {
        if !(min.is_finite() && max.is_finite()) || self.width == 0 || self.height == 0 {
            return None;
        }
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().max(0.0) as u32).min(self.width - 1);
        let y1 = (max.y.ceil().max(0.0) as u32).min(self.height - 1);
        (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
    }

    /// Blend `color` into every pixel whose center gets positive coverage.
    fn paint<F: Fn(Vec2) -> f32>(&mut self, min: Vec2, max: Vec2, color: Vec4, coverage: F) {
        self.paint_rows(min, max, color, |_| Some((f32::NEG_INFINITY, f32::INFINITY)), coverage);
    }

    /// Like [`paint`](Self::paint), but each row only visits the horizontal
    /// extent `row_span` returns for its center line.
    fn paint_rows<S, F>(&mut self, min: Vec2, max: Vec2, color: Vec4, row_span: S, coverage: F)
    where
        S: Fn(f32) -> Option<(f32, f32)>,
        F: Fn(Vec2) -> f32,
    {
        let Some((x0, y0, x1, y1)) = self.span(min, max) else {
            return;
        };
        for y in y0..=y1 {
            let cy = y as f32 + 0.5;
            let Some((left, right)) = row_span(cy) else {
                continue;
            };
            let lo = (left - 0.5).floor().max(x0 as f32);
            let hi = (right - 0.5).ceil().min(x1 as f32);
            if !(lo <= hi) {
                continue;
            }
            for x in lo as u32..=hi as u32 {
                let c = coverage(Vec2::new(x as f32 + 0.5, cy)).clamp(0.0, 1.0);
                if c > 0.0 {
                    self.blend(x, y, color, c);
                }
            }
        }
    }
}

/// Horizontal extent of the points within `reach` of segment `a..b` on the
/// line `y`, or `None` when the row misses it.
fn segment_row_span(a: Vec2, b: Vec2, y: f32, reach: f32) -> Option<(f32, f32)> {
    let dy = b.y - a.y;
    let (t0, t1) = if dy.abs() <= f32::EPSILON {
        if (a.y - y).abs() > reach {
            return None;
        }
        (0.0, 1.0)
    } else {
        let enter = (y - reach - a.y) / dy;
        let leave = (y + reach - a.y) / dy;
        (enter.min(leave).max(0.0), enter.max(leave).min(1.0))
    };
    if t0 > t1 {
        return None;
    }
    let x0 = a.x + (b.x - a.x) * t0;
    let x1 = a.x + (b.x - a.x) * t1;
    Some((x0.min(x1) - reach, x0.max(x1) + reach))
}

fn inside_polygon(p: Vec2, points: &[Vec2]) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

impl Canvas for Framebuffer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width as usize * height as usize, [0; 4]);
    }

    fn clear(&mut self, color: Vec4) {
        self.pixels.fill(pack(color));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4) {
        if !(width > 0.0) {
            return;
        }
        let half = width * 0.5;
        let reach = half + 1.0;
        let pad = Vec2::splat(reach);
        self.paint_rows(
            from.min(to) - pad,
            from.max(to) + pad,
            color,
            |y| segment_row_span(from, to, y, reach),
            |p| half + 0.5 - segment_distance(p, from, to),
        );
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec4) {
        if !(radius > 0.0) {
            return;
        }
        let pad = Vec2::splat(radius + 1.0);
        self.paint(center - pad, center + pad, color, |p| radius + 0.5 - p.distance(center));
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Vec4) {
        if points.len() < 3 || points.iter().any(|p| !p.is_finite()) {
            return;
        }
        let (min, max) = points
            .iter()
            .fold((points[0], points[0]), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        self.paint(min - Vec2::ONE, max + Vec2::ONE, color, |p| {
            let mut edge = f32::INFINITY;
            let mut j = points.len() - 1;
            for i in 0..points.len() {
                edge = edge.min(segment_distance(p, points[j], points[i]));
                j = i;
            }
            if inside_polygon(p, points) {
                0.5 + edge
            } else {
                0.5 - edge
            }
        });
    }
}
