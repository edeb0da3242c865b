//! Paints one frame onto a [`Canvas`].

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, SQRT_2, TAU};

use glam::Vec2;

use crate::bounds::SurfaceBounds;
use crate::canvas::Canvas;
use crate::color::fade;
use crate::config::EngineConfig;
use crate::particle::{Particle, Shape};
use crate::pointer::PointerState;
use crate::relations::Relations;

/// Vertices in a blob outline.
pub const BLOB_VERTICES: usize = 24;

/// Push the outline of `shape` into `out` (cleared first).
///
/// Circles are drawn natively by the canvas and produce no vertices.
pub fn outline(shape: Shape, center: Vec2, radius: f32, rotation: f32, phase: f32, out: &mut Vec<Vec2>) {
    out.clear();
    let ring = |count: usize, start: f32, r: f32| {
        (0..count).map(move |k| {
            let angle = start + rotation + k as f32 * TAU / count as f32;
            center + Vec2::from_angle(angle) * r
        })
    };
    match shape {
        Shape::Circle => {}
        Shape::Square => out.extend(ring(4, FRAC_PI_4, radius * SQRT_2)),
        // y grows downward, so -π/2 puts the apex on top
        Shape::Triangle => out.extend(ring(3, -FRAC_PI_2, radius)),
        Shape::Diamond => out.extend(ring(4, 0.0, radius)),
        Shape::Hexagon => out.extend(ring(6, -FRAC_PI_2, radius)),
        Shape::Blob => out.extend((0..BLOB_VERTICES).map(|k| {
            let theta = k as f32 * TAU / BLOB_VERTICES as f32;
            let wobble = 1.0 + 0.18 * (2.0 * theta + phase).sin() + 0.07 * (3.0 * theta - phase).sin();
            center + Vec2::from_angle(theta + rotation) * radius * wobble
        })),
    }
}

/// Draws particles, their links and the pointer glyph.
#[derive(Debug, Default)]
pub struct Renderer {
    scratch: Vec<Vec2>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear `canvas` and paint the whole frame.
    pub fn draw<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        particles: &[Particle],
        relations: &Relations,
        pointer: &PointerState,
        bounds: SurfaceBounds,
        config: &EngineConfig,
    ) {
        let d = &config.dynamics;
        canvas.clear(config.background);

        for edge in relations.edges() {
            let (a, b) = (&particles[edge.a], &particles[edge.b]);
            canvas.stroke_line(a.position, b.position, d.line_width, fade(config.line_color, edge.opacity));
        }
        if let Some(target) = pointer.position() {
            for edge in relations.pointer_edges() {
                let from = particles[edge.index].position;
                canvas.stroke_line(from, target, d.pointer_line_width, fade(config.line_color, edge.opacity));
            }
        }

        for p in particles {
            match p.shape {
                Shape::Circle => canvas.fill_circle(p.position, p.radius(), config.color),
                shape => {
                    outline(shape, p.position, p.radius(), p.rotation, p.phase, &mut self.scratch);
                    canvas.fill_polygon(&self.scratch, config.color);
                }
            }
        }

        if config.pointer_interaction && d.pointer_glyph_size > 0.0 {
            if let Some(target) = pointer.position().filter(|t| bounds.contains(*t)) {
                canvas.fill_circle(target, d.pointer_glyph_size, config.color);
            }
        }
    }
}
