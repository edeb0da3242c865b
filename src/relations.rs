//! Connective lines between nearby particles and the pointer.
//!
//! Two particles are linked iff their distance is strictly below the link
//! distance. The line fades linearly: opacity is `1 - d / max`, so coincident
//! particles draw at full strength and a pair exactly `max` apart is not
//! linked at all.

use glam::Vec2;

use crate::config::EngineConfig;
use crate::particle::Particle;
use crate::pointer::PointerState;
use crate::spatial::SpatialGrid;

/// A line between particles `a` and `b` (`a < b`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    /// In `(0, 1]`.
    pub opacity: f32,
}

/// A line between a particle and the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEdge {
    pub index: usize,
    pub opacity: f32,
}

#[inline]
fn link_opacity(from: Vec2, to: Vec2, max_distance: f32) -> Option<f32> {
    let distance = from.distance(to);
    (distance < max_distance).then(|| 1.0 - distance / max_distance)
}

/// Test every unordered pair. Clears `out` first.
pub fn connect_pairs(particles: &[Particle], max_distance: f32, out: &mut Vec<Edge>) {
    out.clear();
    if !(max_distance > 0.0) {
        return;
    }
    for (a, pa) in particles.iter().enumerate() {
        for (b, pb) in particles.iter().enumerate().skip(a + 1) {
            if let Some(opacity) = link_opacity(pa.position, pb.position, max_distance) {
                out.push(Edge { a, b, opacity });
            }
        }
    }
}

/// Same edges as [`connect_pairs`], found through `grid`. Clears `out` first.
///
/// Edges come out in the same `(a, b)` order as the exhaustive scan.
pub fn connect_pairs_indexed(particles: &[Particle], max_distance: f32, grid: &mut SpatialGrid, out: &mut Vec<Edge>) {
    out.clear();
    if !(max_distance > 0.0) {
        return;
    }
    grid.rebuild(particles, max_distance);
    for (a, pa) in particles.iter().enumerate() {
        grid.for_each_candidate(a, |b| {
            if b > a {
                if let Some(opacity) = link_opacity(pa.position, particles[b].position, max_distance) {
                    out.push(Edge { a, b, opacity });
                }
            }
        });
    }
    out.sort_unstable_by_key(|e| (e.a, e.b));
}

/// Link every particle near the pointer. Clears `out` first.
pub fn connect_pointer(particles: &[Particle], pointer: &PointerState, max_distance: f32, out: &mut Vec<PointerEdge>) {
    out.clear();
    let Some(target) = pointer.position() else {
        return;
    };
    if !(max_distance > 0.0) {
        return;
    }
    for (index, p) in particles.iter().enumerate() {
        if let Some(opacity) = link_opacity(p.position, target, max_distance) {
            out.push(PointerEdge { index, opacity });
        }
    }
}

/// Per-frame edge buffers, reused across frames.
#[derive(Debug, Default)]
pub struct Relations {
    edges: Vec<Edge>,
    pointer_edges: Vec<PointerEdge>,
    grid: SpatialGrid,
}

impl Relations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute both edge sets for this frame.
    pub fn compute(&mut self, particles: &[Particle], pointer: &PointerState, config: &EngineConfig) {
        let max = config.max_line_distance;
        if !config.draw_links {
            self.clear();
            return;
        }
        if config.relation_index.uses_grid(particles.len()) {
            connect_pairs_indexed(particles, max, &mut self.grid, &mut self.edges);
        } else {
            connect_pairs(particles, max, &mut self.edges);
        }
        if config.pointer_interaction {
            connect_pointer(particles, pointer, max, &mut self.pointer_edges);
        } else {
            self.pointer_edges.clear();
        }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn pointer_edges(&self) -> &[PointerEdge] {
        &self.pointer_edges
    }

    pub fn clear(&mut self) {
        self.edges.clear();
        self.pointer_edges.clear();
    }
}
