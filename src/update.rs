//! The per-frame update rule.
//!
//! Every particle is advanced independently, once per frame, in this order:
//!
//! 1. pointer interaction (repel, attract, or nothing) and scale response
//! 2. ambient drift, a small sinusoid phased by particle index
//! 3. velocity damping
//! 4. anti-stall floor, which nudges near-zero velocity components
//! 5. integration of position and rotation
//! 6. boundary policy (wrap or bounce)
//!
//! Steps are per frame, not per second: a velocity of `1.0` moves a particle
//! one pixel per displayed frame.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::bounds::{BoundaryPolicy, SurfaceBounds};
use crate::config::{Breathing, EngineConfig, PointerPolicy, ScaleResponse};
use crate::particle::Particle;
use crate::pointer::PointerState;

/// Distances below this are treated as coincident and skip the pointer force.
pub const MIN_DISTANCE: f32 = 1.0e-4;

/// Read-only inputs shared by every particle in one frame.
#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    pub bounds: SurfaceBounds,
    pub pointer: PointerState,
    /// Seconds since the engine started.
    pub elapsed: f32,
}

#[derive(Debug, Clone, Copy)]
struct PointerForce {
    policy: PointerPolicy,
    radius: f32,
    strength: f32,
    spin: f32,
}

/// Motion parameters resolved from an [`EngineConfig`].
#[derive(Debug, Clone)]
pub struct UpdateRule {
    pointer: Option<PointerForce>,
    scale_response: Option<ScaleResponse>,
    breathing: Option<Breathing>,
    drift_amplitude: f32,
    drift_frequency: f32,
    damping: f32,
    stall_threshold: f32,
    stall_nudge: f32,
    spin: f32,
    boundary: BoundaryPolicy,
    restitution: f32,
}

impl UpdateRule {
    pub fn from_config(config: &EngineConfig) -> Self {
        let d = &config.dynamics;
        Self {
            pointer: config.pointer_interaction.then_some(PointerForce {
                policy: config.pointer_policy,
                radius: d.interaction_radius,
                strength: d.pointer_strength,
                spin: d.pointer_spin,
            }),
            scale_response: d.scale_response,
            breathing: d.breathing,
            drift_amplitude: d.drift_amplitude,
            drift_frequency: d.drift_frequency,
            damping: d.damping,
            stall_threshold: d.stall_threshold,
            stall_nudge: d.stall_nudge,
            spin: d.spin,
            boundary: config.boundary,
            restitution: d.restitution,
        }
    }

    /// Advance one particle by one frame.
    pub fn apply<R: Rng>(&self, p: &mut Particle, index: usize, ctx: &StepContext, rng: &mut R) {
        let near_pointer = self.apply_pointer(p, ctx);
        if let Some(response) = self.scale_response {
            p.scale = if near_pointer {
                (p.scale + response.rate).min(response.max)
            } else {
                (p.scale - response.rate).max(response.min)
            };
        } else if let Some(breathing) = self.breathing.filter(|_| !near_pointer) {
            let t = ctx.elapsed * self.drift_frequency + index as f32;
            p.scale = breathing.base + breathing.amplitude * t.sin();
        }

        if self.drift_amplitude > 0.0 {
            let t = ctx.elapsed * self.drift_frequency;
            let i = index as f32;
            p.velocity += Vec2::new((t + i).sin(), (t + 0.5 * i).cos()) * self.drift_amplitude;
        }

        p.velocity *= self.damping;

        if !p.velocity.is_finite() {
            p.velocity = Vec2::ZERO;
        }
        if self.stall_nudge > 0.0 {
            if p.velocity.x.abs() < self.stall_threshold {
                p.velocity.x += rng.gen_range(-self.stall_nudge..=self.stall_nudge);
            }
            if p.velocity.y.abs() < self.stall_threshold {
                p.velocity.y += rng.gen_range(-self.stall_nudge..=self.stall_nudge);
            }
        }

        p.position += p.velocity;
        p.rotation = (p.rotation + self.spin).rem_euclid(TAU);

        self.boundary
            .apply(&mut p.position, &mut p.velocity, ctx.bounds, self.restitution);
    }

    /// Returns whether the pointer is within the interaction radius.
    fn apply_pointer(&self, p: &mut Particle, ctx: &StepContext) -> bool {
        let (Some(force), Some(target)) = (self.pointer, ctx.pointer.position()) else {
            return false;
        };
        let offset = target - p.position;
        let distance = offset.length();
        if !(distance < force.radius) {
            return false;
        }
        if distance > MIN_DISTANCE {
            let falloff = (force.radius - distance) / force.radius;
            let toward = offset / distance;
            match force.policy {
                PointerPolicy::Repel => p.velocity -= toward * falloff * force.strength,
                PointerPolicy::Attract => p.velocity += toward * falloff * force.strength,
                PointerPolicy::Visual => {}
            }
            p.rotation += offset.x / force.radius * falloff * force.spin;
        }
        true
    }
}
