//! Particles and the field that owns them.
//!
//! A [`ParticleField`] is the only owner of particle state. Only the update
//! rule mutates it, via [`ParticleField::step`]. It is reseeded whenever the
//! engine starts or, with [`ResizePolicy::Reseed`](crate::config::ResizePolicy),
//! when the surface is resized.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::bounds::SurfaceBounds;
use crate::config::{EngineConfig, ShapeStyle};
use crate::update::{StepContext, UpdateRule};

/// Outline a particle is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shape {
    #[default]
    Circle,
    Square,
    Triangle,
    Diamond,
    Hexagon,
    /// Wobbly organic outline.
    Blob,
}

impl ShapeStyle {
    /// Pick an outline for one particle.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Shape {
        const GEOMETRIC: [Shape; 5] = [
            Shape::Circle,
            Shape::Square,
            Shape::Triangle,
            Shape::Hexagon,
            Shape::Diamond,
        ];
        match self {
            ShapeStyle::Dots => Shape::Circle,
            ShapeStyle::Geometric => GEOMETRIC[rng.gen_range(0..GEOMETRIC.len())],
            ShapeStyle::Organic => Shape::Blob,
            ShapeStyle::Mixed => {
                if rng.gen_bool(0.5) {
                    Shape::Blob
                } else {
                    Shape::Hexagon
                }
            }
        }
    }
}

/// A single moving point or shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Displacement per frame.
    pub velocity: Vec2,
    /// Radius in pixels before `scale`.
    pub size: f32,
    /// Radians.
    pub rotation: f32,
    pub scale: f32,
    pub shape: Shape,
    /// Per-particle constant used to vary organic outlines.
    pub phase: f32,
}

impl Particle {
    /// A unit-sized circle at rest.
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            size: 1.0,
            rotation: 0.0,
            scale: 1.0,
            shape: Shape::Circle,
            phase: 0.0,
        }
    }

    /// Drawn radius in pixels.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.size * self.scale
    }
}

/// Scatter `count` particles uniformly over `bounds`.
///
/// Velocity components are uniform in `[-speed_scale, speed_scale]`. All
/// other attributes take [`Particle::new`] defaults.
pub fn initialize<R: Rng>(count: usize, bounds: SurfaceBounds, speed_scale: f32, rng: &mut R) -> Vec<Particle> {
    let extent = bounds.extent();
    let speed = speed_scale.abs();
    (0..count)
        .map(|_| {
            let position = Vec2::new(rng.gen_range(0.0..=extent.x), rng.gen_range(0.0..=extent.y));
            let velocity = Vec2::new(rng.gen_range(-speed..=speed), rng.gen_range(-speed..=speed));
            Particle::new(position, velocity)
        })
        .collect()
}

/// The fixed-size particle population of one engine.
pub struct ParticleField {
    particles: Vec<Particle>,
    rng: SmallRng,
}

impl ParticleField {
    /// Create an empty field. A `seed` makes every later reseed reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self {
            particles: Vec::new(),
            rng,
        }
    }

    /// Replace every particle with a freshly scattered one.
    pub fn seed(&mut self, config: &EngineConfig, bounds: SurfaceBounds) {
        let mut particles = initialize(config.particle_count, bounds, config.speed_scale, &mut self.rng);
        let jitter = config.size_jitter;
        for particle in &mut particles {
            particle.size = if jitter > 0.0 {
                config.base_size * self.rng.gen_range(1.0 - jitter..=1.0 + jitter)
            } else {
                config.base_size
            };
            particle.rotation = self.rng.gen_range(0.0..TAU);
            particle.scale = match config.dynamics.scale_response {
                Some(response) if response.max > response.min => self.rng.gen_range(response.min..=response.max),
                Some(response) => response.min,
                None => config.dynamics.breathing.map_or(1.0, |b| b.base),
            };
            particle.phase = self.rng.gen_range(0.0..TAU);
            particle.shape = config.shape_style.pick(&mut self.rng);
        }
        tracing::debug!(
            count = particles.len(),
            width = bounds.width(),
            height = bounds.height(),
            "seeded particle field"
        );
        self.particles = particles;
    }

    /// Keep existing particles but pull them inside `bounds`.
    pub fn clamp_into(&mut self, bounds: SurfaceBounds) {
        for particle in &mut self.particles {
            particle.position = bounds.clamp(particle.position);
        }
    }

    /// Advance every particle by one frame.
    pub fn step(&mut self, rule: &UpdateRule, ctx: &StepContext) {
        for (index, particle) in self.particles.iter_mut().enumerate() {
            rule.apply(particle, index, ctx, &mut self.rng);
        }
    }

    /// Drop all particles.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScaleResponse;

    fn bounds(w: u32, h: u32) -> SurfaceBounds {
        SurfaceBounds::new(w, h).unwrap()
    }

    #[test]
    fn test_initialize_count_and_bounds() {
        let mut rng = SmallRng::seed_from_u64(1);
        let b = bounds(320, 240);
        let particles = initialize(500, b, 2.0, &mut rng);

        assert_eq!(particles.len(), 500);
        for p in &particles {
            assert!(b.contains(p.position));
            assert!(p.velocity.x.abs() <= 2.0 && p.velocity.y.abs() <= 2.0);
        }
    }

    #[test]
    fn test_initialize_is_deterministic_for_a_seed() {
        let b = bounds(100, 100);
        let a = initialize(20, b, 1.0, &mut SmallRng::seed_from_u64(99));
        let c = initialize(20, b, 1.0, &mut SmallRng::seed_from_u64(99));
        assert_eq!(a, c);
    }

    #[test]
    fn test_seed_dresses_particles() {
        let config = EngineConfig::new()
            .with_particle_count(50)
            .with_base_size(10.0)
            .with_shape_style(ShapeStyle::Organic)
            .with_dynamics(|d| {
                d.scale_response = Some(ScaleResponse { min: 0.8, max: 1.2, rate: 0.01 })
            });
        let mut field = ParticleField::new(Some(3));
        field.seed(&config, bounds(400, 300));

        assert_eq!(field.len(), 50);
        for p in field.particles() {
            assert_eq!(p.shape, Shape::Blob);
            assert_eq!(p.size, 10.0);
            assert!((0.8..=1.2).contains(&p.scale));
            assert!((0.0..TAU).contains(&p.rotation));
        }
    }

    #[test]
    fn test_size_jitter_range() {
        let mut config = EngineConfig::new().with_particle_count(200).with_base_size(2.0);
        config.size_jitter = 0.5;
        let mut field = ParticleField::new(Some(11));
        field.seed(&config, bounds(100, 100));
        for p in field.particles() {
            assert!((1.0..=3.0).contains(&p.size), "size {}", p.size);
        }
    }

    #[test]
    fn test_shape_style_pick() {
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..50 {
            assert_eq!(ShapeStyle::Dots.pick(&mut rng), Shape::Circle);
            assert_eq!(ShapeStyle::Organic.pick(&mut rng), Shape::Blob);
            assert!(matches!(ShapeStyle::Mixed.pick(&mut rng), Shape::Blob | Shape::Hexagon));
            assert_ne!(ShapeStyle::Geometric.pick(&mut rng), Shape::Blob);
        }
    }

    #[test]
    fn test_clamp_into_smaller_bounds() {
        let config = EngineConfig::new().with_particle_count(100);
        let mut field = ParticleField::new(Some(8));
        field.seed(&config, bounds(800, 600));

        let small = bounds(50, 40);
        field.clamp_into(small);
        assert_eq!(field.len(), 100);
        assert!(field.particles().iter().all(|p| small.contains(p.position)));
    }
}
