//! Engine configuration.
//!
//! An [`EngineConfig`] is supplied once when an engine is mounted and never
//! changes for that engine's lifetime. Build it with the `with_*` methods,
//! start from one of the presets, or deserialize it; every field has a
//! default so partial documents are fine.
//!
//! ```ignore
//! let config = EngineConfig::classic_web()
//!     .with_particle_count(40)
//!     .with_boundary(BoundaryPolicy::Bounce)
//!     .with_dynamics(|d| {
//!         d.damping = 0.97;
//!         d.restitution = 0.6;
//!     });
//! ```

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::bounds::BoundaryPolicy;
use crate::color::{parse_color, TRANSPARENT};
use crate::error::EngineError;

/// How the pointer pushes particles around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPolicy {
    /// Push particles away from the pointer.
    Repel,
    /// Pull particles toward the pointer.
    Attract,
    /// No positional force; the pointer only draws connective lines.
    #[default]
    Visual,
}

/// Which outlines particles are drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeStyle {
    /// Plain round dots.
    #[default]
    Dots,
    /// Circles, squares, triangles, diamonds and hexagons.
    Geometric,
    /// Soft wobbly blobs.
    Organic,
    /// Blobs and hexagons.
    Mixed,
}

/// What a resize does to particles that already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizePolicy {
    /// Throw the field away and scatter a fresh one over the new surface.
    #[default]
    Reseed,
    /// Keep particles and clamp their positions into the new surface.
    Clamp,
}

/// Strategy for the pairwise distance scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationIndex {
    /// Exhaustive scan for small fields, uniform grid above
    /// [`RelationIndex::AUTO_GRID_THRESHOLD`] particles.
    #[default]
    Auto,
    /// Always test every pair.
    Exhaustive,
    /// Always bucket particles into a uniform grid first.
    Grid,
}

impl RelationIndex {
    /// Particle count above which `Auto` switches to the grid.
    pub const AUTO_GRID_THRESHOLD: usize = 256;

    /// Whether the grid should be used for `count` particles.
    pub fn uses_grid(&self, count: usize) -> bool {
        match self {
            RelationIndex::Auto => count > Self::AUTO_GRID_THRESHOLD,
            RelationIndex::Exhaustive => false,
            RelationIndex::Grid => true,
        }
    }
}

/// Scale that swells while the pointer is near and relaxes otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleResponse {
    pub min: f32,
    pub max: f32,
    /// Scale change per frame.
    pub rate: f32,
}

/// Idle scale oscillation: `base + amplitude * sin(t * drift_frequency + i)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breathing {
    pub base: f32,
    pub amplitude: f32,
}

/// Motion and stroke tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dynamics {
    /// Pointer forces act within this many pixels.
    pub interaction_radius: f32,
    /// Peak velocity change per frame from the pointer, at zero distance.
    pub pointer_strength: f32,
    /// Per-frame velocity multiplier, in `(0, 1)`.
    pub damping: f32,
    /// Peak velocity added per frame by the ambient oscillation.
    pub drift_amplitude: f32,
    /// Angular frequency of the ambient oscillation (radians per second).
    pub drift_frequency: f32,
    /// Velocity components below this magnitude get nudged.
    pub stall_threshold: f32,
    /// Maximum size of an anti-stall nudge.
    pub stall_nudge: f32,
    /// Velocity kept after a bounce, in `(0, 1)`.
    pub restitution: f32,
    /// Rotation added per frame, in radians.
    pub spin: f32,
    /// Peak rotation kick per frame from the pointer, scaled by its
    /// horizontal offset and falloff.
    pub pointer_spin: f32,
    pub scale_response: Option<ScaleResponse>,
    /// Scale oscillation while the pointer is away. Ignored when a scale
    /// response is set.
    pub breathing: Option<Breathing>,
    pub line_width: f32,
    pub pointer_line_width: f32,
    /// Radius of the dot drawn under the pointer. Zero hides it.
    pub pointer_glyph_size: f32,
}

impl Default for Dynamics {
    fn default() -> Self {
        Self {
            interaction_radius: 120.0,
            pointer_strength: 0.6,
            damping: 0.98,
            drift_amplitude: 0.02,
            drift_frequency: 1.0,
            stall_threshold: 0.05,
            stall_nudge: 0.1,
            restitution: 0.8,
            spin: 0.0,
            pointer_spin: 0.0,
            scale_response: None,
            breathing: None,
            line_width: 1.0,
            pointer_line_width: 3.0,
            pointer_glyph_size: 2.2,
        }
    }
}

/// Everything an engine needs to know up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub particle_count: usize,
    /// Particle radius in pixels.
    pub base_size: f32,
    /// Relative size spread, in `[0, 1)`.
    pub size_jitter: f32,
    /// Initial velocity components are drawn from `[-speed_scale, speed_scale]`.
    pub speed_scale: f32,
    #[serde(with = "crate::color::css")]
    pub color: Vec4,
    #[serde(with = "crate::color::css")]
    pub line_color: Vec4,
    /// Pairs closer than this are joined by a line.
    pub max_line_distance: f32,
    pub draw_links: bool,
    pub pointer_interaction: bool,
    pub pointer_policy: PointerPolicy,
    pub boundary: BoundaryPolicy,
    pub shape_style: ShapeStyle,
    pub resize: ResizePolicy,
    pub relation_index: RelationIndex,
    #[serde(with = "crate::color::css")]
    pub background: Vec4,
    /// Fixed RNG seed. `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub dynamics: Dynamics,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            particle_count: 60,
            base_size: 2.2,
            size_jitter: 0.0,
            speed_scale: 1.0,
            color: Vec4::new(120.0 / 255.0, 180.0 / 255.0, 1.0, 0.7),
            line_color: Vec4::new(120.0 / 255.0, 180.0 / 255.0, 1.0, 0.18),
            max_line_distance: 110.0,
            draw_links: true,
            pointer_interaction: true,
            pointer_policy: PointerPolicy::Visual,
            boundary: BoundaryPolicy::Wrap,
            shape_style: ShapeStyle::Dots,
            resize: ResizePolicy::Reseed,
            relation_index: RelationIndex::Auto,
            background: TRANSPARENT,
            seed: None,
            dynamics: Dynamics::default(),
        }
    }
}

/// Soft blue used by the shape presets.
fn mist() -> Vec4 {
    parse_color("hsla(200, 70%, 60%, 0.15)").unwrap_or(Vec4::new(0.32, 0.69, 0.88, 0.15))
}

impl EngineConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names accepted by [`EngineConfig::preset`].
    pub const PRESETS: [&'static str; 5] = [
        "classic_web",
        "moving_dots",
        "particles",
        "floating_shapes",
        "dynamic_background",
    ];

    /// Look a preset up by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "classic_web" => Some(Self::classic_web()),
            "moving_dots" => Some(Self::moving_dots()),
            "particles" => Some(Self::particles()),
            "floating_shapes" => Some(Self::floating_shapes()),
            "dynamic_background" => Some(Self::dynamic_background()),
            _ => None,
        }
    }

    /// Fast dots joined into a web, with a dot and web lines under the cursor.
    pub fn classic_web() -> Self {
        Self {
            particle_count: 70,
            base_size: 2.2,
            speed_scale: 2.2,
            max_line_distance: 110.0,
            pointer_policy: PointerPolicy::Visual,
            boundary: BoundaryPolicy::Wrap,
            dynamics: Dynamics {
                damping: 0.999,
                drift_amplitude: 0.005,
                stall_threshold: 0.2,
                stall_nudge: 0.2,
                ..Dynamics::default()
            },
            ..Self::default()
        }
    }

    /// Unconnected dots that scatter away from the cursor.
    pub fn moving_dots() -> Self {
        Self {
            particle_count: 80,
            base_size: 2.5,
            speed_scale: 0.35,
            draw_links: false,
            pointer_policy: PointerPolicy::Repel,
            boundary: BoundaryPolicy::Wrap,
            dynamics: Dynamics {
                interaction_radius: 90.0,
                pointer_strength: 16.2,
                damping: 0.96,
                drift_amplitude: 0.005,
                pointer_glyph_size: 0.0,
                ..Dynamics::default()
            },
            ..Self::default()
        }
    }

    /// A sparse web of slow, varied dots drawn toward the cursor.
    pub fn particles() -> Self {
        let color = parse_color("hsla(200, 70%, 60%, 0.7)").unwrap_or(Vec4::new(0.32, 0.69, 0.88, 0.7));
        let line_color = parse_color("#38bdf8").unwrap_or(Vec4::new(0.22, 0.74, 0.97, 1.0));
        Self {
            particle_count: 30,
            base_size: 2.0,
            size_jitter: 0.5,
            speed_scale: 0.25,
            color,
            line_color,
            max_line_distance: 120.0,
            pointer_policy: PointerPolicy::Attract,
            boundary: BoundaryPolicy::Bounce,
            dynamics: Dynamics {
                interaction_radius: 100.0,
                pointer_strength: 0.08,
                damping: 0.96,
                restitution: 0.95,
                pointer_glyph_size: 0.0,
                ..Dynamics::default()
            },
            ..Self::default()
        }
    }

    /// A handful of large translucent geometric shapes floating about.
    pub fn floating_shapes() -> Self {
        Self {
            particle_count: 8,
            base_size: 50.0,
            size_jitter: 0.2,
            speed_scale: 0.5,
            color: mist(),
            draw_links: false,
            pointer_policy: PointerPolicy::Attract,
            boundary: BoundaryPolicy::Bounce,
            shape_style: ShapeStyle::Geometric,
            dynamics: Dynamics {
                interaction_radius: 300.0,
                pointer_strength: 0.15,
                damping: 0.95,
                drift_amplitude: 0.15,
                drift_frequency: 0.5,
                spin: 0.005,
                pointer_spin: 0.05,
                breathing: Some(Breathing {
                    base: 0.8,
                    amplitude: 0.1,
                }),
                pointer_glyph_size: 0.0,
                ..Dynamics::default()
            },
            ..Self::default()
        }
    }

    /// Drifting, spinning blobs that shy away from the cursor and swell near it.
    pub fn dynamic_background() -> Self {
        Self {
            particle_count: 6,
            base_size: 50.0,
            speed_scale: 0.3,
            color: mist(),
            draw_links: false,
            pointer_policy: PointerPolicy::Repel,
            boundary: BoundaryPolicy::Bounce,
            shape_style: ShapeStyle::Mixed,
            dynamics: Dynamics {
                interaction_radius: 200.0,
                pointer_strength: 0.6,
                damping: 0.98,
                restitution: 0.8,
                spin: 0.6f32.to_radians(),
                scale_response: Some(ScaleResponse {
                    min: 0.8,
                    max: 1.2,
                    rate: 0.01,
                }),
                pointer_glyph_size: 0.0,
                ..Dynamics::default()
            },
            ..Self::default()
        }
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the particle radius in pixels.
    pub fn with_base_size(mut self, size: f32) -> Self {
        self.base_size = size;
        self
    }

    /// Set the initial speed range.
    pub fn with_speed_scale(mut self, speed: f32) -> Self {
        self.speed_scale = speed;
        self
    }

    /// Set the particle fill color.
    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    /// Set the connective line color.
    pub fn with_line_color(mut self, color: Vec4) -> Self {
        self.line_color = color;
        self
    }

    /// Set the distance below which pairs are joined.
    pub fn with_max_line_distance(mut self, distance: f32) -> Self {
        self.max_line_distance = distance;
        self
    }

    /// Turn connective lines on or off.
    pub fn with_links(mut self, enabled: bool) -> Self {
        self.draw_links = enabled;
        self
    }

    /// Turn pointer interaction on or off.
    pub fn with_pointer_interaction(mut self, enabled: bool) -> Self {
        self.pointer_interaction = enabled;
        self
    }

    /// Choose how the pointer moves particles.
    pub fn with_pointer_policy(mut self, policy: PointerPolicy) -> Self {
        self.pointer_policy = policy;
        self
    }

    /// Choose wrap or bounce at the surface edge.
    pub fn with_boundary(mut self, policy: BoundaryPolicy) -> Self {
        self.boundary = policy;
        self
    }

    /// Choose particle outlines.
    pub fn with_shape_style(mut self, style: ShapeStyle) -> Self {
        self.shape_style = style;
        self
    }

    /// Choose what a resize does to existing particles.
    pub fn with_resize_policy(mut self, policy: ResizePolicy) -> Self {
        self.resize = policy;
        self
    }

    /// Choose the pairwise scan strategy.
    pub fn with_relation_index(mut self, index: RelationIndex) -> Self {
        self.relation_index = index;
        self
    }

    /// Set the color the surface is cleared to each frame.
    pub fn with_background(mut self, color: Vec4) -> Self {
        self.background = color;
        self
    }

    /// Fix the RNG seed for reproducible fields.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Adjust motion tuning in place.
    pub fn with_dynamics<F: FnOnce(&mut Dynamics)>(mut self, configure: F) -> Self {
        configure(&mut self.dynamics);
        self
    }

    /// Check every value is usable.
    pub fn validate(&self) -> Result<(), EngineError> {
        fn positive(name: &str, value: f32) -> Result<(), EngineError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(EngineError::InvalidConfig(format!("{name} must be positive, got {value}")))
            }
        }
        fn non_negative(name: &str, value: f32) -> Result<(), EngineError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(EngineError::InvalidConfig(format!("{name} must be non-negative, got {value}")))
            }
        }
        fn unit_open(name: &str, value: f32) -> Result<(), EngineError> {
            if value > 0.0 && value < 1.0 {
                Ok(())
            } else {
                Err(EngineError::InvalidConfig(format!("{name} must be in (0, 1), got {value}")))
            }
        }

        if self.particle_count == 0 {
            return Err(EngineError::InvalidConfig("particle_count must be at least 1".into()));
        }
        positive("base_size", self.base_size)?;
        if !(0.0..1.0).contains(&self.size_jitter) {
            return Err(EngineError::InvalidConfig(format!(
                "size_jitter must be in [0, 1), got {}",
                self.size_jitter
            )));
        }
        positive("speed_scale", self.speed_scale)?;
        positive("max_line_distance", self.max_line_distance)?;

        let d = &self.dynamics;
        positive("interaction_radius", d.interaction_radius)?;
        non_negative("pointer_strength", d.pointer_strength)?;
        unit_open("damping", d.damping)?;
        non_negative("drift_amplitude", d.drift_amplitude)?;
        non_negative("drift_frequency", d.drift_frequency)?;
        // A zero floor lets a damped field come to rest for good.
        positive("stall_threshold", d.stall_threshold)?;
        positive("stall_nudge", d.stall_nudge)?;
        unit_open("restitution", d.restitution)?;
        if !(d.spin.is_finite() && d.pointer_spin.is_finite()) {
            return Err(EngineError::InvalidConfig("spin and pointer_spin must be finite".into()));
        }
        positive("line_width", d.line_width)?;
        positive("pointer_line_width", d.pointer_line_width)?;
        non_negative("pointer_glyph_size", d.pointer_glyph_size)?;
        if let Some(scale) = d.scale_response {
            positive("scale_response.min", scale.min)?;
            non_negative("scale_response.rate", scale.rate)?;
            if !(scale.max.is_finite() && scale.max >= scale.min) {
                return Err(EngineError::InvalidConfig(format!(
                    "scale_response.max ({}) must be >= min ({})",
                    scale.max, scale.min
                )));
            }
        }
        if let Some(breathing) = d.breathing {
            non_negative("breathing.amplitude", breathing.amplitude)?;
            positive("breathing.base - amplitude", breathing.base - breathing.amplitude)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        EngineConfig::default().validate().unwrap();
        for name in EngineConfig::PRESETS {
            let config = EngineConfig::preset(name).unwrap();
            config.validate().unwrap_or_else(|e| panic!("{name}: {e}"));
        }
        assert!(EngineConfig::preset("nope").is_none());
    }

    #[test]
    fn test_builder_chain() {
        let config = EngineConfig::new()
            .with_particle_count(12)
            .with_boundary(BoundaryPolicy::Bounce)
            .with_shape_style(ShapeStyle::Organic)
            .with_seed(7)
            .with_dynamics(|d| d.damping = 0.5);

        assert_eq!(config.particle_count, 12);
        assert_eq!(config.boundary, BoundaryPolicy::Bounce);
        assert_eq!(config.shape_style, ShapeStyle::Organic);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.dynamics.damping, 0.5);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(EngineConfig::new().with_particle_count(0).validate().is_err());
        assert!(EngineConfig::new().with_speed_scale(-1.0).validate().is_err());
        assert!(EngineConfig::new().with_max_line_distance(f32::NAN).validate().is_err());
        assert!(EngineConfig::new().with_dynamics(|d| d.damping = 1.0).validate().is_err());
        assert!(EngineConfig::new().with_dynamics(|d| d.restitution = 0.0).validate().is_err());
        assert!(EngineConfig::new()
            .with_dynamics(|d| {
                d.scale_response = Some(ScaleResponse { min: 1.0, max: 0.5, rate: 0.1 })
            })
            .validate()
            .is_err());
        assert!(EngineConfig::new()
            .with_dynamics(|d| d.breathing = Some(Breathing { base: 0.1, amplitude: 0.2 }))
            .validate()
            .is_err());
    }

    #[test]
    fn test_anti_stall_floor_cannot_be_disabled() {
        let frozen = |configure: fn(&mut Dynamics)| {
            EngineConfig::new()
                .with_dynamics(|d| d.drift_amplitude = 0.0)
                .with_dynamics(configure)
                .validate()
        };
        assert!(matches!(frozen(|d| d.stall_nudge = 0.0), Err(EngineError::InvalidConfig(_))));
        assert!(matches!(frozen(|d| d.stall_threshold = 0.0), Err(EngineError::InvalidConfig(_))));
        assert!(frozen(|_| {}).is_ok());
    }

    #[test]
    fn test_relation_index_threshold() {
        assert!(!RelationIndex::Auto.uses_grid(RelationIndex::AUTO_GRID_THRESHOLD));
        assert!(RelationIndex::Auto.uses_grid(RelationIndex::AUTO_GRID_THRESHOLD + 1));
        assert!(RelationIndex::Grid.uses_grid(2));
        assert!(!RelationIndex::Exhaustive.uses_grid(10_000));
    }
}
