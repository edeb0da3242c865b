//! # driftweb
//!
//! Decorative particle-field backgrounds: a few dozen points or shapes drift
//! across a surface, join into a web when they come close, and react to the
//! pointer.
//!
//! ## Quick Start
//!
//! ```ignore
//! use driftweb::prelude::*;
//!
//! fn main() -> Result<(), EngineError> {
//!     let config = EngineConfig::classic_web()
//!         .with_particle_count(90)
//!         .with_pointer_policy(PointerPolicy::Repel);
//!     driftweb::window::run(config, "driftweb")
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Engine
//!
//! An [`Engine`] is mounted into a [`Host`] (a native window, or the in-memory
//! [`HeadlessHost`]). Every frame it runs, in order:
//!
//! 1. the update rule over every particle (pointer force, drift, damping,
//!    anti-stall, integration, wrap or bounce)
//! 2. the relation pass, which finds particle pairs closer than
//!    `max_line_distance`
//! 3. the renderer, which clears and repaints the [`Canvas`]
//!
//! ### Presets
//!
//! | Preset | Look |
//! |--------|------|
//! | [`EngineConfig::classic_web`] | fast dots in a web, web lines to the cursor |
//! | [`EngineConfig::moving_dots`] | unconnected dots that scatter from the cursor |
//! | [`EngineConfig::particles`] | sparse, slow web drawn toward the cursor |
//! | [`EngineConfig::floating_shapes`] | large translucent geometric shapes |
//! | [`EngineConfig::dynamic_background`] | spinning blobs that swell near the cursor |
//!
//! ### Offline rendering
//!
//! ```ignore
//! let mut engine = mount(HeadlessHost::new(640, 360), EngineConfig::particles().with_seed(1))?;
//! engine.advance(120);
//! if let Some(frame) = engine.surface() {
//!     frame.save_png("particles.png")?;
//! }
//! ```

pub mod bounds;
pub mod canvas;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod headless;
pub mod particle;
pub mod pointer;
pub mod raster;
pub mod relations;
pub mod render;
pub mod spatial;
pub mod time;
pub mod update;
pub mod window;

pub use bounds::{BoundaryPolicy, SurfaceBounds};
pub use canvas::Canvas;
pub use config::{Breathing, Dynamics, EngineConfig, PointerPolicy, RelationIndex, ResizePolicy, ScaleResponse, ShapeStyle};
pub use engine::{
    mount, Engine, EngineState, FrameControl, FrameHandle, FrameStats, Host, ListenerId, ListenerKind, SurfaceEvent,
};
pub use error::{ColorError, EngineError};
pub use glam::{Vec2, Vec4};
pub use headless::HeadlessHost;
pub use particle::{Particle, ParticleField, Shape};
pub use pointer::PointerState;
pub use raster::Framebuffer;
pub use relations::{Edge, PointerEdge, Relations};
pub use time::FrameClock;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use driftweb::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bounds::{BoundaryPolicy, SurfaceBounds};
    pub use crate::canvas::Canvas;
    pub use crate::color::parse_color;
    pub use crate::config::{Dynamics, EngineConfig, PointerPolicy, RelationIndex, ResizePolicy, ShapeStyle};
    pub use crate::engine::{mount, Engine, FrameControl, FrameStats, Host, SurfaceEvent};
    pub use crate::error::EngineError;
    pub use crate::headless::HeadlessHost;
    pub use crate::raster::Framebuffer;
    pub use crate::{Vec2, Vec4};
}
