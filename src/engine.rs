//! Engine lifecycle: mount, per-frame driving, input events and teardown.
//!
//! An [`Engine`] owns everything one animated surface needs: the particle
//! field, the drawing surface, the pointer state and the frame clock. The
//! embedding environment is abstracted as a [`Host`], which measures the
//! container, hands out the surface, schedules frames and tracks event
//! listeners.
//!
//! ```text
//! Uninitialized --start()--> Running --stop()--> Stopped
//! ```
//!
//! The host calls [`Engine::on_frame`] with the handle it returned from
//! [`Host::request_frame`] and forwards input through
//! [`Engine::handle_event`]. Only the most recently requested handle is
//! honoured, so a frame that was cancelled (or that slipped through after
//! `stop()`) never runs.

use glam::Vec2;

use crate::bounds::SurfaceBounds;
use crate::canvas::Canvas;
use crate::config::{EngineConfig, ResizePolicy};
use crate::error::EngineError;
use crate::particle::{Particle, ParticleField};
use crate::pointer::PointerState;
use crate::relations::Relations;
use crate::render::Renderer;
use crate::time::FrameClock;
use crate::update::{StepContext, UpdateRule};

/// Identifies one scheduled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Identifies one registered event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Events an engine can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Resize,
    PointerMove,
    PointerLeave,
}

/// Input delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    /// New container size in pixels.
    Resized { width: u32, height: u32 },
    /// Pointer position in surface-local pixels.
    PointerMoved { x: f32, y: f32 },
    PointerLeft,
}

impl SurfaceEvent {
    /// The listener kind that receives this event.
    pub fn kind(&self) -> ListenerKind {
        match self {
            SurfaceEvent::Resized { .. } => ListenerKind::Resize,
            SurfaceEvent::PointerMoved { .. } => ListenerKind::PointerMove,
            SurfaceEvent::PointerLeft => ListenerKind::PointerLeave,
        }
    }
}

/// The environment an engine is mounted into.
pub trait Host {
    /// The drawing surface this host hands out.
    type Surface: Canvas;

    /// Current container size in pixels.
    fn measure(&self) -> (u32, u32);

    /// Create the drawing surface for `bounds`.
    fn acquire_surface(&mut self, bounds: SurfaceBounds) -> Result<Self::Surface, EngineError>;

    /// Schedule a call to [`Engine::on_frame`] with the returned handle.
    fn request_frame(&mut self) -> FrameHandle;

    fn cancel_frame(&mut self, handle: FrameHandle);

    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId;

    fn remove_listener(&mut self, id: ListenerId);
}

/// Lifecycle state. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Running,
    Stopped,
}

/// Summary of one completed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub frame: u64,
    /// Seconds since start.
    pub elapsed: f32,
    pub delta: f32,
    pub fps: f32,
    pub edges: usize,
    pub pointer_edges: usize,
}

/// Returned by a frame hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameControl {
    #[default]
    Continue,
    /// Stop the engine once this frame finishes.
    Stop,
}

type FrameHook = Box<dyn FnMut(&FrameStats) -> FrameControl>;

/// One animated particle surface.
pub struct Engine<H: Host> {
    /// Only `None` after `unmount` has taken it.
    host: Option<H>,
    config: EngineConfig,
    rule: UpdateRule,
    state: EngineState,
    bounds: Option<SurfaceBounds>,
    surface: Option<H::Surface>,
    field: ParticleField,
    relations: Relations,
    renderer: Renderer,
    pointer: PointerState,
    clock: FrameClock,
    pending: Option<FrameHandle>,
    listeners: Vec<(ListenerId, ListenerKind)>,
    frame_hook: Option<FrameHook>,
}

/// Create an engine and start it.
pub fn mount<H: Host>(host: H, config: EngineConfig) -> Result<Engine<H>, EngineError> {
    let mut engine = Engine::new(host, config)?;
    engine.start()?;
    Ok(engine)
}

impl<H: Host> Engine<H> {
    /// Validate `config` and wrap `host`. Nothing is drawn until [`start`](Self::start).
    pub fn new(host: H, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            host: Some(host),
            rule: UpdateRule::from_config(&config),
            field: ParticleField::new(config.seed),
            config,
            state: EngineState::Uninitialized,
            bounds: None,
            surface: None,
            relations: Relations::new(),
            renderer: Renderer::new(),
            pointer: PointerState::absent(),
            clock: FrameClock::new(),
            pending: None,
            listeners: Vec::new(),
            frame_hook: None,
        })
    }

    /// Acquire the surface, seed particles, subscribe to input and request
    /// the first frame.
    pub fn start(&mut self) -> Result<(), EngineError> {
        match self.state {
            EngineState::Running => return Ok(()),
            EngineState::Stopped => return Err(EngineError::AlreadyStopped),
            EngineState::Uninitialized => {}
        }
        let Some(host) = self.host.as_mut() else {
            return Err(EngineError::AlreadyStopped);
        };

        let (width, height) = host.measure();
        let bounds = SurfaceBounds::new(width, height).ok_or(EngineError::EmptySurface { width, height })?;
        let surface = host.acquire_surface(bounds)?;

        let mut kinds = vec![ListenerKind::Resize];
        if self.config.pointer_interaction {
            kinds.extend([ListenerKind::PointerMove, ListenerKind::PointerLeave]);
        }
        self.listeners = kinds.into_iter().map(|kind| (host.add_listener(kind), kind)).collect();

        self.field.seed(&self.config, bounds);
        self.bounds = Some(bounds);
        self.surface = Some(surface);
        self.pointer = PointerState::absent();
        self.clock.reset();
        self.state = EngineState::Running;
        self.pending = Some(host.request_frame());

        tracing::info!(
            width,
            height,
            particles = self.field.len(),
            listeners = self.listeners.len(),
            "engine started"
        );
        Ok(())
    }

    /// Run one frame if `handle` is the pending one. Returns whether it ran.
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        if self.state != EngineState::Running || self.pending != Some(handle) {
            tracing::trace!(handle = handle.id(), state = ?self.state, "ignoring stale frame");
            return false;
        }
        self.pending = None;
        let Some(bounds) = self.bounds else {
            return false;
        };

        let (elapsed, delta) = self.clock.tick();
        let ctx = StepContext {
            bounds,
            pointer: self.pointer,
            elapsed,
        };
        self.field.step(&self.rule, &ctx);
        self.relations.compute(self.field.particles(), &self.pointer, &self.config);

        if let Some(surface) = self.surface.as_mut() {
            self.renderer.draw(
                surface,
                self.field.particles(),
                &self.relations,
                &self.pointer,
                bounds,
                &self.config,
            );
            surface.present();
        }

        let stats = FrameStats {
            frame: self.clock.frame(),
            elapsed,
            delta,
            fps: self.clock.fps(),
            edges: self.relations.edges().len(),
            pointer_edges: self.relations.pointer_edges().len(),
        };
        tracing::trace!(
            frame = stats.frame,
            edges = stats.edges,
            pointer_edges = stats.pointer_edges,
            "frame"
        );

        let control = self.frame_hook.as_mut().map(|hook| hook(&stats));
        if control == Some(FrameControl::Stop) {
            self.stop();
        }
        if self.state == EngineState::Running {
            if let Some(host) = self.host.as_mut() {
                self.pending = Some(host.request_frame());
            }
        }
        true
    }

    /// Apply one input event. Returns whether it was accepted.
    pub fn handle_event(&mut self, event: SurfaceEvent) -> bool {
        let kind = event.kind();
        if self.state != EngineState::Running || !self.listeners.iter().any(|(_, k)| *k == kind) {
            tracing::debug!(?event, state = ?self.state, "ignoring event without listener");
            return false;
        }

        match event {
            SurfaceEvent::Resized { width, height } => {
                let Some(bounds) = SurfaceBounds::new(width, height) else {
                    tracing::debug!(width, height, "ignoring resize to empty surface");
                    return false;
                };
                self.bounds = Some(bounds);
                if let Some(surface) = self.surface.as_mut() {
                    surface.resize(width, height);
                }
                match self.config.resize {
                    ResizePolicy::Reseed => self.field.seed(&self.config, bounds),
                    ResizePolicy::Clamp => self.field.clamp_into(bounds),
                }
                tracing::debug!(width, height, policy = ?self.config.resize, "resized");
            }
            SurfaceEvent::PointerMoved { x, y } => self.pointer.move_to(Vec2::new(x, y)),
            SurfaceEvent::PointerLeft => self.pointer.leave(),
        }
        true
    }

    /// Cancel the pending frame, unsubscribe and release the surface.
    ///
    /// Safe to call any number of times, including from a frame hook. Does
    /// nothing before `start()`.
    pub fn stop(&mut self) {
        if self.state != EngineState::Running {
            return;
        }
        let mut cancelled = false;
        let removed = self.listeners.len();
        if let Some(host) = self.host.as_mut() {
            if let Some(handle) = self.pending.take() {
                host.cancel_frame(handle);
                cancelled = true;
            }
            for (id, _) in self.listeners.drain(..) {
                host.remove_listener(id);
            }
        }
        self.pending = None;
        self.listeners.clear();
        self.surface = None;
        self.bounds = None;
        self.field.clear();
        self.relations.clear();
        self.pointer.leave();
        self.state = EngineState::Stopped;

        tracing::info!(frames = self.clock.frame(), cancelled, listeners = removed, "engine stopped");
    }

    /// Stop and hand the host back.
    pub fn unmount(mut self) -> H {
        self.stop();
        self.host.take().expect("host is present until unmount")
    }

    /// Call `hook` after every frame.
    pub fn set_frame_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&FrameStats) -> FrameControl + 'static,
    {
        self.frame_hook = Some(Box::new(hook));
    }

    pub fn clear_frame_hook(&mut self) {
        self.frame_hook = None;
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Surface bounds while running.
    pub fn bounds(&self) -> Option<SurfaceBounds> {
        self.bounds
    }

    pub fn particles(&self) -> &[Particle] {
        self.field.particles()
    }

    /// Edges from the most recent frame.
    pub fn relations(&self) -> &Relations {
        &self.relations
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut FrameClock {
        &mut self.clock
    }

    /// The drawing surface while running.
    pub fn surface(&self) -> Option<&H::Surface> {
        self.surface.as_ref()
    }

    /// The frame the host should deliver next.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn host(&self) -> &H {
        self.host.as_ref().expect("host is present until unmount")
    }

    pub fn host_mut(&mut self) -> &mut H {
        self.host.as_mut().expect("host is present until unmount")
    }
}

impl<H: Host> Drop for Engine<H> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessHost;
    use std::cell::Cell;
    use std::rc::Rc;

    fn config() -> EngineConfig {
        EngineConfig::new().with_particle_count(25).with_seed(4)
    }

    #[test]
    fn test_new_does_not_touch_host() {
        let engine = Engine::new(HeadlessHost::new(200, 100), config()).unwrap();
        assert_eq!(engine.state(), EngineState::Uninitialized);
        assert!(engine.host().requested_frames().is_empty());
        assert!(engine.host().live_listeners().is_empty());
        assert!(engine.particles().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Engine::new(HeadlessHost::new(10, 10), config().with_speed_scale(0.0));
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_start_registers_listeners_and_requests_frame() {
        let engine = mount(HeadlessHost::new(200, 100), config()).unwrap();
        let host = engine.host();

        assert_eq!(engine.state(), EngineState::Running);
        assert_eq!(engine.particles().len(), 25);
        assert_eq!(host.requested_frames().len(), 1);
        assert_eq!(engine.pending_frame(), host.requested_frames().last().copied());
        assert!(host.has_listener(ListenerKind::Resize));
        assert!(host.has_listener(ListenerKind::PointerMove));
        assert!(host.has_listener(ListenerKind::PointerLeave));
    }

    #[test]
    fn test_no_pointer_listeners_without_interaction() {
        let engine = mount(HeadlessHost::new(200, 100), config().with_pointer_interaction(false)).unwrap();
        assert_eq!(engine.host().live_listeners().len(), 1);
        assert!(engine.host().has_listener(ListenerKind::Resize));
    }

    #[test]
    fn test_start_twice_is_noop() {
        let mut engine = mount(HeadlessHost::new(200, 100), config()).unwrap();
        engine.start().unwrap();
        assert_eq!(engine.host().requested_frames().len(), 1);
        assert_eq!(engine.host().live_listeners().len(), 3);
    }

    #[test]
    fn test_empty_container_fails() {
        let result = mount(HeadlessHost::new(0, 300), config());
        assert!(matches!(
            result,
            Err(EngineError::EmptySurface { width: 0, height: 300 })
        ));
    }

    #[test]
    fn test_surface_refusal_fails() {
        let mut engine = Engine::new(HeadlessHost::new(100, 100).refusing_surface(), config()).unwrap();
        assert!(matches!(engine.start(), Err(EngineError::SurfaceUnavailable(_))));
        assert_eq!(engine.state(), EngineState::Uninitialized);
        assert!(engine.host().live_listeners().is_empty());
        assert!(engine.host().requested_frames().is_empty());
    }

    #[test]
    fn test_stale_frame_ignored() {
        let mut engine = mount(HeadlessHost::new(100, 100), config()).unwrap();
        let first = engine.pending_frame().unwrap();
        assert!(engine.on_frame(first));
        assert!(!engine.on_frame(first));
        assert_eq!(engine.clock().frame(), 1);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut engine = mount(HeadlessHost::new(100, 100), config()).unwrap();
        let pending = engine.pending_frame().unwrap();

        engine.stop();
        engine.stop();

        assert_eq!(engine.state(), EngineState::Stopped);
        assert_eq!(engine.pending_frame(), None);
        assert_eq!(engine.host().cancelled_frames(), &[pending]);
        assert!(engine.host().live_listeners().is_empty());
        assert!(engine.surface().is_none());
        assert!(engine.particles().is_empty());
        assert!(!engine.on_frame(pending));
        assert!(matches!(engine.start(), Err(EngineError::AlreadyStopped)));
    }

    #[test]
    fn test_stop_before_start_is_noop() {
        let mut engine = Engine::new(HeadlessHost::new(100, 100), config()).unwrap();
        engine.stop();
        assert_eq!(engine.state(), EngineState::Uninitialized);
        engine.start().unwrap();
        assert!(engine.is_running());
    }

    #[test]
    fn test_hook_can_stop_from_inside_a_frame() {
        let mut engine = mount(HeadlessHost::new(100, 100), config()).unwrap();
        let seen = Rc::new(Cell::new(0u64));
        let counter = Rc::clone(&seen);
        engine.set_frame_hook(move |stats| {
            counter.set(stats.frame);
            if stats.frame == 3 {
                FrameControl::Stop
            } else {
                FrameControl::Continue
            }
        });

        while let Some(handle) = engine.pending_frame() {
            engine.on_frame(handle);
        }

        assert_eq!(seen.get(), 3);
        assert_eq!(engine.state(), EngineState::Stopped);
        assert_eq!(engine.host().requested_frames().len(), 3);
        // the frame that stopped had already been consumed
        assert!(engine.host().cancelled_frames().is_empty());
        assert!(engine.host().live_listeners().is_empty());
    }

    #[test]
    fn test_events_need_running_engine_and_listener() {
        let mut engine = Engine::new(HeadlessHost::new(100, 100), config()).unwrap();
        assert!(!engine.handle_event(SurfaceEvent::PointerMoved { x: 1.0, y: 1.0 }));

        engine.start().unwrap();
        assert!(engine.handle_event(SurfaceEvent::PointerMoved { x: 10.0, y: 20.0 }));
        assert_eq!(engine.pointer().position(), Some(Vec2::new(10.0, 20.0)));
        assert!(engine.handle_event(SurfaceEvent::PointerLeft));
        assert_eq!(engine.pointer().position(), None);

        let mut quiet = mount(HeadlessHost::new(100, 100), config().with_pointer_interaction(false)).unwrap();
        assert!(!quiet.handle_event(SurfaceEvent::PointerMoved { x: 10.0, y: 20.0 }));
        assert_eq!(quiet.pointer().position(), None);
    }

    #[test]
    fn test_zero_resize_ignored() {
        let mut engine = mount(HeadlessHost::new(100, 80), config()).unwrap();
        assert!(!engine.handle_event(SurfaceEvent::Resized { width: 0, height: 50 }));
        assert_eq!(engine.bounds(), SurfaceBounds::new(100, 80));
        assert_eq!(engine.surface().map(|s| s.size()), Some((100, 80)));
    }

    #[test]
    fn test_unmount_returns_clean_host() {
        let engine = mount(HeadlessHost::new(100, 100), config()).unwrap();
        let host = engine.unmount();
        assert!(host.live_listeners().is_empty());
        assert_eq!(host.cancelled_frames().len(), 1);
    }
}
