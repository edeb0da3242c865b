//! In-memory host for tests, benchmarks and offline rendering.
//!
//! [`HeadlessHost`] never schedules anything on its own; it only records what
//! the engine asked for. Drive it with [`Engine::advance`], which keeps
//! delivering the pending frame.

use crate::bounds::SurfaceBounds;
use crate::engine::{Engine, FrameHandle, Host, ListenerId, ListenerKind, SurfaceEvent};
use crate::error::EngineError;
use crate::raster::Framebuffer;

/// A fixed-size container backed by a [`Framebuffer`].
#[derive(Debug, Default)]
pub struct HeadlessHost {
    width: u32,
    height: u32,
    refuse_surface: bool,
    next_id: u64,
    requested: Vec<FrameHandle>,
    cancelled: Vec<FrameHandle>,
    listeners: Vec<(ListenerId, ListenerKind)>,
}

impl HeadlessHost {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Make `acquire_surface` fail.
    pub fn refusing_surface(mut self) -> Self {
        self.refuse_surface = true;
        self
    }

    /// Change what `measure` reports. Deliver a matching
    /// [`SurfaceEvent::Resized`] to tell the engine.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Every handle handed out, oldest first.
    pub fn requested_frames(&self) -> &[FrameHandle] {
        &self.requested
    }

    pub fn cancelled_frames(&self) -> &[FrameHandle] {
        &self.cancelled
    }

    /// Listeners registered and not yet removed.
    pub fn live_listeners(&self) -> &[(ListenerId, ListenerKind)] {
        &self.listeners
    }

    pub fn has_listener(&self, kind: ListenerKind) -> bool {
        self.listeners.iter().any(|(_, k)| *k == kind)
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Host for HeadlessHost {
    type Surface = Framebuffer;

    fn measure(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn acquire_surface(&mut self, bounds: SurfaceBounds) -> Result<Framebuffer, EngineError> {
        if self.refuse_surface {
            return Err(EngineError::SurfaceUnavailable("headless host refused a surface".into()));
        }
        Ok(Framebuffer::new(bounds.width(), bounds.height()))
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle::new(self.next_id());
        self.requested.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancelled.push(handle);
    }

    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        let id = ListenerId::new(self.next_id());
        self.listeners.push((id, kind));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|(live, _)| *live != id);
    }
}

impl Engine<HeadlessHost> {
    /// Deliver up to `frames` pending frames. Returns how many ran.
    pub fn advance(&mut self, frames: usize) -> usize {
        let mut ran = 0;
        for _ in 0..frames {
            let Some(handle) = self.pending_frame() else {
                break;
            };
            if !self.on_frame(handle) {
                break;
            }
            ran += 1;
        }
        ran
    }

    /// Resize the container and notify the engine, as a browser would.
    pub fn resize_container(&mut self, width: u32, height: u32) -> bool {
        self.host_mut().set_size(width, height);
        self.handle_event(SurfaceEvent::Resized { width, height })
    }
}
