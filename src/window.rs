//! Native window host.
//!
//! [`run`] opens a winit window, mounts an engine into it and drives frames
//! through `request_redraw`. The surface is painted in software and uploaded
//! by a [`Presenter`] every frame.

use std::sync::Arc;

use glam::{Vec2, Vec4};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::bounds::SurfaceBounds;
use crate::canvas::Canvas;
use crate::config::EngineConfig;
use crate::engine::{mount, Engine, FrameHandle, Host, ListenerId, ListenerKind, SurfaceEvent};
use crate::error::EngineError;
use crate::gpu::Presenter;
use crate::raster::Framebuffer;

/// A framebuffer that presents itself to a window.
pub struct WindowSurface {
    frame: Framebuffer,
    presenter: Presenter,
}

impl WindowSurface {
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.frame
    }
}

impl Canvas for WindowSurface {
    fn size(&self) -> (u32, u32) {
        self.frame.size()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.frame.resize(width, height);
        self.presenter.resize(width, height);
    }

    fn clear(&mut self, color: Vec4) {
        self.frame.clear(color);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4) {
        self.frame.stroke_line(from, to, width, color);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec4) {
        self.frame.fill_circle(center, radius, color);
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Vec4) {
        self.frame.fill_polygon(points, color);
    }

    fn present(&mut self) {
        match self.presenter.present(&self.frame) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost, reconfiguring");
                self.presenter.reconfigure();
            }
            Err(e) => tracing::warn!(error = %e, "present failed, skipping frame"),
        }
    }
}

/// Host backed by a winit window.
pub struct WindowHost {
    window: Arc<Window>,
    next_id: u64,
    listeners: Vec<(ListenerId, ListenerKind)>,
}

impl WindowHost {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    /// Whether events of `kind` should be forwarded to the engine.
    pub fn listening(&self, kind: ListenerKind) -> bool {
        self.listeners.iter().any(|(_, k)| *k == kind)
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Host for WindowHost {
    type Surface = WindowSurface;

    fn measure(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn acquire_surface(&mut self, bounds: SurfaceBounds) -> Result<WindowSurface, EngineError> {
        let presenter = pollster::block_on(Presenter::new(self.window.clone()))?;
        Ok(WindowSurface {
            frame: Framebuffer::new(bounds.width(), bounds.height()),
            presenter,
        })
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.window.request_redraw();
        FrameHandle::new(self.next_id())
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        // A redraw request cannot be withdrawn; the engine drops the handle.
        tracing::trace!(handle = handle.id(), "frame cancelled");
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

struct App {
    config: EngineConfig,
    title: String,
    engine: Option<Engine<WindowHost>>,
    error: Option<EngineError>,
}

impl App {
    fn new(config: EngineConfig, title: &str) -> Self {
        Self {
            config,
            title: title.to_owned(),
            engine: None,
            error: None,
        }
    }

    fn launch(&self, event_loop: &ActiveEventLoop) -> Result<Engine<WindowHost>, EngineError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
        let window = Arc::new(event_loop.create_window(window_attrs)?);
        mount(WindowHost::new(window), self.config.clone())
    }

    fn forward(engine: &mut Engine<WindowHost>, event: SurfaceEvent) {
        if engine.host().listening(event.kind()) {
            engine.handle_event(event);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.engine.is_some() || self.error.is_some() {
            return;
        }
        match self.launch(event_loop) {
            Ok(engine) => self.engine = Some(engine),
            Err(e) => {
                tracing::error!(error = %e, "failed to start");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => {
                engine.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => Self::forward(
                engine,
                SurfaceEvent::Resized {
                    width: size.width,
                    height: size.height,
                },
            ),
            WindowEvent::CursorMoved { position, .. } => Self::forward(
                engine,
                SurfaceEvent::PointerMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                },
            ),
            WindowEvent::CursorLeft { .. } => Self::forward(engine, SurfaceEvent::PointerLeft),
            WindowEvent::RedrawRequested => {
                if let Some(handle) = engine.pending_frame() {
                    engine.on_frame(handle);
                }
                if !engine.is_running() {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }
}

/// Open a window titled `title` and animate `config` until it is closed.
pub fn run(config: EngineConfig, title: &str) -> Result<(), EngineError> {
    config.validate()?;
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, title);
    event_loop.run_app(&mut app)?;
    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
