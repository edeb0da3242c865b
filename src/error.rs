//! Error types for engine setup and configuration.
//!
//! Only environment problems surface as errors. Per-frame numeric trouble
//! (coincident points, non-finite velocities) is absorbed by the update rule
//! and the relation pass and never reaches the caller.

use thiserror::Error;

/// Errors that can occur while mounting or driving an engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The host could not hand out a drawing surface.
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// The container measured to a zero-sized area at start.
    #[error("container has no drawable area ({width}x{height})")]
    EmptySurface { width: u32, height: u32 },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// `start()` was called on an engine that has already been stopped.
    #[error("engine has been stopped and cannot be restarted")]
    AlreadyStopped,

    /// The native event loop failed.
    #[error(transparent)]
    EventLoop(#[from] winit::error::EventLoopError),

    /// The native window could not be created.
    #[error(transparent)]
    Window(#[from] winit::error::OsError),

    /// Writing a framebuffer snapshot failed.
    #[error("failed to save snapshot: {0}")]
    Snapshot(#[from] image::ImageError),
}

/// Errors produced when parsing a CSS-style color string.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    #[error("unrecognised color syntax: {0:?}")]
    Syntax(String),

    #[error("expected {expected} components in {input:?}, found {found}")]
    Arity {
        input: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid color component {0:?}")]
    Component(String),
}
