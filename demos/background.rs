//! Animated background in a native window.
//!
//! Run with: cargo run --example background -- [preset]
//!
//! Presets: classic_web, moving_dots, particles, floating_shapes,
//! dynamic_background. Set `RUST_LOG=driftweb=debug` for lifecycle logs.

use driftweb::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), EngineError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let name = std::env::args().nth(1).unwrap_or_else(|| "classic_web".to_string());
    let Some(config) = EngineConfig::preset(&name) else {
        eprintln!("unknown preset '{name}', expected one of {:?}", EngineConfig::PRESETS);
        std::process::exit(2);
    };

    let config = config.with_background(Vec4::new(0.03, 0.05, 0.09, 1.0));
    driftweb::window::run(config, &format!("driftweb - {name}"))
}
