//! Load an engine configuration from a JSON document and run it in a window.
//!
//! Run with: cargo run --example from_json -- path/to/config.json
//!
//! Without a path a built-in document is used. Unset fields take defaults:
//!
//! ```json
//! { "particle_count": 50, "boundary": "bounce", "color": "#38bdf8" }
//! ```

use driftweb::prelude::*;
use tracing_subscriber::EnvFilter;

const BUILTIN: &str = r##"{
    "particle_count": 45,
    "base_size": 2.5,
    "speed_scale": 0.6,
    "color": "hsla(160, 70%, 55%, 0.8)",
    "line_color": "rgba(94, 234, 212, 0.5)",
    "max_line_distance": 140,
    "pointer_policy": "attract",
    "boundary": "bounce",
    "background": "#0b1120",
    "dynamics": { "pointer_strength": 0.1, "damping": 0.97 }
}"##;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let text = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => BUILTIN.to_string(),
    };
    let config: EngineConfig = serde_json::from_str(&text)?;
    tracing::info!(particles = config.particle_count, "loaded configuration");

    driftweb::window::run(config, "driftweb - from json")?;
    Ok(())
}
