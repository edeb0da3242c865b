//! Render every preset offline and save one PNG per preset.
//!
//! Run with: cargo run --example snapshot -- [output_dir]

use std::path::PathBuf;

use driftweb::prelude::*;
use tracing_subscriber::EnvFilter;

const FRAMES: usize = 180;

fn main() -> Result<(), EngineError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let out_dir = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(std::env::temp_dir);

    for name in EngineConfig::PRESETS {
        let Some(config) = EngineConfig::preset(name) else {
            continue;
        };
        let config = config
            .with_seed(2024)
            .with_background(Vec4::new(0.03, 0.05, 0.09, 1.0));

        let mut engine = mount(HeadlessHost::new(960, 540), config)?;
        engine.clock_mut().set_fixed_delta(Some(1.0 / 60.0));

        // sweep the pointer across the middle so pointer effects show up
        for frame in 0..FRAMES {
            let x = 960.0 * frame as f32 / FRAMES as f32;
            engine.handle_event(SurfaceEvent::PointerMoved { x, y: 270.0 });
            engine.advance(1);
        }

        let path = out_dir.join(format!("{name}.png"));
        if let Some(surface) = engine.surface() {
            surface.save_png(&path)?;
        }
        println!(
            "{name}: {} particles, {} links -> {}",
            engine.particles().len(),
            engine.relations().edges().len(),
            path.display()
        );
    }
    Ok(())
}
