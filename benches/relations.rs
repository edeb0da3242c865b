//! Benchmarks for the per-frame CPU work: relation pass, update step and
//! software rendering.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use driftweb::bounds::SurfaceBounds;
use driftweb::particle::{initialize, ParticleField};
use driftweb::relations::{connect_pairs, connect_pairs_indexed, Relations};
use driftweb::render::Renderer;
use driftweb::spatial::SpatialGrid;
use driftweb::update::{StepContext, UpdateRule};
use driftweb::{EngineConfig, Framebuffer, PointerState};

fn bench_relations(c: &mut Criterion) {
    let mut group = c.benchmark_group("relations");
    let bounds = SurfaceBounds::new(1920, 1080).unwrap();

    for count in [64usize, 256, 1024, 4096] {
        let particles = initialize(count, bounds, 1.0, &mut SmallRng::seed_from_u64(7));
        let mut edges = Vec::new();
        let mut grid = SpatialGrid::new();

        group.bench_with_input(BenchmarkId::new("exhaustive", count), &particles, |b, particles| {
            b.iter(|| {
                connect_pairs(black_box(particles), 110.0, &mut edges);
                black_box(edges.len())
            })
        });

        group.bench_with_input(BenchmarkId::new("grid", count), &particles, |b, particles| {
            b.iter(|| {
                connect_pairs_indexed(black_box(particles), 110.0, &mut grid, &mut edges);
                black_box(edges.len())
            })
        });
    }

    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_step");
    let bounds = SurfaceBounds::new(1920, 1080).unwrap();

    for name in ["classic_web", "dynamic_background"] {
        let config = EngineConfig::preset(name).unwrap().with_particle_count(1000).with_seed(1);
        let rule = UpdateRule::from_config(&config);
        let mut field = ParticleField::new(config.seed);
        field.seed(&config, bounds);
        let mut pointer = PointerState::absent();
        pointer.move_to(glam::Vec2::new(960.0, 540.0));
        let ctx = StepContext {
            bounds,
            pointer,
            elapsed: 1.0,
        };

        group.bench_function(name, |b| b.iter(|| field.step(black_box(&rule), &ctx)));
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let bounds = SurfaceBounds::new(800, 600).unwrap();

    for name in ["classic_web", "floating_shapes"] {
        let config = EngineConfig::preset(name).unwrap().with_seed(1);
        let mut field = ParticleField::new(config.seed);
        field.seed(&config, bounds);
        let pointer = PointerState::absent();
        let mut relations = Relations::new();
        relations.compute(field.particles(), &pointer, &config);
        let mut frame = Framebuffer::new(800, 600);
        let mut renderer = Renderer::new();

        group.bench_function(name, |b| {
            b.iter(|| renderer.draw(&mut frame, field.particles(), &relations, &pointer, bounds, &config))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_relations, bench_update, bench_render);
criterion_main!(benches);
