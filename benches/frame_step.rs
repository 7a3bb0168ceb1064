//! Benchmarks for the CPU side of a frame.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Vec2, Vec3};
use shatter::gpu::FrameInstances;
use shatter::prelude::*;
use shatter::snowfall::Snowfall;
use shatter::spatial;
use shatter::terrain::{Terrain, TerrainConfig};

fn castle_scene(seed: u64, snow: usize) -> Scene {
    let mut ctx = SpawnContext::from_seed(seed);
    let parts = grand_castle(&mut ctx, &CastleStyle::default());
    let scene = Scene::new(PartRegistry::new(parts), Camera::new());
    if snow == 0 {
        return scene;
    }
    scene.with_snowfall(Snowfall::new(
        SnowConfig::default().with_count(snow),
        SpawnContext::from_seed(seed + 1),
    ))
}

/// Scene with `exploded` castle parts already blown apart.
fn exploded_scene(exploded: usize) -> Scene {
    let mut scene = castle_scene(1, 0);
    let mut controller = ExplosionController::new(ExplosionConfig::default(), SpawnContext::from_seed(2));
    for index in 0..exploded.min(scene.registry.len()) {
        controller.explode(&mut scene.registry, PartId(index));
    }
    scene
}

fn bench_hover_query(c: &mut Criterion) {
    let scene = castle_scene(1, 0);
    let ray = scene.camera.ray_from_ndc(Vec2::new(0.0, 0.1)).unwrap();

    c.bench_function("query_hover_castle", |b| {
        b.iter(|| black_box(spatial::query_hover_ray(&ray, scene.registry.parts())))
    });

    c.bench_function("pointer_to_hover_castle", |b| {
        b.iter(|| {
            black_box(spatial::query_hover(
                black_box(Vec2::new(0.2, -0.1)),
                &scene.camera,
                scene.registry.parts(),
            ))
        })
    });
}

fn bench_frame_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_step");

    for exploded in [0, 10, 50, 131] {
        group.bench_with_input(BenchmarkId::new("exploded_parts", exploded), &exploded, |b, &n| {
            let mut scene = exploded_scene(n);
            let mut scheduler =
                FrameScheduler::new(ExplosionConfig::default(), SpawnContext::from_seed(3));
            // Pointer off the castle so the debris keeps floating
            let pointer = Some(Vec2::new(0.95, 0.95));
            b.iter(|| black_box(scheduler.step(&mut scene, pointer, 1.0 / 60.0)))
        });
    }

    group.bench_function("snowfall_5000", |b| {
        let mut scene = castle_scene(4, 5000);
        let mut scheduler = FrameScheduler::new(ExplosionConfig::default(), SpawnContext::from_seed(5));
        b.iter(|| black_box(scheduler.step(&mut scene, None, 1.0 / 60.0)))
    });

    group.finish();
}

fn bench_instance_collect(c: &mut Criterion) {
    let mut scene = exploded_scene(20);
    scene.snowfall = Some(Snowfall::new(SnowConfig::default(), SpawnContext::from_seed(6)));
    scene.terrain = Some(Terrain::generate(&TerrainConfig::default(), &mut SpawnContext::from_seed(7)));

    c.bench_function("collect_instances", |b| {
        b.iter(|| black_box(FrameInstances::collect(&scene)))
    });
}

fn bench_explode(c: &mut Criterion) {
    let desc = PartDesc::new("keep", Vec3::new(0.0, 20.0, 0.0), Vec3::splat(8.0), Appearance::default());
    let mut controller = ExplosionController::new(ExplosionConfig::default(), SpawnContext::from_seed(7));

    c.bench_function("explode_40", |b| {
        b.iter_batched(
            || PartRegistry::new([desc.clone()]),
            |mut registry| {
                controller.explode(&mut registry, PartId(0));
                registry
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_terrain(c: &mut Criterion) {
    c.bench_function("generate_terrain", |b| {
        b.iter(|| {
            let mut ctx = SpawnContext::from_seed(8);
            black_box(Terrain::generate(&TerrainConfig::default(), &mut ctx))
        })
    });
}

criterion_group!(
    benches,
    bench_hover_query,
    bench_frame_step,
    bench_instance_collect,
    bench_explode,
    bench_terrain
);
criterion_main!(benches);
