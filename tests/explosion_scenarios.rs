//! End-to-end hover scenarios driven through the frame scheduler.
//!
//! The camera sits on the +Z axis looking at a single part at the origin, so
//! the screen center always hits it and the top-right corner never does.

use glam::{Vec2, Vec3};
use shatter::prelude::*;
use shatter::spatial;
use shatter::{ParticleAnimator, ParticleMode, PartState};

const ON: Option<Vec2> = Some(Vec2::ZERO);
const OFF: Option<Vec2> = Some(Vec2::new(0.9, 0.9));
const DT: f32 = 0.016;

fn keep() -> PartDesc {
    PartDesc::new("keep", Vec3::ZERO, Vec3::splat(3.0), Appearance::from_hex(0xc8c8c8, 0.8, 0.1))
}

fn setup(seed: u64) -> (Scene, FrameScheduler) {
    let scene = Scene::new(
        PartRegistry::new([keep()]),
        Camera::looking_at(Vec3::new(0.0, 0.0, 30.0), Vec3::ZERO),
    );
    let scheduler = FrameScheduler::new(ExplosionConfig::default(), SpawnContext::from_seed(seed));
    (scene, scheduler)
}

fn part(scene: &Scene) -> &shatter::Part {
    scene.registry.part(PartId(0)).unwrap()
}

/// Visible exactly when idle, and idle exactly when it owns no particles.
fn assert_coupled(scene: &Scene) {
    for part in scene.registry.parts() {
        assert_eq!(part.is_visible(), !part.is_exploded(), "{}", part.name());
        assert_eq!(part.is_exploded(), !part.particles().is_empty(), "{}", part.name());
    }
}

#[test]
fn hover_hold_release_restore() {
    let (mut scene, mut scheduler) = setup(11);

    // Frame N: hover explodes the part into 40 floating particles
    let report = scheduler.step(&mut scene, ON, DT);
    assert_eq!(report.exploded, Some(PartId(0)));
    assert_eq!(report.live_particles, 40);
    assert!(!part(&scene).is_visible());
    assert!(part(&scene).particles().iter().all(|p| p.is_floating()));
    assert_coupled(&scene);

    // Frames N+1..N+4: hovering the hidden part keeps it exploded
    for _ in 0..4 {
        let report = scheduler.step(&mut scene, ON, DT);
        assert!(report.reassembling.is_empty());
        assert_eq!(report.exploded, None);
        assert_eq!(report.live_particles, 40);
        assert!(scene.registry.is_hover_active(PartId(0)));
    }
    assert!(part(&scene).particles().iter().all(|p| p.is_floating()));

    // Frame N+5: pointer moves off, every particle heads home, part stays hidden
    let report = scheduler.step(&mut scene, OFF, DT);
    assert_eq!(report.reassembling, vec![PartId(0)]);
    assert!(part(&scene).particles().iter().all(|p| p.is_reassembling()));
    assert!(!part(&scene).is_visible());
    assert!(!scene.registry.is_hover_active(PartId(0)));

    let mut frames = 0;
    while part(&scene).is_exploded() {
        let report = scheduler.step(&mut scene, OFF, DT);
        assert_coupled(&scene);
        frames += 1;
        assert!(frames < 1000, "debris never came home");
        if report.live_particles == 0 {
            assert_eq!(report.restored, vec![PartId(0)]);
        }
    }

    assert!(part(&scene).is_visible());
    assert!(matches!(part(&scene).state(), PartState::Idle));
}

#[test]
fn conservation_across_a_session() {
    let (mut scene, mut scheduler) = setup(5);
    scheduler.step(&mut scene, ON, DT);

    let mut total_absorbed = 0;
    for frame in 0..600 {
        let pointer = if frame < 30 { ON } else { OFF };
        let report = scheduler.step(&mut scene, pointer, DT);
        total_absorbed += report.absorbed;
        assert_eq!(report.live_particles + total_absorbed, 40);
    }
    assert_eq!(total_absorbed, 40);
}

#[test]
fn rehover_during_reassembly_is_rejected() {
    let (mut scene, mut scheduler) = setup(3);
    scheduler.step(&mut scene, ON, DT);
    scheduler.step(&mut scene, OFF, DT);
    let returning = part(&scene).particles().len();
    assert!(returning > 0);

    let report = scheduler.step(&mut scene, ON, DT);
    assert_eq!(report.exploded, None);
    assert!(part(&scene).particles().len() <= returning);
    assert!(part(&scene).particles().iter().all(|p| p.is_reassembling()));
    assert!(!scene.registry.is_hover_active(PartId(0)));

    // Once restored the part can burst again
    while part(&scene).is_exploded() {
        scheduler.step(&mut scene, OFF, DT);
    }
    let report = scheduler.step(&mut scene, ON, DT);
    assert_eq!(report.exploded, Some(PartId(0)));
}

#[test]
fn explode_and_reassemble_are_idempotent() {
    let mut registry = PartRegistry::new([keep()]);
    let mut controller = ExplosionController::new(ExplosionConfig::default(), SpawnContext::from_seed(9));

    assert!(!controller.reassemble(&mut registry, PartId(0)));
    assert!(controller.explode(&mut registry, PartId(0)));
    assert!(!controller.explode(&mut registry, PartId(0)));
    assert_eq!(registry.live_particles(), 40);

    assert!(controller.reassemble(&mut registry, PartId(0)));
    let speeds: Vec<f32> = registry.parts()[0]
        .particles()
        .iter()
        .map(|p| match p.mode {
            ParticleMode::Reassembling { speed } => speed,
            ParticleMode::Floating { .. } => panic!("still floating"),
        })
        .collect();

    // A second release keeps every particle's speed
    assert!(!controller.reassemble(&mut registry, PartId(0)));
    for (particle, speed) in registry.parts()[0].particles().iter().zip(speeds) {
        assert_eq!(particle.mode, ParticleMode::Reassembling { speed });
    }
}

#[test]
fn reassembly_terminates_for_any_step_size() {
    for (seed, dt) in [(1, 0.016), (2, 0.05), (3, 0.1), (4, 0.5)] {
        let mut registry = PartRegistry::new([keep()]);
        let mut controller =
            ExplosionController::new(ExplosionConfig::default(), SpawnContext::from_seed(seed));
        let animator = ParticleAnimator::new(ExplosionConfig::default());

        controller.explode(&mut registry, PartId(0));
        // Let the cloud spread to its full radius
        for _ in 0..300 {
            animator.step(&mut registry, 0.05);
        }
        let farthest = registry.parts()[0]
            .particles()
            .iter()
            .map(|p| p.position.length())
            .fold(0.0f32, f32::max);
        assert!(farthest <= 9.5, "cloud reached {}", farthest);

        controller.reassemble(&mut registry, PartId(0));
        // Slowest return covers 1.5 * 4 * dt per step
        let bound = (farthest / (1.5 * 4.0 * dt)).ceil() as usize + 2;
        let mut steps = 0;
        while registry.live_particles() > 0 {
            animator.step(&mut registry, dt);
            steps += 1;
            assert!(steps <= bound, "dt {} needed more than {} steps", dt, bound);
        }
        assert!(registry.parts()[0].is_visible());
    }
}

#[test]
fn pointer_leaving_window_releases_everything() {
    let left = PartDesc::new("left", Vec3::new(-8.0, 0.0, 0.0), Vec3::splat(2.0), Appearance::default());
    let right = PartDesc::new("right", Vec3::new(8.0, 0.0, 0.0), Vec3::splat(2.0), Appearance::default());
    let mut scene = Scene::new(
        PartRegistry::new([left, right]),
        Camera::looking_at(Vec3::new(0.0, 0.0, 30.0), Vec3::ZERO),
    );
    let mut scheduler = FrameScheduler::new(ExplosionConfig::default(), SpawnContext::from_seed(8));
    let mut controller = ExplosionController::new(ExplosionConfig::default(), SpawnContext::from_seed(8));
    controller.explode(&mut scene.registry, PartId(0));
    controller.explode(&mut scene.registry, PartId(1));

    let report = scheduler.step(&mut scene, None, DT);
    assert_eq!(report.reassembling, vec![PartId(0), PartId(1)]);
    assert!(scene.registry.hover_active().is_empty());
    assert_coupled(&scene);
}

#[test]
fn malformed_pointer_keeps_animation_running() {
    let (mut scene, mut scheduler) = setup(4);
    scheduler.step(&mut scene, ON, DT);
    let before: Vec<Vec3> = part(&scene).particles().iter().map(|p| p.position).collect();

    let report = scheduler.step(&mut scene, Some(Vec2::new(f32::INFINITY, 0.0)), DT);
    assert!(report.interaction_skipped);
    assert!(report.reassembling.is_empty());
    assert!(scene.registry.is_hover_active(PartId(0)));

    let after: Vec<Vec3> = part(&scene).particles().iter().map(|p| p.position).collect();
    assert_ne!(before, after);
}

#[test]
fn paused_time_freezes_debris() {
    let (mut scene, mut scheduler) = setup(6);
    scheduler.step(&mut scene, ON, DT);
    scheduler.time_mut().pause();

    let before: Vec<Vec3> = part(&scene).particles().iter().map(|p| p.position).collect();
    let report = scheduler.step(&mut scene, ON, DT);
    assert_eq!(report.delta, 0.0);
    let after: Vec<Vec3> = part(&scene).particles().iter().map(|p| p.position).collect();
    assert_eq!(before, after);
}

#[test]
fn castle_sweep_keeps_only_parts_under_pointer_active() {
    let mut ctx = SpawnContext::from_seed(21);
    let parts = grand_castle(&mut ctx, &CastleStyle::default());
    let count = parts.len();
    let mut scene = Scene::new(PartRegistry::new(parts), Camera::new());
    let mut scheduler = FrameScheduler::new(ExplosionConfig::default(), SpawnContext::from_seed(21));

    let mut exploded = Vec::new();
    let mut released = 0;
    for step in 0..120 {
        let t = step as f32 / 120.0;
        let pointer = Vec2::new(t * 1.6 - 0.8, 0.1 - t * 0.4);
        // The controller sees the camera as it is before this frame's orbit
        let ray = scene.camera.ray_from_ndc(pointer).unwrap();
        let before = scene.registry.hover_active();

        let report = scheduler.step(&mut scene, Some(pointer), DT);

        // A burst only ever hits the hover target, and only a fresh one
        if let Some(id) = report.exploded {
            assert_eq!(report.hover, Some(id));
            assert!(!before.contains(&id));
            exploded.push(id);
        }

        let under: Vec<PartId> = spatial::parts_under_pointer(&ray, scene.registry.parts())
            .iter()
            .map(|hit| hit.part)
            .collect();
        for id in scene.registry.hover_active() {
            assert!(under.contains(&id), "{:?} stayed active off the pointer", id);
        }
        for id in &report.reassembling {
            assert!(before.contains(id));
            assert!(!under.contains(id));
            assert!(!scene.registry.is_hover_active(*id));
        }
        released += report.reassembling.len();

        assert!(report.live_particles <= count * 40);
        assert_coupled(&scene);
    }

    assert!(exploded.len() > 1, "sweep burst {} parts", exploded.len());
    assert!(released > 0);
}
