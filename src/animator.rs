//! Per-frame particle integration.
//!
//! Floating particles ease toward their rest offset above the part, bob
//! vertically and tumble. Reassembling particles fly straight home, shrinking
//! and fading as they close in, and are absorbed on arrival. When a part's
//! last particle is absorbed the part is restored: idle and visible again.

use glam::Vec3;
use log::debug;

use crate::config::ExplosionConfig;
use crate::part::{PartId, PartState};
use crate::particle::{Particle, ParticleMode};
use crate::registry::PartRegistry;

/// What one animator step changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimatorReport {
    /// Particles absorbed back into their part this step.
    pub absorbed: usize,
    /// Parts whose last particle arrived this step.
    pub restored: Vec<PartId>,
}

/// Integrates every live particle.
#[derive(Debug, Clone, Default)]
pub struct ParticleAnimator {
    config: ExplosionConfig,
}

impl ParticleAnimator {
    pub fn new(config: ExplosionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExplosionConfig {
        &self.config
    }

    /// Advance all particles by `dt` seconds.
    ///
    /// A negative or non-finite `dt` is treated as zero: nothing moves, but
    /// particles already within reach of home are still absorbed.
    pub fn step(&self, registry: &mut PartRegistry, dt: f32) -> AnimatorReport {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut report = AnimatorReport::default();

        for part in registry.parts_mut() {
            let home = part.position();
            let emptied = match part.particles_mut() {
                None => continue,
                Some(particles) => {
                    let before = particles.len();
                    particles.retain_mut(|particle| self.advance(particle, home, dt));
                    report.absorbed += before - particles.len();
                    particles.is_empty()
                }
            };

            if emptied {
                *part.state_mut() = PartState::Idle;
                part.set_visible(true);
                debug!("part {} ({}) restored", part.id().0, part.name());
                report.restored.push(part.id());
            }
        }

        for &id in &report.restored {
            registry.clear_hover_active(id);
        }

        report
    }

    /// Move one particle; returns `false` once it has been absorbed.
    fn advance(&self, particle: &mut Particle, home: Vec3, dt: f32) -> bool {
        let config = &self.config;

        match particle.mode {
            ParticleMode::Floating { elapsed } => {
                let elapsed = elapsed + dt;
                particle.mode = ParticleMode::Floating { elapsed };

                let rest = home + particle.target_offset();
                let ease = (dt * particle.float_speed).clamp(0.0, 1.0);
                particle.position = particle.position.lerp(rest, ease);
                particle.position.y +=
                    (elapsed * config.bob_frequency).sin() * config.bob_amplitude * dt;
                particle.rotation += particle.rotation_speed;
                true
            }
            ParticleMode::Reassembling { speed } => {
                let to_home = home - particle.position;
                let distance = to_home.length();
                if distance < config.completion_distance {
                    return false;
                }

                // Never step past home; a long frame lands exactly on it
                let travel = (dt * speed * config.reassemble_rate).min(distance);
                particle.position += to_home / distance * travel;

                let fade = distance / config.fade_distance;
                particle.opacity = fade.clamp(0.0, 1.0);
                particle.scale = fade.max(config.min_scale);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explosion::ExplosionController;
    use crate::part::{Appearance, PartDesc};
    use crate::spawn::SpawnContext;

    fn exploded_scene(seed: u64) -> (ExplosionController, PartRegistry) {
        let mut registry = PartRegistry::new([PartDesc::new(
            "gate",
            Vec3::new(0.0, 8.0, -30.0),
            Vec3::new(4.0, 7.5, 3.0),
            Appearance::default(),
        )]);
        let mut controller =
            ExplosionController::new(ExplosionConfig::default(), SpawnContext::from_seed(seed));
        controller.explode(&mut registry, PartId(0));
        (controller, registry)
    }

    #[test]
    fn test_floating_particles_drift_toward_rest() {
        let (_, mut registry) = exploded_scene(5);
        let animator = ParticleAnimator::default();
        let home = registry.part(PartId(0)).unwrap().position();

        let before: Vec<f32> = registry
            .part(PartId(0))
            .unwrap()
            .particles()
            .iter()
            .map(|p| p.position.distance(home + p.target_offset()))
            .collect();

        for _ in 0..120 {
            let report = animator.step(&mut registry, 1.0 / 60.0);
            assert_eq!(report.absorbed, 0);
        }

        let part = registry.part(PartId(0)).unwrap();
        assert!(part.is_exploded());
        for (particle, start) in part.particles().iter().zip(before) {
            let now = particle.position.distance(home + particle.target_offset());
            // Bob keeps it from settling exactly
            assert!(now < start * 0.8 + 0.5, "{} vs {}", now, start);
            assert!(particle.is_floating());
            assert_eq!(particle.opacity, 1.0);
        }
    }

    #[test]
    fn test_rotation_accumulates_per_tick() {
        let (_, mut registry) = exploded_scene(6);
        let animator = ParticleAnimator::default();
        let speeds: Vec<Vec3> = registry
            .part(PartId(0))
            .unwrap()
            .particles()
            .iter()
            .map(|p| p.rotation_speed)
            .collect();

        for _ in 0..3 {
            animator.step(&mut registry, 0.016);
        }

        for (particle, speed) in registry.part(PartId(0)).unwrap().particles().iter().zip(speeds) {
            assert!((particle.rotation - speed * 3.0).length() < 1e-5);
        }
    }

    #[test]
    fn test_reassembly_restores_part() {
        let (mut controller, mut registry) = exploded_scene(7);
        let animator = ParticleAnimator::default();
        controller.reassemble(&mut registry, PartId(0));

        let mut restored = Vec::new();
        let mut absorbed = 0;
        for _ in 0..1000 {
            let report = animator.step(&mut registry, 0.016);
            absorbed += report.absorbed;
            restored.extend(report.restored);
            if !registry.part(PartId(0)).unwrap().is_exploded() {
                break;
            }
            // Hidden for as long as any debris is in flight
            assert!(!registry.part(PartId(0)).unwrap().is_visible());
        }

        let part = registry.part(PartId(0)).unwrap();
        assert!(!part.is_exploded());
        assert!(part.is_visible());
        assert_eq!(absorbed, 40);
        assert_eq!(restored, vec![PartId(0)]);
        assert_eq!(registry.live_particles(), 0);
    }

    #[test]
    fn test_returning_particle_fades_and_shrinks() {
        let (mut controller, mut registry) = exploded_scene(8);
        let animator = ParticleAnimator::default();
        controller.reassemble(&mut registry, PartId(0));
        animator.step(&mut registry, 0.016);

        for particle in registry.part(PartId(0)).unwrap().particles() {
            assert!((0.0..=1.0).contains(&particle.opacity));
            assert!(particle.scale >= 0.5);
        }
    }

    #[test]
    fn test_long_frame_does_not_overshoot() {
        let mut registry = PartRegistry::new([PartDesc::new(
            "tower",
            Vec3::ZERO,
            Vec3::ONE,
            Appearance::default(),
        )]);
        let mut controller = ExplosionController::new(
            ExplosionConfig::default()
                .with_particle_count(1)
                .with_reassemble_speed(2.5..2.5),
            SpawnContext::from_seed(3),
        );
        controller.explode(&mut registry, PartId(0));
        controller.reassemble(&mut registry, PartId(0));

        let animator = ParticleAnimator::default();
        // A 100-unit step from inside the part lands on home instead of past it
        let first = animator.step(&mut registry, 10.0);
        if let Some(particle) = registry.part(PartId(0)).unwrap().particles().first() {
            assert!(particle.position.length() < 1e-3);
        }

        let second = animator.step(&mut registry, 0.016);
        let restored: Vec<PartId> = first.restored.into_iter().chain(second.restored).collect();
        assert_eq!(restored, vec![PartId(0)]);
        assert!(registry.part(PartId(0)).unwrap().is_visible());
    }

    #[test]
    fn test_nan_delta_moves_nothing() {
        let (_, mut registry) = exploded_scene(9);
        let animator = ParticleAnimator::default();
        let before = registry.part(PartId(0)).unwrap().particles().to_vec();

        animator.step(&mut registry, f32::NAN);
        let after = registry.part(PartId(0)).unwrap().particles();
        for (a, b) in before.iter().zip(after) {
            assert_eq!(a.position, b.position);
        }
    }
}
