//! Hover-driven explode / reassemble state machine.
//!
//! Each frame [`ExplosionController::update`] reconciles the pointer with the
//! registry:
//!
//! 1. Find the hover target: the nearest *visible* part under the pointer.
//! 2. Every hover-active part the pointer ray no longer passes through is
//!    told to [`reassemble`](ExplosionController::reassemble).
//! 3. If the hover target is idle it is [`explode`](ExplosionController::explode)d.
//!
//! A part stays [`PartState::Exploded`] until its last particle is back
//! home, so hovering it again mid-reassembly cannot start a second burst on
//! top of the first. Once restored it can be exploded again.

use log::debug;

use crate::config::ExplosionConfig;
use crate::part::{Appearance, PartId, PartState};
use crate::particle::{DebrisShape, Particle, ParticleMode};
use crate::registry::PartRegistry;
use crate::spatial::{self, Ray};
use crate::spawn::SpawnContext;
use glam::Vec3;

/// What one controller pass changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoverOutcome {
    /// Nearest visible part under the pointer.
    pub target: Option<PartId>,
    /// Part exploded this pass.
    pub exploded: Option<PartId>,
    /// Parts switched to reassembling this pass.
    pub reassembling: Vec<PartId>,
}

/// Spawns debris bursts and sends them home.
#[derive(Debug, Clone)]
pub struct ExplosionController {
    config: ExplosionConfig,
    ctx: SpawnContext,
}

impl ExplosionController {
    pub fn new(config: ExplosionConfig, ctx: SpawnContext) -> Self {
        Self { config, ctx }
    }

    pub fn config(&self) -> &ExplosionConfig {
        &self.config
    }

    /// Run the per-frame hover pass.
    ///
    /// `ray` is `None` when the pointer is not over the render surface; every
    /// hover-active part then reassembles.
    pub fn update(&mut self, registry: &mut PartRegistry, ray: Option<&Ray>) -> HoverOutcome {
        let (target, under_pointer) = match ray {
            Some(ray) => (
                spatial::query_hover_ray(ray, registry.parts()),
                spatial::parts_under_pointer(ray, registry.parts()),
            ),
            None => (None, Vec::new()),
        };

        let mut outcome = HoverOutcome {
            target,
            ..Default::default()
        };

        for id in registry.hover_active() {
            let still_under = under_pointer.iter().any(|hit| hit.part == id);
            if !still_under && self.reassemble(registry, id) {
                outcome.reassembling.push(id);
            }
        }

        if let Some(id) = target {
            if self.explode(registry, id) {
                outcome.exploded = Some(id);
            }
        }

        outcome
    }

    /// Blow `id` apart into a fresh burst of debris.
    ///
    /// Returns `false` (and changes nothing) if the part does not exist, is
    /// already exploded, including while its debris is still flying home, or
    /// the configured particle count is zero.
    pub fn explode(&mut self, registry: &mut PartRegistry, id: PartId) -> bool {
        let Some(part) = registry.part_mut(id) else {
            return false;
        };
        if part.is_exploded() {
            return false;
        }

        let base = part.position();
        let size = part.bounds().size();
        let appearance = *part.appearance();

        let particles: Vec<Particle> = (0..self.config.particle_count)
            .map(|_| self.spawn_particle(base, size, &appearance))
            .collect();
        if particles.is_empty() {
            return false;
        }

        debug!(
            "exploding part {} ({}) into {} particles",
            id.0,
            part.name(),
            particles.len()
        );

        *part.state_mut() = PartState::Exploded { particles };
        part.set_visible(false);
        registry.mark_hover_active(id);
        true
    }

    /// Send the debris of `id` home.
    ///
    /// Floating particles switch to reassembling with a random speed;
    /// particles already returning keep theirs. The part stays exploded (and
    /// hidden) until the animator brings the last particle back. Returns
    /// `false` for an idle part or when nothing changed.
    pub fn reassemble(&mut self, registry: &mut PartRegistry, id: PartId) -> bool {
        let was_active = registry.clear_hover_active(id);

        let Some(particles) = registry.part_mut(id).and_then(|part| part.particles_mut()) else {
            return false;
        };

        let mut switched = 0;
        for particle in particles.iter_mut().filter(|p| p.is_floating()) {
            let speed = self.ctx.random_range(
                self.config.reassemble_speed.start,
                self.config.reassemble_speed.end,
            );
            particle.mode = ParticleMode::Reassembling { speed };
            switched += 1;
        }

        if switched > 0 {
            debug!("reassembling part {} ({} particles)", id.0, switched);
        }
        was_active || switched > 0
    }

    fn spawn_particle(&mut self, base: Vec3, size: Vec3, appearance: &Appearance) -> Particle {
        let config = &self.config;
        let ctx = &mut self.ctx;

        let shape = if ctx.chance(config.rounded_probability) {
            DebrisShape::Rounded
        } else {
            DebrisShape::Faceted
        };
        let particle_size = ctx.random_range(config.particle_size.start, config.particle_size.end);
        let position = ctx.random_in_box(base, size);
        let target_offset =
            ctx.random_upper_hemisphere(config.target_radius.start, config.target_radius.end);
        let float_speed = ctx.random_range(config.float_speed.start, config.float_speed.end);
        let rotation_speed = ctx.random_symmetric_vec(config.max_rotation_speed);
        let tint = 1.0 + ctx.random_symmetric(config.color_jitter);

        Particle::new(
            shape,
            particle_size,
            position,
            target_offset,
            float_speed,
            rotation_speed,
            appearance.tinted(tint),
        )
    }
}
