//! Tunable constants for explosion and reassembly.
//!
//! ```ignore
//! let config = ExplosionConfig::default()
//!     .with_particle_count(60)
//!     .with_target_radius(4.0..8.0)
//!     .with_reassemble_speed(2.0..3.0);
//! ```

use std::ops::Range;

/// Parameters of a debris burst and of the particle integrator.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplosionConfig {
    /// Particles spawned per explosion.
    pub particle_count: usize,
    /// Radius of each debris primitive.
    pub particle_size: Range<f32>,
    /// Probability that a particle is rounded rather than faceted.
    pub rounded_probability: f32,
    /// Length of the rest offset from the part.
    pub target_radius: Range<f32>,
    /// Floating ease rate multiplier.
    pub float_speed: Range<f32>,
    /// Per-axis rotation, radians per tick, sampled in `[-max, max)`.
    pub max_rotation_speed: f32,
    /// Colour multiplier deviation (0.1 = ±10%).
    pub color_jitter: f32,
    /// Per-particle return speed multiplier.
    pub reassemble_speed: Range<f32>,
    /// Base return rate in units per second (before the multiplier).
    pub reassemble_rate: f32,
    /// Distance from home at which a returning particle is absorbed.
    pub completion_distance: f32,
    /// Distance over which opacity and scale fade while returning.
    pub fade_distance: f32,
    /// Floor for the shrinking scale while returning.
    pub min_scale: f32,
    /// Vertical bob amplitude while floating.
    pub bob_amplitude: f32,
    /// Vertical bob angular frequency (rad/s).
    pub bob_frequency: f32,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self {
            particle_count: 40,
            particle_size: 0.2..0.7,
            rounded_probability: 0.6,
            target_radius: 3.0..6.0,
            float_speed: 0.3..0.7,
            max_rotation_speed: 0.015,
            color_jitter: 0.1,
            reassemble_speed: 1.5..2.5,
            reassemble_rate: 4.0,
            completion_distance: 0.2,
            fade_distance: 3.0,
            min_scale: 0.5,
            bob_amplitude: 0.2,
            bob_frequency: 1.5,
        }
    }
}

impl ExplosionConfig {
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    pub fn with_particle_size(mut self, size: Range<f32>) -> Self {
        self.particle_size = size;
        self
    }

    pub fn with_rounded_probability(mut self, p: f32) -> Self {
        self.rounded_probability = p.clamp(0.0, 1.0);
        self
    }

    pub fn with_target_radius(mut self, radius: Range<f32>) -> Self {
        self.target_radius = radius;
        self
    }

    pub fn with_float_speed(mut self, speed: Range<f32>) -> Self {
        self.float_speed = speed;
        self
    }

    pub fn with_max_rotation_speed(mut self, speed: f32) -> Self {
        self.max_rotation_speed = speed.abs();
        self
    }

    /// Return speed multiplier range. Values at or below zero are raised to a
    /// small positive floor so every particle still makes it home.
    pub fn with_reassemble_speed(mut self, speed: Range<f32>) -> Self {
        let start = speed.start.max(0.01);
        let end = speed.end.max(start);
        self.reassemble_speed = start..end;
        self
    }

    pub fn with_completion_distance(mut self, distance: f32) -> Self {
        self.completion_distance = distance.max(f32::EPSILON);
        self
    }

    pub fn with_bob(mut self, amplitude: f32, frequency: f32) -> Self {
        self.bob_amplitude = amplitude;
        self.bob_frequency = frequency;
        self
    }
}
