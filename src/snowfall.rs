//! Ambient snowfall.
//!
//! A fixed pool of flakes falls through a box around the castle, swaying
//! sideways with height. A flake that drops below the ground is recycled at
//! the top of the box at a fresh random column. The whole field also turns
//! very slowly about the vertical axis.
//!
//! Velocities are expressed per 1/60 s tick and scaled by `dt * 60`, so the
//! fall looks the same at any frame rate.

use glam::Vec3;
use std::ops::Range;

use crate::spawn::SpawnContext;

const TICKS_PER_SECOND: f32 = 60.0;

/// Snowfall parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SnowConfig {
    pub count: usize,
    /// Half width of the volume along X and Z.
    pub half_extent: f32,
    /// Spawn height; flakes start anywhere in `[0, height)`.
    pub height: f32,
    /// Flakes below this height are recycled.
    pub floor: f32,
    /// Horizontal drift per tick, sampled in `[-drift, drift)` on X and Z.
    pub drift: f32,
    /// Fall speed per tick.
    pub fall_speed: Range<f32>,
    /// Sideways sway per tick.
    pub sway_amplitude: f32,
    /// Sway wavelength factor applied to height.
    pub sway_frequency: f32,
    /// Field rotation about Y, radians per tick.
    pub spin: f32,
    pub flake_size: Range<f32>,
}

impl Default for SnowConfig {
    fn default() -> Self {
        Self {
            count: 5000,
            half_extent: 100.0,
            height: 100.0,
            floor: -2.0,
            drift: 0.015,
            fall_speed: 0.1..0.18,
            sway_amplitude: 0.03,
            sway_frequency: 0.05,
            spin: 0.00005,
            flake_size: 0.2..1.0,
        }
    }
}

impl SnowConfig {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }
}

/// One snowflake, in field-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snowflake {
    pub position: Vec3,
    /// Units per tick.
    pub velocity: Vec3,
    pub size: f32,
}

/// The snow field.
#[derive(Debug, Clone)]
pub struct Snowfall {
    config: SnowConfig,
    flakes: Vec<Snowflake>,
    /// Field rotation about Y, radians.
    rotation: f32,
    ctx: SpawnContext,
}

impl Snowfall {
    pub fn new(config: SnowConfig, mut ctx: SpawnContext) -> Self {
        let flakes = (0..config.count)
            .map(|_| {
                let position = Vec3::new(
                    ctx.random_symmetric(config.half_extent),
                    ctx.random_range(0.0, config.height),
                    ctx.random_symmetric(config.half_extent),
                );
                let velocity = Vec3::new(
                    ctx.random_symmetric(config.drift),
                    -ctx.random_range(config.fall_speed.start, config.fall_speed.end),
                    ctx.random_symmetric(config.drift),
                );
                let size = ctx.random_range(config.flake_size.start, config.flake_size.end);
                Snowflake {
                    position,
                    velocity,
                    size,
                }
            })
            .collect();

        Self {
            config,
            flakes,
            rotation: 0.0,
            ctx,
        }
    }

    #[inline]
    pub fn flakes(&self) -> &[Snowflake] {
        &self.flakes
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn config(&self) -> &SnowConfig {
        &self.config
    }

    /// Advance the field by `dt` seconds. Returns the number of recycled flakes.
    pub fn update(&mut self, dt: f32) -> usize {
        if !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        let ticks = dt * TICKS_PER_SECOND;
        let config = &self.config;
        let ctx = &mut self.ctx;
        let mut recycled = 0;

        for flake in &mut self.flakes {
            flake.position += flake.velocity * ticks;
            flake.position.x +=
                (flake.position.y * config.sway_frequency).sin() * config.sway_amplitude * ticks;

            if flake.position.y < config.floor {
                flake.position = Vec3::new(
                    ctx.random_symmetric(config.half_extent),
                    config.height,
                    ctx.random_symmetric(config.half_extent),
                );
                recycled += 1;
            }
        }

        self.rotation = (self.rotation + config.spin * ticks).rem_euclid(std::f32::consts::TAU);
        recycled
    }
}
