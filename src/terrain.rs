//! Snowy landscape under the castle.
//!
//! A square heightfield of rolling hills plus a ring of squashed snow
//! mounds. The terrain is scenery: it is generated once, drawn in the
//! opaque pass and never hit-tested.
//!
//! ```ignore
//! let mut ctx = SpawnContext::from_seed(3);
//! let terrain = Terrain::generate(&TerrainConfig::default(), &mut ctx);
//! let scene = Scene::new(registry, camera).with_terrain(terrain);
//! ```

use glam::{Vec2, Vec3};
use std::f32::consts::TAU;
use std::ops::Range;

use crate::spawn::SpawnContext;

/// Largest grid whose vertices fit 16-bit indices.
pub const MAX_SEGMENTS: u16 = 255;

/// Octaves of the rolling hills: (frequency, amplitude).
const HILLS: [(f32, f32); 3] = [(0.01, 8.0), (0.03, 3.0), (0.1, 1.0)];

/// Terrain generation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainConfig {
    /// Edge length of the square ground, centered on the origin.
    pub size: f32,
    /// Grid cells per edge, clamped to `1..=MAX_SEGMENTS`.
    pub segments: u16,
    /// World height of the undisturbed ground.
    pub base_height: f32,
    /// Per-vertex random lift in `[0, noise)`.
    pub noise: f32,
    pub mound_count: usize,
    pub mound_radius: Range<f32>,
    /// Horizontal distance of mound centers from the origin.
    pub mound_distance: Range<f32>,
    pub mound_height: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 400.0,
            segments: 200,
            base_height: -2.0,
            noise: 0.5,
            mound_count: 50,
            mound_radius: 4.0..12.0,
            mound_distance: 50.0..150.0,
            mound_height: -1.0,
        }
    }
}

impl TerrainConfig {
    pub fn with_segments(mut self, segments: u16) -> Self {
        self.segments = segments;
        self
    }

    pub fn with_mounds(mut self, count: usize) -> Self {
        self.mound_count = count;
        self
    }
}

/// A snow drift drawn as a scaled sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mound {
    pub center: Vec3,
    /// Per-axis radii: jittered horizontally, squashed vertically.
    pub radii: Vec3,
}

/// Generated landscape.
#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    size: f32,
    segments: u16,
    /// Row-major `(segments + 1)²` world heights, rows along +Z.
    heights: Vec<f32>,
    mounds: Vec<Mound>,
}

/// Height of the rolling hills above the base level, without noise.
pub fn rolling_hills(x: f32, z: f32) -> f32 {
    HILLS
        .iter()
        .map(|&(freq, amp)| (x * freq).sin() * (z * freq).cos() * amp)
        .sum()
}

impl Terrain {
    pub fn generate(config: &TerrainConfig, ctx: &mut SpawnContext) -> Self {
        let segments = config.segments.clamp(1, MAX_SEGMENTS);
        let side = segments as usize + 1;
        let step = config.size / segments as f32;
        let half = config.size * 0.5;

        let mut heights = Vec::with_capacity(side * side);
        for row in 0..side {
            let z = row as f32 * step - half;
            for col in 0..side {
                let x = col as f32 * step - half;
                let lift = ctx.random_range(0.0, config.noise);
                heights.push(config.base_height + rolling_hills(x, z) + lift);
            }
        }

        let mounds = (0..config.mound_count)
            .map(|_| {
                let radius = ctx.random_range(config.mound_radius.start, config.mound_radius.end);
                let radii = Vec3::new(
                    radius * (1.0 + ctx.random_symmetric(0.2)),
                    radius * ctx.random_range(0.2, 0.5),
                    radius * (1.0 + ctx.random_symmetric(0.2)),
                );
                let angle = ctx.random_range(0.0, TAU);
                let distance =
                    ctx.random_range(config.mound_distance.start, config.mound_distance.end);
                Mound {
                    center: Vec3::new(angle.cos() * distance, config.mound_height, angle.sin() * distance),
                    radii,
                }
            })
            .collect();

        Self {
            size: config.size,
            segments,
            heights,
            mounds,
        }
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[inline]
    pub fn segments(&self) -> u16 {
        self.segments
    }

    #[inline]
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    #[inline]
    pub fn mounds(&self) -> &[Mound] {
        &self.mounds
    }

    /// World position of grid vertex `(col, row)`.
    pub fn vertex(&self, col: u16, row: u16) -> Vec3 {
        let side = self.segments as usize + 1;
        let (col, row) = (col.min(self.segments), row.min(self.segments));
        let step = self.size / self.segments as f32;
        let half = self.size * 0.5;
        Vec3::new(
            col as f32 * step - half,
            self.heights[row as usize * side + col as usize],
            row as f32 * step - half,
        )
    }

    /// Surface normal at a grid vertex from central differences.
    pub fn normal(&self, col: u16, row: u16) -> Vec3 {
        let left = self.vertex(col.saturating_sub(1), row);
        let right = self.vertex(col.saturating_add(1), row);
        let back = self.vertex(col, row.saturating_sub(1));
        let front = self.vertex(col, row.saturating_add(1));
        (front - back).cross(right - left).try_normalize().unwrap_or(Vec3::Y)
    }

    /// Lowest and highest ground height.
    pub fn height_range(&self) -> Vec2 {
        self.heights
            .iter()
            .fold(Vec2::new(f32::INFINITY, f32::NEG_INFINITY), |range, &h| {
                Vec2::new(range.x.min(h), range.y.max(h))
            })
    }
}
