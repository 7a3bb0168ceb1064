//! Random sampling for debris, snow and scene layout.
//!
//! Every random decision in the engine goes through a [`SpawnContext`], so a
//! whole session can be replayed from a single seed.
//!
//! ```ignore
//! let mut ctx = SpawnContext::from_seed(7);
//! let start = ctx.random_in_box(part.position(), part.bounds().size());
//! let offset = ctx.random_upper_hemisphere(3.0, 6.0);
//! ```

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::{PI, TAU};

/// Seeded RNG with helpers for the spawn patterns the engine uses.
#[derive(Debug, Clone)]
pub struct SpawnContext {
    rng: SmallRng,
}

impl SpawnContext {
    /// Deterministic context; the same seed yields the same sequence.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Context seeded from the wall clock, different each program run.
    pub fn from_clock() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::from_seed(seed)
    }

    // ========== Random primitives ==========

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`. Returns `min` for an empty range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Random f32 in `[-half, half)`.
    #[inline]
    pub fn random_symmetric(&mut self, half: f32) -> f32 {
        self.random_range(-half, half)
    }

    /// `true` with probability `p`.
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.random() < p
    }

    // ========== Position helpers ==========

    /// Uniform point inside the box of edge lengths `size` centered on `center`.
    pub fn random_in_box(&mut self, center: Vec3, size: Vec3) -> Vec3 {
        center
            + Vec3::new(
                (self.random() - 0.5) * size.x,
                (self.random() - 0.5) * size.y,
                (self.random() - 0.5) * size.z,
            )
    }

    /// Offset of length in `[min_radius, max_radius)` that never points down.
    ///
    /// The polar angle is sampled over the full sphere and the vertical
    /// component is folded to be non-negative, biasing the result upward.
    pub fn random_upper_hemisphere(&mut self, min_radius: f32, max_radius: f32) -> Vec3 {
        let theta = self.rng.gen_range(0.0..TAU);
        let phi = self.rng.gen_range(0.0..PI);
        let radius = self.random_range(min_radius, max_radius);

        Vec3::new(
            radius * phi.sin() * theta.cos(),
            radius * phi.cos().abs(),
            radius * phi.sin() * theta.sin(),
        )
    }

    /// Vector with each component in `[-half, half)`.
    pub fn random_symmetric_vec(&mut self, half: f32) -> Vec3 {
        Vec3::new(
            self.random_symmetric(half),
            self.random_symmetric(half),
            self.random_symmetric(half),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SpawnContext::from_seed(11);
        let mut b = SpawnContext::from_seed(11);
        for _ in 0..16 {
            assert_eq!(a.random(), b.random());
        }
    }

    #[test]
    fn test_empty_range_returns_min() {
        let mut ctx = SpawnContext::from_seed(1);
        assert_eq!(ctx.random_range(2.0, 2.0), 2.0);
        assert_eq!(ctx.random_range(3.0, 1.0), 3.0);
    }

    #[test]
    fn test_random_in_box_bounds() {
        let mut ctx = SpawnContext::from_seed(2);
        let center = Vec3::new(10.0, 5.0, -3.0);
        let size = Vec3::new(4.0, 2.0, 6.0);
        for _ in 0..200 {
            let p = ctx.random_in_box(center, size);
            let d = (p - center).abs();
            assert!(d.x <= 2.0 && d.y <= 1.0 && d.z <= 3.0);
        }
    }

    #[test]
    fn test_upper_hemisphere_never_points_down() {
        let mut ctx = SpawnContext::from_seed(3);
        for _ in 0..500 {
            let offset = ctx.random_upper_hemisphere(3.0, 6.0);
            assert!(offset.y >= 0.0);
            let r = offset.length();
            assert!(r >= 3.0 - 1e-4 && r < 6.0 + 1e-4, "radius {}", r);
        }
    }

    #[test]
    fn test_symmetric_vec_bounds() {
        let mut ctx = SpawnContext::from_seed(4);
        for _ in 0..200 {
            let v = ctx.random_symmetric_vec(0.015);
            assert!(v.abs().max_element() <= 0.015);
        }
    }
}
