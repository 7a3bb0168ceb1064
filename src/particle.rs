//! Debris particles shed by an exploded part.

use glam::Vec3;

use crate::part::Appearance;

/// Primitive a debris particle is drawn as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebrisShape {
    /// Low-poly sphere.
    Rounded,
    /// Tetrahedron.
    Faceted,
}

/// What a particle is currently doing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleMode {
    /// Drifting toward its rest offset above the source part.
    Floating {
        /// Seconds spent floating; drives the vertical bob.
        elapsed: f32,
    },
    /// Flying home; removed on arrival.
    Reassembling {
        /// Per-particle multiplier on the base return rate.
        speed: f32,
    },
}

/// One piece of debris.
///
/// Owned by exactly one part (inside [`crate::PartState::Exploded`]). The
/// target offset is fixed at spawn, giving every burst a stable formation.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub shape: DebrisShape,
    /// Radius of the primitive.
    pub size: f32,
    pub position: Vec3,
    /// Euler angles (XYZ), radians.
    pub rotation: Vec3,
    /// Uniform scale multiplier.
    pub scale: f32,
    /// 0.0 (invisible) to 1.0 (opaque).
    pub opacity: f32,
    pub appearance: Appearance,
    pub float_speed: f32,
    /// Radians added to each rotation axis per tick.
    pub rotation_speed: Vec3,
    pub mode: ParticleMode,
    target_offset: Vec3,
}

impl Particle {
    pub(crate) fn new(
        shape: DebrisShape,
        size: f32,
        position: Vec3,
        target_offset: Vec3,
        float_speed: f32,
        rotation_speed: Vec3,
        appearance: Appearance,
    ) -> Self {
        Self {
            shape,
            size,
            position,
            rotation: Vec3::ZERO,
            scale: 1.0,
            opacity: 1.0,
            appearance,
            float_speed,
            rotation_speed,
            mode: ParticleMode::Floating { elapsed: 0.0 },
            target_offset,
        }
    }

    /// Rest offset from the source part's base position.
    #[inline]
    pub fn target_offset(&self) -> Vec3 {
        self.target_offset
    }

    #[inline]
    pub fn is_floating(&self) -> bool {
        matches!(self.mode, ParticleMode::Floating { .. })
    }

    #[inline]
    pub fn is_reassembling(&self) -> bool {
        matches!(self.mode, ParticleMode::Reassembling { .. })
    }
}
