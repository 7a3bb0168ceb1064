//! Interactive rigid parts.
//!
//! A [`Part`] is one piece of the castle that can be blown apart. Its base
//! position and bounding extent are fixed when the scene is built; only its
//! visibility and [`PartState`] change during a session.
//!
//! # State
//!
//! | State | Owned particles | Visible |
//! |-------|-----------------|---------|
//! | [`PartState::Idle`] | none | yes |
//! | [`PartState::Exploded`] | one or more | no |
//!
//! Particles live inside the `Exploded` variant, so a particle has exactly
//! one owner and an idle part cannot hold stray debris.

use glam::Vec3;

use crate::particle::Particle;
use crate::spatial::Aabb;

/// Stable index of a part inside its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(pub usize);

/// Surface description shared by a part and the debris it sheds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    /// Linear RGB, 0.0-1.0.
    pub color: Vec3,
    pub roughness: f32,
    pub metalness: f32,
}

impl Appearance {
    pub const fn new(color: Vec3, roughness: f32, metalness: f32) -> Self {
        Self {
            color,
            roughness,
            metalness,
        }
    }

    /// Material from a `0xRRGGBB` colour.
    pub fn from_hex(rgb: u32, roughness: f32, metalness: f32) -> Self {
        let channel = |shift: u32| ((rgb >> shift) & 0xff) as f32 / 255.0;
        Self::new(Vec3::new(channel(16), channel(8), channel(0)), roughness, metalness)
    }

    /// Same material with the colour scaled by `factor` and clamped to 0-1.
    pub fn tinted(&self, factor: f32) -> Self {
        Self {
            color: (self.color * factor).clamp(Vec3::ZERO, Vec3::ONE),
            ..*self
        }
    }
}

impl Default for Appearance {
    fn default() -> Self {
        Self::new(Vec3::splat(0.6), 0.8, 0.1)
    }
}

/// Drawable form of a part, centered on its base position.
///
/// Only the renderer looks at this; hit-testing always uses the bounding
/// extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartShape {
    /// Box with the given edge lengths, turned `yaw` radians about Y.
    Block { size: Vec3, yaw: f32 },
    /// Vertical frustum. `taper` is top radius over bottom radius; 0 makes a
    /// cone.
    Round { radius: f32, taper: f32, height: f32 },
}

impl PartShape {
    /// Axis-aligned box exactly matching `half_extents`.
    pub fn block(half_extents: Vec3) -> Self {
        PartShape::Block {
            size: half_extents.abs() * 2.0,
            yaw: 0.0,
        }
    }
}

/// Scene-setup description of a part, handed to [`crate::PartRegistry::new`].
#[derive(Debug, Clone)]
pub struct PartDesc {
    pub name: String,
    /// World-space base position (center of the bounding extent).
    pub position: Vec3,
    /// Half the bounding extent along each axis.
    pub half_extents: Vec3,
    pub appearance: Appearance,
    pub shape: PartShape,
}

impl PartDesc {
    /// Box-shaped part filling its bounding extent.
    pub fn new(
        name: impl Into<String>,
        position: Vec3,
        half_extents: Vec3,
        appearance: Appearance,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            half_extents: half_extents.abs(),
            appearance,
            shape: PartShape::block(half_extents),
        }
    }

    pub fn with_shape(mut self, shape: PartShape) -> Self {
        self.shape = shape;
        self
    }
}

/// Interaction state of a part.
#[derive(Debug, Clone, Default)]
pub enum PartState {
    /// Whole and visible.
    #[default]
    Idle,
    /// Blown apart. Never holds an empty list: the animator returns the part
    /// to `Idle` the moment its last particle arrives home.
    Exploded { particles: Vec<Particle> },
}

/// A rigid interactive part.
#[derive(Debug, Clone)]
pub struct Part {
    id: PartId,
    name: String,
    position: Vec3,
    half_extents: Vec3,
    appearance: Appearance,
    shape: PartShape,
    visible: bool,
    state: PartState,
}

impl Part {
    pub(crate) fn from_desc(id: PartId, desc: PartDesc) -> Self {
        Self {
            id,
            name: desc.name,
            position: desc.position,
            half_extents: desc.half_extents,
            appearance: desc.appearance,
            shape: desc.shape,
            visible: true,
            state: PartState::Idle,
        }
    }

    #[inline]
    pub fn id(&self) -> PartId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base position. Fixed for the lifetime of the part.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    /// World-space bounding extent.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, self.half_extents)
    }

    #[inline]
    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    #[inline]
    pub fn shape(&self) -> &PartShape {
        &self.shape
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[inline]
    pub fn state(&self) -> &PartState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut PartState {
        &mut self.state
    }

    #[inline]
    pub fn is_exploded(&self) -> bool {
        matches!(self.state, PartState::Exploded { .. })
    }

    /// Debris currently owned by this part (empty while idle).
    pub fn particles(&self) -> &[Particle] {
        match &self.state {
            PartState::Idle => &[],
            PartState::Exploded { particles } => particles,
        }
    }

    pub(crate) fn particles_mut(&mut self) -> Option<&mut Vec<Particle>> {
        match &mut self.state {
            PartState::Idle => None,
            PartState::Exploded { particles } => Some(particles),
        }
    }
}
