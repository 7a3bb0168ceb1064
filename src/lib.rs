//! # Shatter - hover-driven explode/reassemble particles
//!
//! A scene is a fixed list of rigid *parts*. Pointing at a part bursts it
//! into a cloud of floating debris; pointing away sends every fragment home,
//! and the part reappears once the last one arrives.
//!
//! ## Quick Start
//!
//! ```ignore
//! use shatter::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     let mut ctx = SpawnContext::from_seed(7);
//!     Simulation::new()
//!         .with_parts(grand_castle(&mut ctx, &CastleStyle::default()))
//!         .with_explosion(ExplosionConfig::default().with_particle_count(60))
//!         .run()
//! }
//! ```
//!
//! ## Headless
//!
//! The simulation core has no GPU dependency. Drive it directly with a
//! [`FrameScheduler`], passing the pointer in normalized device coordinates:
//!
//! ```ignore
//! let mut scene = Scene::new(PartRegistry::new(parts), Camera::new());
//! let mut scheduler = FrameScheduler::new(ExplosionConfig::default(), SpawnContext::from_seed(1));
//! let report = scheduler.step(&mut scene, Some(Vec2::ZERO), 1.0 / 60.0);
//! ```
//!
//! ## Frame Order
//!
//! | Step | Module |
//! |------|--------|
//! | Pointer ray, hover target | [`spatial`], [`camera`] |
//! | Explode / release | [`explosion`] |
//! | Float, fly home, restore | [`animator`] |
//! | Ambient snow | [`snowfall`] |
//! | Orbit | [`camera`] |
//! | Draw (terrain, parts, debris, snow) | `gpu` |

extern crate self as shatter;

pub mod animator;
pub mod camera;
pub mod castle;
pub mod config;
pub mod error;
pub mod explosion;
pub mod gpu;
pub mod input;
pub mod part;
pub mod particle;
pub mod registry;
pub mod scheduler;
mod simulation;
pub mod snowfall;
pub mod spatial;
pub mod spawn;
pub mod terrain;
pub mod textures;
pub mod time;

pub use bytemuck;
pub use glam::{Vec2, Vec3, Vec4};
pub use wgpu;

pub use animator::{AnimatorReport, ParticleAnimator};
pub use camera::Camera;
pub use castle::{grand_castle, CastleStyle};
pub use config::ExplosionConfig;
pub use error::{GpuError, SimulationError, TextureError};
pub use explosion::{ExplosionController, HoverOutcome};
pub use part::{Appearance, Part, PartDesc, PartId, PartShape, PartState};
pub use particle::{DebrisShape, Particle, ParticleMode};
pub use registry::PartRegistry;
pub use scheduler::{FrameReport, FrameScheduler, Scene};
pub use shatter_derive::{InstanceLayout, MeshKind};
pub use simulation::Simulation;
pub use snowfall::{SnowConfig, Snowfall};
pub use spatial::{Aabb, Ray};
pub use spawn::SpawnContext;
pub use terrain::{Terrain, TerrainConfig};
pub use time::Time;

/// Trait implemented by `#[derive(InstanceLayout)]`.
///
/// Describes a per-instance GPU struct: its vertex attributes and the WGSL
/// struct fields that read them.
///
/// # Do Not Implement Manually
///
/// Offsets and shader locations must agree with the struct's memory layout;
/// the derive computes both from the field list.
///
/// # Example
///
/// ```ignore
/// #[repr(C)]
/// #[derive(Clone, Copy, Pod, Zeroable, InstanceLayout)]
/// #[instance(start_location = 2)]
/// struct Instance {
///     model: [[f32; 4]; 4], // locations 2..=5
///     color: [f32; 4],      // location 6
/// }
/// ```
pub trait InstanceData: bytemuck::Pod {
    /// Vertex attributes, one per shader location.
    const ATTRIBUTES: &'static [wgpu::VertexAttribute];

    /// WGSL struct members, one `@location(n) name: type,` line per attribute.
    ///
    /// Matrix fields are split into columns named `field_0`, `field_1`, ...
    const WGSL_FIELDS: &'static str;

    /// Instance-rate buffer layout.
    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: Self::ATTRIBUTES,
        }
    }
}

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use shatter::prelude::*;
/// ```
pub mod prelude {
    pub use crate::camera::Camera;
    pub use crate::castle::{grand_castle, CastleStyle};
    pub use crate::config::ExplosionConfig;
    pub use crate::error::SimulationError;
    pub use crate::explosion::ExplosionController;
    pub use crate::input::{Input, KeyCode, MouseButton};
    pub use crate::part::{Appearance, PartDesc, PartId, PartShape};
    pub use crate::registry::PartRegistry;
    pub use crate::scheduler::{FrameReport, FrameScheduler, Scene};
    pub use crate::simulation::Simulation;
    pub use crate::snowfall::SnowConfig;
    pub use crate::spawn::SpawnContext;
    pub use crate::terrain::TerrainConfig;
    pub use crate::time::Time;
    pub use crate::{Vec2, Vec3, Vec4};
}
