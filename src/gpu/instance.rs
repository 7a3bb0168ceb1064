//! Per-instance data and scene batching.
//!
//! Every frame the scene is flattened into one list of [`Instance`]s per
//! mesh, split into an opaque pass (terrain, whole parts) and a translucent
//! pass (debris, snow) drawn afterwards without depth writes.

use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Quat, Vec3};
use shatter_derive::InstanceLayout;

use crate::part::{Appearance, Part, PartShape};
use crate::particle::Particle;
use crate::scheduler::Scene;
use crate::snowfall::Snowfall;
use crate::terrain::Terrain;

use super::mesh::MeshId;

/// Flake radius per unit of flake size.
const SNOW_SCALE: f32 = 0.15;
const SNOW_OPACITY: f32 = 0.8;

/// GPU instance: transform, colour and material.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, InstanceLayout)]
#[instance(start_location = 2)]
pub struct Instance {
    pub model: [[f32; 4]; 4],
    /// Linear RGB plus opacity.
    pub color: [f32; 4],
    /// Roughness, metalness, top taper, unused.
    pub material: [f32; 4],
}

impl Instance {
    pub fn new(model: Mat4, appearance: &Appearance, opacity: f32, taper: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: srgb_to_linear(appearance.color).extend(opacity).to_array(),
            material: [appearance.roughness, appearance.metalness, taper, 0.0],
        }
    }
}

/// Approximate sRGB to linear conversion for colours authored as hex.
pub fn srgb_to_linear(color: Vec3) -> Vec3 {
    color.max(Vec3::ZERO).powf(2.2)
}

/// Instance for a whole part.
pub fn part_instance(part: &Part) -> (MeshId, Instance) {
    let position = part.position();
    match *part.shape() {
        PartShape::Block { size, yaw } => {
            let model = Mat4::from_scale_rotation_translation(size, Quat::from_rotation_y(yaw), position);
            (MeshId::Cube, Instance::new(model, part.appearance(), 1.0, 1.0))
        }
        PartShape::Round { radius, taper, height } => {
            let model = Mat4::from_scale_rotation_translation(
                Vec3::new(radius, height, radius),
                Quat::IDENTITY,
                position,
            );
            (MeshId::Cylinder, Instance::new(model, part.appearance(), 1.0, taper))
        }
    }
}

/// Instance for one debris particle.
pub fn particle_instance(particle: &Particle) -> (MeshId, Instance) {
    let rotation = Quat::from_euler(
        EulerRot::XYZ,
        particle.rotation.x,
        particle.rotation.y,
        particle.rotation.z,
    );
    let model = Mat4::from_scale_rotation_translation(
        Vec3::splat(particle.size * particle.scale),
        rotation,
        particle.position,
    );
    (
        MeshId::from(particle.shape),
        Instance::new(model, &particle.appearance, particle.opacity, 1.0),
    )
}

/// Instances for every flake, with the field rotation applied.
pub fn snow_instances(snow: &Snowfall) -> impl Iterator<Item = Instance> + '_ {
    let field = Quat::from_rotation_y(snow.rotation());
    let white = Appearance::new(Vec3::ONE, 1.0, 0.0);
    snow.flakes().iter().map(move |flake| {
        let model = Mat4::from_scale_rotation_translation(
            Vec3::splat(flake.size * SNOW_SCALE),
            Quat::IDENTITY,
            field * flake.position,
        );
        Instance::new(model, &white, SNOW_OPACITY, 1.0)
    })
}

/// Ground heightfield (already in world space) and one sphere per mound.
pub fn terrain_instances(terrain: &Terrain) -> (Instance, Vec<Instance>) {
    let snow = Appearance::new(Vec3::ONE, 0.9, 0.05);
    let ground = Instance::new(Mat4::IDENTITY, &snow, 1.0, 1.0);
    let mounds = terrain
        .mounds()
        .iter()
        .map(|mound| {
            let model = Mat4::from_scale_rotation_translation(mound.radii, Quat::IDENTITY, mound.center);
            Instance::new(model, &snow, 1.0, 1.0)
        })
        .collect();
    (ground, mounds)
}

/// A contiguous run of instances drawn with one mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRange {
    pub mesh: MeshId,
    pub start: u32,
    pub count: u32,
}

/// The scene flattened for upload.
#[derive(Debug, Default)]
pub struct FrameInstances {
    /// Opaque instances followed by translucent ones.
    pub instances: Vec<Instance>,
    pub opaque: Vec<DrawRange>,
    pub translucent: Vec<DrawRange>,
}

impl FrameInstances {
    /// Flatten `scene`. Hidden parts are skipped.
    pub fn collect(scene: &Scene) -> Self {
        let mut opaque = vec![Vec::new(); MeshId::count() as usize];
        let mut translucent = vec![Vec::new(); MeshId::count() as usize];

        if let Some(terrain) = &scene.terrain {
            let (ground, mounds) = terrain_instances(terrain);
            opaque[u32::from(MeshId::Terrain) as usize].push(ground);
            opaque[u32::from(MeshId::Sphere) as usize].extend(mounds);
        }

        for part in scene.registry.parts() {
            if part.is_visible() {
                let (mesh, instance) = part_instance(part);
                opaque[u32::from(mesh) as usize].push(instance);
            }
            for particle in part.particles() {
                let (mesh, instance) = particle_instance(particle);
                translucent[u32::from(mesh) as usize].push(instance);
            }
        }

        if let Some(snow) = &scene.snowfall {
            translucent[u32::from(MeshId::Sphere) as usize].extend(snow_instances(snow));
        }

        let mut frame = Self::default();
        frame.opaque = frame.append(opaque);
        frame.translucent = frame.append(translucent);
        frame
    }

    fn append(&mut self, per_mesh: Vec<Vec<Instance>>) -> Vec<DrawRange> {
        let mut ranges = Vec::new();
        for (index, batch) in per_mesh.into_iter().enumerate() {
            if batch.is_empty() {
                continue;
            }
            ranges.push(DrawRange {
                mesh: MeshId::from(index as u32),
                start: self.instances.len() as u32,
                count: batch.len() as u32,
            });
            self.instances.extend(batch);
        }
        ranges
    }
}
