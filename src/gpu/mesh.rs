//! Unit meshes shared by every instance.
//!
//! All meshes are centered on the origin and fit a unit box (the cylinder
//! and sphere have radius 1 so instance scales read as radii). The cylinder
//! spans y in `[-0.5, 0.5]`; the vertex shader narrows its top ring by the
//! instance taper, which also turns it into a cone.
//!
//! The terrain is the exception: its heightfield is built from the scene's
//! [`Terrain`] in world space and drawn with an identity transform.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use shatter_derive::MeshKind;
use std::f32::consts::{PI, TAU};

use crate::particle::DebrisShape;
use crate::terrain::Terrain;

/// Index of a mesh in the renderer's mesh table.
#[derive(MeshKind, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshId {
    Cube,
    Cylinder,
    Sphere,
    Tetrahedron,
    Terrain,
}

impl From<DebrisShape> for MeshId {
    fn from(shape: DebrisShape) -> Self {
        match shape {
            DebrisShape::Rounded => MeshId::Sphere,
            DebrisShape::Faceted => MeshId::Tetrahedron,
        }
    }
}

impl MeshId {
    pub const ALL: [MeshId; 5] = [
        MeshId::Cube,
        MeshId::Cylinder,
        MeshId::Sphere,
        MeshId::Tetrahedron,
        MeshId::Terrain,
    ];

    /// Build the shared unit geometry for this mesh.
    ///
    /// `None` for [`MeshId::Terrain`], which is built per scene by [`heightfield`].
    pub fn unit(self) -> Option<MeshData> {
        match self {
            MeshId::Cube => Some(cube()),
            MeshId::Cylinder => Some(cylinder(24)),
            MeshId::Sphere => Some(sphere(8, 6)),
            MeshId::Tetrahedron => Some(tetrahedron()),
            MeshId::Terrain => None,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let base = self.vertices.len() as u16;
        self.vertices
            .extend(corners.iter().map(|&c| Vertex::new(c, normal)));
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    fn push_triangle(&mut self, corners: [Vec3; 3]) {
        let normal = (corners[1] - corners[0])
            .cross(corners[2] - corners[0])
            .normalize_or_zero();
        let base = self.vertices.len() as u16;
        self.vertices
            .extend(corners.iter().map(|&c| Vertex::new(c, normal)));
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }
}

/// Unit cube, edge length 1.
pub fn cube() -> MeshData {
    let mut mesh = MeshData::default();
    for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
        for sign in [1.0, -1.0] {
            let normal = axis * sign;
            // Two tangents spanning the face, ordered for CCW winding seen from outside
            let u = Vec3::new(axis.y, axis.z, axis.x);
            let v = normal.cross(u);
            let center = normal * 0.5;
            mesh.push_quad(
                [
                    center - u * 0.5 - v * 0.5,
                    center + u * 0.5 - v * 0.5,
                    center + u * 0.5 + v * 0.5,
                    center - u * 0.5 + v * 0.5,
                ],
                normal,
            );
        }
    }
    mesh
}

/// Capped cylinder of radius 1 and height 1.
pub fn cylinder(segments: u32) -> MeshData {
    let segments = segments.max(3);
    let mut mesh = MeshData::default();
    let ring = |i: u32| {
        let angle = i as f32 / segments as f32 * TAU;
        Vec3::new(angle.cos(), 0.0, angle.sin())
    };

    for i in 0..segments {
        let (a, b) = (ring(i), ring(i + 1));
        let normal = (a + b).normalize();
        let down = Vec3::new(0.0, -0.5, 0.0);
        let up = Vec3::new(0.0, 0.5, 0.0);
        mesh.push_quad([a + down, a + up, b + up, b + down], normal);
        mesh.push_triangle([up, b + up, a + up]);
        mesh.push_triangle([down, a + down, b + down]);
    }
    mesh
}

/// UV sphere of radius 1.
pub fn sphere(longitude: u32, latitude: u32) -> MeshData {
    let (longitude, latitude) = (longitude.max(3), latitude.max(2));
    let mut mesh = MeshData::default();

    for lat in 0..=latitude {
        let theta = lat as f32 / latitude as f32 * PI;
        for lon in 0..=longitude {
            let phi = lon as f32 / longitude as f32 * TAU;
            let p = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
            mesh.vertices.push(Vertex::new(p, p));
        }
    }

    let stride = (longitude + 1) as u16;
    for lat in 0..latitude as u16 {
        for lon in 0..longitude as u16 {
            let a = lat * stride + lon;
            let b = a + stride;
            mesh.indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }
    mesh
}

/// Regular tetrahedron with circumradius 1 and flat faces.
pub fn tetrahedron() -> MeshData {
    let s = 1.0 / 3f32.sqrt();
    let p = [
        Vec3::new(1.0, 1.0, 1.0) * s,
        Vec3::new(-1.0, -1.0, 1.0) * s,
        Vec3::new(-1.0, 1.0, -1.0) * s,
        Vec3::new(1.0, -1.0, -1.0) * s,
    ];
    let mut mesh = MeshData::default();
    for [a, b, c] in [[0, 1, 3], [0, 2, 1], [0, 3, 2], [1, 2, 3]] {
        mesh.push_triangle([p[a], p[b], p[c]]);
    }
    mesh
}

/// World-space triangle grid over the terrain heights, facing up.
pub fn heightfield(terrain: &Terrain) -> MeshData {
    let n = terrain.segments();
    let side = n + 1;
    let mut mesh = MeshData::default();

    for row in 0..side {
        for col in 0..side {
            mesh.vertices
                .push(Vertex::new(terrain.vertex(col, row), terrain.normal(col, row)));
        }
    }

    for row in 0..n {
        for col in 0..n {
            let a = row * side + col;
            let b = a + 1;
            let c = a + side;
            let d = c + 1;
            mesh.indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawn::SpawnContext;
    use crate::terrain::{TerrainConfig, MAX_SEGMENTS};

    fn check(mesh: &MeshData) {
        assert!(!mesh.indices.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
        for vertex in &mesh.vertices {
            let n = Vec3::from(vertex.normal);
            assert!((n.length() - 1.0).abs() < 1e-4);
            assert!(Vec3::from(vertex.position).abs().max_element() <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn test_all_meshes_well_formed() {
        for id in MeshId::ALL {
            if let Some(mesh) = id.unit() {
                check(&mesh);
            }
        }
        assert!(MeshId::Terrain.unit().is_none());
        assert_eq!(MeshId::ALL.len() as u32, MeshId::count());
        for (index, id) in MeshId::ALL.iter().enumerate() {
            assert_eq!(u32::from(*id), index as u32);
        }
    }

    #[test]
    fn test_debris_mesh_mapping() {
        assert_eq!(MeshId::from(DebrisShape::Rounded), MeshId::Sphere);
        assert_eq!(MeshId::from(DebrisShape::Faceted), MeshId::Tetrahedron);
    }

    #[test]
    fn test_faces_point_outward() {
        for id in [MeshId::Cube, MeshId::Cylinder, MeshId::Tetrahedron] {
            let mesh = id.unit().unwrap();
            for tri in mesh.indices.chunks(3) {
                let [a, b, c] = [0, 1, 2].map(|k| Vec3::from(mesh.vertices[tri[k] as usize].position));
                let winding = (b - a).cross(c - a);
                let centroid = (a + b + c) / 3.0;
                assert!(winding.dot(centroid) > 0.0, "{:?} has an inward face", id);
            }
        }
    }

    #[test]
    fn test_cube_extent() {
        let mesh = cube();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        for vertex in &mesh.vertices {
            assert_eq!(Vec3::from(vertex.position).abs(), Vec3::splat(0.5));
        }
    }

    #[test]
    fn test_heightfield_faces_up() {
        let config = TerrainConfig::default().with_segments(16).with_mounds(0);
        let terrain = Terrain::generate(&config, &mut SpawnContext::from_seed(9));
        let mesh = heightfield(&terrain);

        assert_eq!(mesh.vertices.len(), 17 * 17);
        assert_eq!(mesh.indices.len(), 16 * 16 * 6);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| Vec3::from(mesh.vertices[tri[k] as usize].position));
            assert!((b - a).cross(c - a).y > 0.0);
        }
        let first = Vec3::from(mesh.vertices[0].position);
        assert_eq!(first, terrain.vertex(0, 0));
    }

    #[test]
    fn test_full_size_heightfield_fits_u16() {
        let config = TerrainConfig::default().with_segments(MAX_SEGMENTS).with_mounds(0);
        let terrain = Terrain::generate(&config, &mut SpawnContext::from_seed(10));
        let mesh = heightfield(&terrain);
        assert_eq!(mesh.vertices.len(), 65536);
        assert_eq!(*mesh.indices.iter().max().unwrap(), u16::MAX);
    }
}
