//! Scene shader and its uniform block.
//!
//! One shader draws everything. The instance inputs are spliced in from
//! [`Instance::WGSL_FIELDS`] so they always match the vertex buffer layout.
//!
//! Lighting is a winter-day approximation: a white sun, a cold blue fill
//! from the opposite side, sky-tinted ambient and hemisphere terms, a
//! roughness-driven highlight, and linear distance fog into the sky colour.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::camera::Camera;
use crate::InstanceData;

use super::instance::{srgb_to_linear, Instance};

/// Sky, fog and ambient colour (`#e3f2fd`).
pub const SKY_COLOR: u32 = 0xe3f2fd;

/// Light rig.
#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    /// Position of the sun; light arrives from this direction.
    pub sun_position: Vec3,
    pub sun_intensity: f32,
    pub fill_position: Vec3,
    pub fill_intensity: f32,
    /// `0xRRGGBB`.
    pub fill_color: u32,
    pub ambient_intensity: f32,
    pub hemisphere_intensity: f32,
    pub sky_color: u32,
    pub fog_near: f32,
    pub fog_far: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            sun_position: Vec3::new(60.0, 80.0, 60.0),
            sun_intensity: 0.8,
            fill_position: Vec3::new(-40.0, 60.0, -40.0),
            fill_intensity: 0.3,
            fill_color: 0x6bb6ff,
            ambient_intensity: 0.4,
            hemisphere_intensity: 0.5,
            sky_color: SKY_COLOR,
            fog_near: 50.0,
            fog_far: 300.0,
        }
    }
}

/// `0xRRGGBB` to linear RGB.
pub fn hex_to_linear(rgb: u32) -> Vec3 {
    let channel = |shift: u32| ((rgb >> shift) & 0xff) as f32 / 255.0;
    srgb_to_linear(Vec3::new(channel(16), channel(8), channel(0)))
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct Uniforms {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    /// xyz toward the sun, w intensity.
    sun_dir: [f32; 4],
    fill_dir: [f32; 4],
    fill_color: [f32; 4],
    sky_color: [f32; 4],
    /// Fog near, fog far, ambient, hemisphere.
    params: [f32; 4],
}

impl Uniforms {
    pub fn new(camera: &Camera, lighting: &Lighting) -> Self {
        let view_proj: Mat4 = camera.view_projection();
        let sun = lighting.sun_position.normalize_or_zero();
        let fill = lighting.fill_position.normalize_or_zero();

        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: camera.position().extend(1.0).to_array(),
            sun_dir: sun.extend(lighting.sun_intensity).to_array(),
            fill_dir: fill.extend(lighting.fill_intensity).to_array(),
            fill_color: hex_to_linear(lighting.fill_color).extend(1.0).to_array(),
            sky_color: hex_to_linear(lighting.sky_color).extend(1.0).to_array(),
            params: [
                lighting.fog_near,
                lighting.fog_far.max(lighting.fog_near + 1.0),
                lighting.ambient_intensity,
                lighting.hemisphere_intensity,
            ],
        }
    }
}

/// Full WGSL source of the scene shader.
pub fn scene_shader() -> String {
    format!(
        r#"struct Uniforms {{
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    sun_dir: vec4<f32>,
    fill_dir: vec4<f32>,
    fill_color: vec4<f32>,
    sky_color: vec4<f32>,
    params: vec4<f32>,
}};

@group(0) @binding(0) var<uniform> uniforms: Uniforms;

struct VertexInput {{
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
}};

struct InstanceInput {{
{instance_fields}}};

struct VertexOutput {{
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) material: vec4<f32>,
}};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {{
    let model = mat4x4<f32>(instance.model_0, instance.model_1, instance.model_2, instance.model_3);

    // Narrow the top of the mesh by the taper (cylinders into frustums and cones)
    let radial = mix(1.0, instance.material.z, clamp(vertex.position.y + 0.5, 0.0, 1.0));
    let local = vec3<f32>(vertex.position.x * radial, vertex.position.y, vertex.position.z * radial);
    let world = model * vec4<f32>(local, 1.0);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world;
    out.world_pos = world.xyz;
    out.normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.color = instance.color;
    out.material = instance.material;
    return out;
}}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {{
    let n = normalize(in.normal);
    let to_eye = uniforms.camera_pos.xyz - in.world_pos;
    let view_dir = normalize(to_eye);
    let roughness = clamp(in.material.x, 0.0, 1.0);
    let metalness = clamp(in.material.y, 0.0, 1.0);
    let sky = uniforms.sky_color.rgb;

    let sun = max(dot(n, uniforms.sun_dir.xyz), 0.0) * uniforms.sun_dir.w;
    let fill = max(dot(n, uniforms.fill_dir.xyz), 0.0) * uniforms.fill_dir.w;
    let hemisphere = mix(0.6, 1.0, n.y * 0.5 + 0.5) * uniforms.params.w;
    let ambient = uniforms.params.z;

    let half_dir = normalize(uniforms.sun_dir.xyz + view_dir);
    let shininess = mix(64.0, 4.0, roughness);
    let highlight = pow(max(dot(n, half_dir), 0.0), shininess) * (1.0 - roughness) * uniforms.sun_dir.w;
    let specular = mix(vec3<f32>(0.04), in.color.rgb, metalness) * highlight;

    let diffuse = in.color.rgb * (1.0 - 0.5 * metalness);
    let light = vec3<f32>(sun) + uniforms.fill_color.rgb * fill + sky * (ambient + hemisphere);
    let lit = diffuse * light + specular;

    let fog = clamp(
        (length(to_eye) - uniforms.params.x) / (uniforms.params.y - uniforms.params.x),
        0.0,
        1.0,
    );
    return vec4<f32>(mix(lit, sky, fog), in.color.a);
}}
"#,
        instance_fields = Instance::WGSL_FIELDS,
    )
}
