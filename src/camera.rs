//! Orbit camera and pointer unprojection.
//!
//! The camera circles a target point at a given yaw, pitch and distance. It
//! drifts slowly around the castle on its own, and pointer drags and wheel
//! input are eased in over several frames.

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};
use std::f32::consts::{FRAC_PI_2, TAU};

use crate::spatial::Ray;

/// Keeps the camera off the poles, where the look-at basis degenerates.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Orbit camera.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Viewport width over height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Idle orbit rate in radians per second; 0 disables.
    pub auto_rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Fraction of pending orbit motion applied per update.
    pub damping: f32,
    pending_yaw: f32,
    pending_pitch: f32,
}

impl Camera {
    /// Castle overview: eye at (80, 60, 80) looking at (0, 20, 0), slowly
    /// circling once every five minutes.
    pub fn new() -> Self {
        Self {
            auto_rotate_speed: TAU / 300.0,
            min_distance: 50.0,
            max_distance: 200.0,
            ..Self::looking_at(Vec3::new(80.0, 60.0, 80.0), Vec3::new(0.0, 20.0, 0.0))
        }
    }

    /// Static camera at `eye` looking at `target`.
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(f32::EPSILON);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
        let yaw = offset.x.atan2(offset.z);

        Self {
            yaw,
            pitch,
            distance,
            target,
            fov_y: 75f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            auto_rotate_speed: 0.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            damping: 0.05,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Perspective projection with wgpu's 0..1 depth range.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update the aspect ratio from a surface size; zero sizes are ignored.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Queue an orbit by the given angles (radians); applied over the next
    /// few [`update`](Self::update)s.
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        if delta_yaw.is_finite() && delta_pitch.is_finite() {
            self.pending_yaw += delta_yaw;
            self.pending_pitch += delta_pitch;
        }
    }

    /// Scale the orbit distance; `factor < 1` moves closer.
    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
        }
    }

    /// Advance auto-rotation and eased orbit input.
    pub fn update(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.yaw += self.auto_rotate_speed * dt;
        }

        let damping = self.damping.clamp(0.0, 1.0);
        self.yaw += self.pending_yaw * damping;
        self.pitch = (self.pitch + self.pending_pitch * damping).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.pending_yaw *= 1.0 - damping;
        self.pending_pitch *= 1.0 - damping;
        self.yaw = self.yaw.rem_euclid(TAU);
    }

    /// World-space ray from the eye through a point in normalized device
    /// coordinates (x right, y up, `[-1, 1]`).
    ///
    /// Returns `None` for non-finite input or a camera whose matrices cannot
    /// be inverted (zero aspect, collapsed clip range).
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Option<Ray> {
        if !ndc.is_finite() || !(self.aspect.is_finite() && self.aspect > 0.0) {
            return None;
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return None;
        }

        let inverse = self.view_projection().inverse();
        if !inverse.is_finite() {
            return None;
        }

        let unproject = |depth: f32| {
            let clip = inverse * ndc.extend(depth).extend(1.0);
            (clip.w.abs() > f32::EPSILON).then(|| clip.xyz() / clip.w)
        };
        let near = unproject(0.0)?;
        let far = unproject(1.0)?;
        Ray::new(near, far - near)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
