//! Pointer hit-testing against the part registry.
//!
//! Every frame the scheduler turns the pointer into a world-space [`Ray`]
//! and asks two questions of the registry:
//!
//! - [`query_hover`]: which *visible* part is nearest along the ray? That
//!   part is the explosion target.
//! - [`parts_under_pointer`]: which parts does the ray pass through at all,
//!   hidden or not? A part that is already exploded is hidden, yet the
//!   pointer resting over where it stood must keep it exploded.
//!
//! Parts are tested by their axis-aligned bounding extent. Both queries are
//! pure and O(parts).

use glam::{Vec2, Vec3};

use crate::camera::Camera;
use crate::part::{Part, PartId};

/// A half-line in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray, normalizing the direction.
    ///
    /// Returns `None` for a zero-length or non-finite direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        if !origin.is_finite() {
            return None;
        }
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box spanning `center ± half_extents`.
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Full edge lengths.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Whether `point` lies inside or on the boundary.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Distance along `ray` to the first point inside the box (slab test).
    ///
    /// A ray starting inside the box hits at distance 0.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let mut t_near = 0.0_f32;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let dir = ray.direction[axis];
            let min = self.min[axis];
            let max = self.max[axis];

            if dir.abs() < 1e-8 {
                // Parallel to this slab: must already be between the planes
                if origin < min || origin > max {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut t0 = (min - origin) * inv;
            let mut t1 = (max - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }

        Some(t_near)
    }
}

/// A part struck by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub part: PartId,
    pub distance: f32,
}

/// Nearest visible part struck by `ray`, if any.
pub fn query_hover_ray(ray: &Ray, parts: &[Part]) -> Option<PartId> {
    parts
        .iter()
        .filter(|part| part.is_visible())
        .filter_map(|part| {
            part.bounds()
                .intersect(ray)
                .map(|distance| Hit { part: part.id(), distance })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
        .map(|hit| hit.part)
}

/// Nearest visible part under the pointer.
///
/// Casts a ray from `camera` through `pointer_ndc` (x right, y up, both in
/// `[-1, 1]`). Returns `None` when nothing visible is struck or the camera
/// cannot produce a ray.
pub fn query_hover(pointer_ndc: Vec2, camera: &Camera, parts: &[Part]) -> Option<PartId> {
    let ray = camera.ray_from_ndc(pointer_ndc)?;
    query_hover_ray(&ray, parts)
}

/// Every part struck by `ray` regardless of visibility, nearest first.
pub fn parts_under_pointer(ray: &Ray, parts: &[Part]) -> Vec<Hit> {
    let mut hits: Vec<Hit> = parts
        .iter()
        .filter_map(|part| {
            part.bounds()
                .intersect(ray)
                .map(|distance| Hit { part: part.id(), distance })
        })
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}
