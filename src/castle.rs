//! Procedural grand castle.
//!
//! Lays out every interactive piece of the castle as a [`PartDesc`]: a wide
//! base platform, the central keep and its roof, three rings of towers, a
//! circle of wall segments topped with battlements, the entrance with its
//! bridge, and three towers floating above the outer ring.
//!
//! Round pieces get the bounding box of their bottom (widest) radius. Wall
//! segments are turned to follow the circle, so their bounding box is that
//! of the turned block.

use glam::Vec3;
use log::info;
use std::f32::consts::{PI, TAU};

use crate::part::{Appearance, PartDesc, PartShape};
use crate::spawn::SpawnContext;

/// Height of the base platform; everything else stands on it.
pub const BASE_HEIGHT: f32 = 8.0;

const WALL_RADIUS: f32 = 30.0;
const WALL_SEGMENTS: usize = 16;
const WALL_HEIGHT: f32 = 20.0;
const WALL_THICKNESS: f32 = 3.0;

struct TowerRing {
    count: usize,
    distance: f32,
    radius: f32,
    height: f32,
}

const TOWER_RINGS: [TowerRing; 3] = [
    TowerRing { count: 8, distance: 25.0, radius: 4.0, height: 45.0 },
    TowerRing { count: 12, distance: 40.0, radius: 3.0, height: 35.0 },
    TowerRing { count: 16, distance: 55.0, radius: 2.5, height: 25.0 },
];

/// Materials used across the castle.
#[derive(Debug, Clone, PartialEq)]
pub struct CastleStyle {
    pub stone: Appearance,
    pub roof: Appearance,
}

impl Default for CastleStyle {
    fn default() -> Self {
        Self {
            stone: Appearance::from_hex(0xc8c8c8, 0.8, 0.1),
            roof: Appearance::from_hex(0x2d3748, 0.6, 0.3),
        }
    }
}

/// Build the castle. Roof heights and floating tower heights are drawn from
/// `ctx`, so the same seed gives the same castle.
pub fn grand_castle(ctx: &mut SpawnContext, style: &CastleStyle) -> Vec<PartDesc> {
    let mut parts = Vec::new();

    // Base platform, keep, keep roof
    parts.push(round(
        "base",
        Vec3::new(0.0, BASE_HEIGHT / 2.0, 0.0),
        35.0 * 1.3,
        1.0 / 1.3,
        BASE_HEIGHT,
        style.stone,
    ));
    let keep_height = 60.0;
    parts.push(round(
        "keep",
        Vec3::new(0.0, BASE_HEIGHT + keep_height / 2.0, 0.0),
        12.0 * 1.2,
        1.0 / 1.2,
        keep_height,
        style.stone,
    ));
    parts.push(round(
        "keep-roof",
        Vec3::new(0.0, BASE_HEIGHT + keep_height + 10.0, 0.0),
        12.0 * 1.4,
        0.0,
        20.0,
        style.roof,
    ));

    for (ring_index, ring) in TOWER_RINGS.iter().enumerate() {
        let offset = ring_index as f32 * 0.2;
        for i in 0..ring.count {
            let angle = i as f32 / ring.count as f32 * TAU + offset;
            let (x, z) = (angle.cos() * ring.distance, angle.sin() * ring.distance);

            parts.push(round(
                format!("tower-{}-{}", ring_index, i),
                Vec3::new(x, BASE_HEIGHT + ring.height / 2.0, z),
                ring.radius * 1.3,
                1.0 / 1.3,
                ring.height,
                style.stone,
            ));

            let roof_height = ctx.random_range(8.0, 14.0);
            parts.push(round(
                format!("tower-roof-{}-{}", ring_index, i),
                Vec3::new(x, BASE_HEIGHT + ring.height + roof_height / 2.0, z),
                ring.radius * 1.5,
                0.0,
                roof_height,
                style.roof,
            ));
        }
    }

    let wall_length = 2.0 * WALL_RADIUS * (PI / WALL_SEGMENTS as f32).sin();
    for i in 0..WALL_SEGMENTS {
        let mid = (i as f32 + 0.5) / WALL_SEGMENTS as f32 * TAU;
        let position = Vec3::new(
            mid.cos() * WALL_RADIUS,
            BASE_HEIGHT + WALL_HEIGHT / 2.0,
            mid.sin() * WALL_RADIUS,
        );
        parts.push(turned_block(
            format!("wall-{}", i),
            position,
            Vec3::new(wall_length, WALL_HEIGHT, WALL_THICKNESS),
            -mid - PI / 2.0,
            style.stone,
        ));
    }

    // Every third slot of 96 around the wall top
    let slots = WALL_SEGMENTS * 6;
    for i in (0..slots).step_by(3) {
        let angle = i as f32 / slots as f32 * TAU;
        parts.push(PartDesc::new(
            format!("battlement-{}", i / 3),
            Vec3::new(
                angle.cos() * WALL_RADIUS,
                BASE_HEIGHT + WALL_HEIGHT + 2.0,
                angle.sin() * WALL_RADIUS,
            ),
            Vec3::new(1.0, 2.0, 1.0),
            style.stone,
        ));
    }

    // Arch stands on the platform at the wall line and runs inward
    let (entrance_width, entrance_height, entrance_depth) = (8.0, 15.0, 6.0);
    parts.push(PartDesc::new(
        "entrance",
        Vec3::new(
            0.0,
            BASE_HEIGHT + entrance_height / 2.0,
            -WALL_RADIUS + entrance_depth / 2.0,
        ),
        Vec3::new(entrance_width, entrance_height, entrance_depth) / 2.0,
        style.stone,
    ));
    parts.push(PartDesc::new(
        "bridge",
        Vec3::new(0.0, BASE_HEIGHT - 1.0, -WALL_RADIUS - 15.0),
        Vec3::new(6.0, 0.5, 10.0),
        style.stone,
    ));

    for i in 0..3 {
        let angle = i as f32 / 3.0 * TAU;
        let (x, z) = (angle.cos() * 70.0, angle.sin() * 70.0);
        let height = ctx.random_range(40.0, 60.0);
        let floor = BASE_HEIGHT + 30.0;

        parts.push(round(
            format!("floating-tower-{}", i),
            Vec3::new(x, floor + height / 2.0, z),
            4.0,
            0.75,
            height,
            style.stone,
        ));
        parts.push(round(
            format!("floating-roof-{}", i),
            Vec3::new(x, floor + height + 5.0, z),
            4.5,
            0.0,
            10.0,
            style.roof,
        ));
    }

    info!("castle laid out with {} parts", parts.len());
    parts
}

fn round(
    name: impl Into<String>,
    position: Vec3,
    radius: f32,
    taper: f32,
    height: f32,
    appearance: Appearance,
) -> PartDesc {
    PartDesc::new(
        name,
        position,
        Vec3::new(radius, height / 2.0, radius),
        appearance,
    )
    .with_shape(PartShape::Round {
        radius,
        taper,
        height,
    })
}

fn turned_block(
    name: impl Into<String>,
    position: Vec3,
    size: Vec3,
    yaw: f32,
    appearance: Appearance,
) -> PartDesc {
    let half = size / 2.0;
    let (sin, cos) = (yaw.sin().abs(), yaw.cos().abs());
    let half_extents = Vec3::new(
        cos * half.x + sin * half.z,
        half.y,
        sin * half.x + cos * half.z,
    );
    PartDesc::new(name, position, half_extents, appearance).with_shape(PartShape::Block { size, yaw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat3;
    use std::collections::HashSet;

    fn castle(seed: u64) -> Vec<PartDesc> {
        grand_castle(&mut SpawnContext::from_seed(seed), &CastleStyle::default())
    }

    #[test]
    fn test_part_count_and_names() {
        let parts = castle(1);
        // 3 core + 36 towers with roofs + 16 walls + 32 battlements + 2 + 3 floating pairs
        assert_eq!(parts.len(), 3 + 72 + 16 + 32 + 2 + 6);

        let names: HashSet<&str> = parts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names.len(), parts.len());
        assert!(parts.iter().all(|p| p.half_extents.min_element() > 0.0));
    }

    #[test]
    fn test_same_seed_same_castle() {
        let a = castle(4);
        let b = castle(4);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.position, y.position);
            assert_eq!(x.half_extents, y.half_extents);
        }
    }

    #[test]
    fn test_tower_roofs_sit_on_towers() {
        let parts = castle(2);
        let roofs = parts.iter().filter(|p| p.name.starts_with("tower-roof-"));
        for roof in roofs {
            let height = roof.half_extents.y * 2.0;
            assert!((8.0..14.0).contains(&height));
            let tower = parts
                .iter()
                .find(|p| p.name == roof.name.replace("tower-roof-", "tower-"))
                .unwrap();
            let tower_top = tower.position.y + tower.half_extents.y;
            let roof_bottom = roof.position.y - roof.half_extents.y;
            assert!((tower_top - roof_bottom).abs() < 1e-3);
        }
    }

    #[test]
    fn test_wall_bounds_cover_turned_block() {
        for wall in castle(3).iter().filter(|p| p.name.starts_with("wall-")) {
            let PartShape::Block { size, yaw } = wall.shape else {
                panic!("wall is not a block");
            };
            let rotation = Mat3::from_rotation_y(yaw);
            for corner in [
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(-1.0, 1.0, 1.0),
                Vec3::new(1.0, 1.0, -1.0),
                Vec3::new(-1.0, -1.0, -1.0),
            ] {
                let local = rotation * (corner * size / 2.0);
                assert!(local.abs().cmple(wall.half_extents + 1e-3).all());
            }
            assert!((wall.position.y - 18.0).abs() < 1e-5);

            // Long side runs along the ring
            let along = rotation * Vec3::X;
            let radial = Vec3::new(wall.position.x, 0.0, wall.position.z).normalize();
            assert!(along.dot(radial).abs() < 1e-4);
        }
    }

    #[test]
    fn test_entrance_faces_bridge() {
        let parts = castle(5);
        let entrance = parts.iter().find(|p| p.name == "entrance").unwrap();
        let bridge = parts.iter().find(|p| p.name == "bridge").unwrap();
        assert_eq!(entrance.position, Vec3::new(0.0, 15.5, -27.0));
        assert_eq!(bridge.position, Vec3::new(0.0, 7.0, -45.0));
    }
}
