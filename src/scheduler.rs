//! Frame pipeline.
//!
//! One frame runs, in order:
//!
//! 1. Pointer to world ray via the camera.
//! 2. Explosion controller (hover target, releases, new burst).
//! 3. Particle animator.
//! 4. Snowfall.
//! 5. Camera auto-rotation and eased orbit.
//!
//! The render pass then reads the scene as left by step 5. A pointer that
//! cannot be turned into a ray (non-finite coordinates, degenerate camera)
//! skips step 2 for that frame only; everything else still advances. While
//! time is paused step 2 is skipped too, so no burst starts frozen.

use glam::Vec2;
use log::{debug, trace, warn};

use crate::animator::ParticleAnimator;
use crate::camera::Camera;
use crate::config::ExplosionConfig;
use crate::explosion::ExplosionController;
use crate::part::PartId;
use crate::registry::PartRegistry;
use crate::snowfall::Snowfall;
use crate::spawn::SpawnContext;
use crate::terrain::Terrain;
use crate::time::Time;

/// Everything a frame mutates and the renderer draws.
#[derive(Debug, Clone)]
pub struct Scene {
    pub registry: PartRegistry,
    pub camera: Camera,
    pub snowfall: Option<Snowfall>,
    /// Static scenery, drawn but never hit-tested.
    pub terrain: Option<Terrain>,
}

impl Scene {
    pub fn new(registry: PartRegistry, camera: Camera) -> Self {
        Self {
            registry,
            camera,
            snowfall: None,
            terrain: None,
        }
    }

    pub fn with_snowfall(mut self, snowfall: Snowfall) -> Self {
        self.snowfall = Some(snowfall);
        self
    }

    pub fn with_terrain(mut self, terrain: Terrain) -> Self {
        self.terrain = Some(terrain);
        self
    }
}

/// Summary of one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Clamped delta the frame advanced by, in seconds.
    pub delta: f32,
    /// Nearest visible part under the pointer.
    pub hover: Option<PartId>,
    pub exploded: Option<PartId>,
    /// Parts released this frame.
    pub reassembling: Vec<PartId>,
    /// Parts whose debris all arrived home this frame.
    pub restored: Vec<PartId>,
    /// Particles absorbed this frame.
    pub absorbed: usize,
    /// Particles alive after the frame.
    pub live_particles: usize,
    /// The pointer was present but unusable, so no hover pass ran.
    pub interaction_skipped: bool,
}

/// Drives the per-frame pipeline over a [`Scene`].
#[derive(Debug)]
pub struct FrameScheduler {
    time: Time,
    controller: ExplosionController,
    animator: ParticleAnimator,
    /// Consecutive frames whose pointer had no world ray.
    skipped_streak: u32,
}

impl FrameScheduler {
    pub fn new(config: ExplosionConfig, ctx: SpawnContext) -> Self {
        Self {
            time: Time::new(),
            animator: ParticleAnimator::new(config.clone()),
            controller: ExplosionController::new(config, ctx),
            skipped_streak: 0,
        }
    }

    #[inline]
    pub fn time(&self) -> &Time {
        &self.time
    }

    #[inline]
    pub fn time_mut(&mut self) -> &mut Time {
        &mut self.time
    }

    pub fn controller(&self) -> &ExplosionController {
        &self.controller
    }

    /// Frames in a row the pointer could not be projected (0 once it can).
    pub fn skipped_streak(&self) -> u32 {
        self.skipped_streak
    }

    /// Run a frame timed by the wall clock.
    ///
    /// `pointer` is the pointer in normalized device coordinates, or `None`
    /// when it is outside the render surface.
    pub fn frame(&mut self, scene: &mut Scene, pointer: Option<Vec2>) -> FrameReport {
        let dt = self.time.update();
        self.run(scene, pointer, dt)
    }

    /// Run a frame with an explicit raw delta (still paused, scaled and clamped).
    pub fn step(&mut self, scene: &mut Scene, pointer: Option<Vec2>, raw_dt: f32) -> FrameReport {
        let dt = self.time.advance(raw_dt);
        self.run(scene, pointer, dt)
    }

    fn run(&mut self, scene: &mut Scene, pointer: Option<Vec2>, dt: f32) -> FrameReport {
        let mut report = FrameReport {
            delta: dt,
            ..Default::default()
        };

        let outcome = if self.time.is_paused() {
            trace!("paused, hover pass frozen");
            None
        } else {
            match pointer.map(|ndc| (ndc, scene.camera.ray_from_ndc(ndc))) {
                Some((ndc, None)) => {
                    self.skipped_streak += 1;
                    if self.skipped_streak == 1 {
                        warn!("pointer {:?} has no world ray, skipping hover pass", ndc);
                    }
                    report.interaction_skipped = true;
                    None
                }
                usable => {
                    if self.skipped_streak > 0 {
                        debug!("pointer usable again after {} frames", self.skipped_streak);
                        self.skipped_streak = 0;
                    }
                    let ray = usable.and_then(|(_, ray)| ray);
                    Some(self.controller.update(&mut scene.registry, ray.as_ref()))
                }
            }
        };
        if let Some(outcome) = outcome {
            report.hover = outcome.target;
            report.exploded = outcome.exploded;
            report.reassembling = outcome.reassembling;
        }

        let animated = self.animator.step(&mut scene.registry, dt);
        report.restored = animated.restored;
        report.absorbed = animated.absorbed;

        if let Some(snow) = scene.snowfall.as_mut() {
            snow.update(dt);
        }
        scene.camera.update(dt);

        report.live_particles = scene.registry.live_particles();
        report
    }
}
