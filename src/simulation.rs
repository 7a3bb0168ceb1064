//! Simulation builder and runner

use crate::camera::Camera;
use crate::config::ExplosionConfig;
use crate::error::SimulationError;
use crate::gpu::{GpuState, Lighting};
use crate::input::{Input, KeyCode};
use crate::part::PartDesc;
use crate::registry::PartRegistry;
use crate::scheduler::{FrameScheduler, Scene};
use crate::snowfall::{SnowConfig, Snowfall};
use crate::spawn::SpawnContext;
use crate::terrain::{Terrain, TerrainConfig};
use log::{debug, error, info};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

/// Radians of orbit per dragged pixel.
const ORBIT_SENSITIVITY: f32 = 0.005;
/// Distance factor per wheel line.
const ZOOM_STEP: f32 = 0.9;

/// An interactive explode/reassemble scene builder.
///
/// Use method chaining to configure, then call `.run()` to open the window.
///
/// ```ignore
/// let mut ctx = SpawnContext::from_seed(7);
/// Simulation::new()
///     .with_parts(castle::grand_castle(&mut ctx, &CastleStyle::default()))
///     .with_seed(7)
///     .run()?;
/// ```
pub struct Simulation {
    parts: Vec<PartDesc>,
    explosion: ExplosionConfig,
    snow: Option<SnowConfig>,
    terrain: Option<TerrainConfig>,
    seed: Option<u64>,
    title: String,
    camera: Camera,
    lighting: Lighting,
}

impl Simulation {
    /// Create a new simulation with default settings and no parts.
    pub fn new() -> Self {
        Self {
            parts: Vec::new(),
            explosion: ExplosionConfig::default(),
            snow: Some(SnowConfig::default()),
            terrain: Some(TerrainConfig::default()),
            seed: None,
            title: "Shatter".to_string(),
            camera: Camera::new(),
            lighting: Lighting::default(),
        }
    }

    /// Add interactive parts.
    pub fn with_parts(mut self, parts: impl IntoIterator<Item = PartDesc>) -> Self {
        self.parts.extend(parts);
        self
    }

    /// Set the explosion tuning.
    pub fn with_explosion(mut self, config: ExplosionConfig) -> Self {
        self.explosion = config;
        self
    }

    /// Seed every random draw (debris and snow) for a reproducible session.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_snowfall(mut self, config: SnowConfig) -> Self {
        self.snow = Some(config);
        self
    }

    pub fn without_snow(mut self) -> Self {
        self.snow = None;
        self
    }

    pub fn with_terrain(mut self, config: TerrainConfig) -> Self {
        self.terrain = Some(config);
        self
    }

    pub fn without_terrain(mut self) -> Self {
        self.terrain = None;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_lighting(mut self, lighting: Lighting) -> Self {
        self.lighting = lighting;
        self
    }

    fn context(&self, stream: u64) -> SpawnContext {
        match self.seed {
            Some(seed) => SpawnContext::from_seed(seed.wrapping_add(stream)),
            None => SpawnContext::from_clock(),
        }
    }

    /// Run the simulation. This blocks until the window is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no parts, or if the event loop, window
    /// or GPU cannot be created.
    pub fn run(self) -> Result<(), SimulationError> {
        if self.parts.is_empty() {
            return Err(SimulationError::NoParts);
        }

        let registry = PartRegistry::new(self.parts.iter().cloned());
        let mut scene = Scene::new(registry, self.camera.clone());
        if let Some(snow) = &self.snow {
            scene = scene.with_snowfall(Snowfall::new(snow.clone(), self.context(1)));
        }
        if let Some(terrain) = &self.terrain {
            scene = scene.with_terrain(Terrain::generate(terrain, &mut self.context(2)));
        }
        let scheduler = FrameScheduler::new(self.explosion.clone(), self.context(0));
        info!(
            "starting with {} parts, {} snowflakes",
            scene.registry.len(),
            scene.snowfall.as_ref().map_or(0, |s| s.flakes().len())
        );

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(scene, scheduler, self.title, self.lighting);
        event_loop.run_app(&mut app)?;

        match app.failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    scene: Scene,
    scheduler: FrameScheduler,
    input: Input,
    title: String,
    lighting: Lighting,
    failure: Option<SimulationError>,
}

impl App {
    fn new(scene: Scene, scheduler: FrameScheduler, title: String, lighting: Lighting) -> Self {
        Self {
            window: None,
            gpu_state: None,
            scene,
            scheduler,
            input: Input::new(),
            title,
            lighting,
            failure: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SimulationError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();
        self.input.set_window_size(size.width, size.height);
        self.scene.camera.set_aspect(size.width, size.height);

        let mut gpu_state =
            pollster::block_on(GpuState::new(window.clone(), self.scene.terrain.as_ref()))?;
        gpu_state.lighting = self.lighting.clone();

        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    fn apply_controls(&mut self, event_loop: &ActiveEventLoop) {
        if self.input.key_pressed(KeyCode::Escape) {
            event_loop.exit();
        }
        if self.input.key_pressed(KeyCode::Space) {
            let time = self.scheduler.time_mut();
            time.toggle_pause();
            debug!("paused: {}", time.is_paused());
        }

        let drag = self.input.drag_delta();
        if drag != glam::Vec2::ZERO {
            self.scene
                .camera
                .orbit(-drag.x * ORBIT_SENSITIVITY, drag.y * ORBIT_SENSITIVITY);
        }

        let scroll = self.input.scroll_delta();
        if scroll != 0.0 {
            self.scene.camera.zoom(ZOOM_STEP.powf(scroll));
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.apply_controls(event_loop);

        let report = self.scheduler.frame(&mut self.scene, self.input.pointer_ndc());
        if let Some(id) = report.exploded {
            debug!("frame {}: exploded {:?}", self.scheduler.time().frame(), id);
        }
        self.input.begin_frame();

        if let Some(gpu_state) = &mut self.gpu_state {
            match gpu_state.render(&self.scene) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    gpu_state.reconfigure()
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    error!("GPU out of memory");
                    event_loop.exit();
                }
                Err(e) => error!("render error: {:?}", e),
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.init(event_loop) {
                error!("failed to start: {}", err);
                self.failure = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
                self.scene
                    .camera
                    .set_aspect(physical_size.width, physical_size.height);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
