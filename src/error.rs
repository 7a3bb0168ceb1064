//! Error types for the viewer.
//!
//! The simulation core is infallible; only GPU setup, window creation and
//! asset loading can fail.

use thiserror::Error;

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found; a Vulkan, Metal, DX12 or WebGPU capable GPU is required")]
    NoAdapter,
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats for this adapter")]
    UnsupportedSurface,
}

/// Errors that can occur while loading a texture.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),
    #[error("image has no pixels")]
    Empty,
}

/// Errors that can occur when running the viewer.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    #[error("scene has no parts; use .with_parts() to add some")]
    NoParts,
}
