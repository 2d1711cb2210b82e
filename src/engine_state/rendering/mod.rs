//! Rendering system for the voxel engine.
//!
//! This module turns chunk data into vertex buffers and defines the narrow interface a
//! drawing back-end implements. [`GpuRenderer`] draws through wgpu;
//! [`FrameStatsRenderer`] only counts and stands in when no adapter is available.

mod gpu_renderer;
pub mod meshing;
mod renderer;
pub mod texture;
pub mod vertex;

// Re-export commonly used types
pub use gpu_renderer::{GpuRenderer, GpuRendererError};
pub use renderer::{FrameStats, FrameStatsRenderer, RenderPass, Renderer};
pub use vertex::{Vertex, VertexBuffer};
