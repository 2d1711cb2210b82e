//! The seam between the simulation and a drawing back-end.
//!
//! The engine walks the chunk list once per pass and hands every non-empty mesh to a
//! [`Renderer`] together with the chunk's world offset. Back-ends own all GPU state.

use cgmath::{Point3, Vector3};
use log::trace;
use web_time::{Duration, Instant};

use super::texture::AtlasImage;
use super::vertex::Vertex;
use crate::engine_state::camera_state::CameraState;

/// Which of a chunk's two meshes is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPass {
    /// Faces of opaque blocks, drawn first with depth writes.
    Opaque,
    /// Faces of transparent blocks, drawn after every opaque mesh.
    Transparent,
}

/// A drawing back-end.
pub trait Renderer {
    /// Receives the block atlas once at startup.
    fn upload_atlas(&mut self, atlas: &AtlasImage);

    /// Starts a frame seen from `camera`.
    fn begin_frame(&mut self, camera: &CameraState);

    /// Draws one chunk mesh as a triangle list translated by `offset`.
    fn draw_chunk_mesh(&mut self, offset: Vector3<f32>, vertices: &[Vertex], pass: RenderPass);

    /// Outlines the targeted block.
    fn draw_block_highlight(&mut self, block: Point3<i32>);

    /// Finishes and presents the frame.
    fn end_frame(&mut self);

    /// Follows a change of the window's size in pixels.
    fn resize(&mut self, _width: u32, _height: u32) {}
}

/// Counters gathered over one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    /// Opaque chunk meshes drawn
    pub opaque_draws: usize,
    /// Transparent chunk meshes drawn
    pub transparent_draws: usize,
    /// Total vertices submitted
    pub vertices: usize,
    /// The block outlined this frame, if any
    pub highlighted: Option<Point3<i32>>,
    /// Wall time between `begin_frame` and `end_frame`
    pub duration: Duration,
}

/// A renderer that draws nothing and logs what it was asked to draw.
///
/// Used when no GPU back-end is attached and in tests to observe draw order.
#[derive(Debug, Default)]
pub struct FrameStatsRenderer {
    /// Completed frames
    pub frames: u64,
    /// Stats of the frame in progress
    pub current: FrameStats,
    /// Stats of the last completed frame
    pub last_frame: FrameStats,
    /// Size of the uploaded atlas
    pub atlas_size: Option<(u32, u32)>,
    /// Order of passes submitted in the current frame
    pub pass_order: Vec<RenderPass>,
    frame_start: Option<Instant>,
}

impl FrameStatsRenderer {
    /// Creates a renderer with no frames recorded.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for FrameStatsRenderer {
    fn upload_atlas(&mut self, atlas: &AtlasImage) {
        self.atlas_size = Some(atlas.dimensions());
    }

    fn begin_frame(&mut self, _camera: &CameraState) {
        self.current = FrameStats::default();
        self.pass_order.clear();
        self.frame_start = Some(Instant::now());
    }

    fn draw_chunk_mesh(&mut self, _offset: Vector3<f32>, vertices: &[Vertex], pass: RenderPass) {
        match pass {
            RenderPass::Opaque => self.current.opaque_draws += 1,
            RenderPass::Transparent => self.current.transparent_draws += 1,
        }
        self.current.vertices += vertices.len();
        self.pass_order.push(pass);
    }

    fn draw_block_highlight(&mut self, block: Point3<i32>) {
        self.current.highlighted = Some(block);
    }

    fn end_frame(&mut self) {
        if let Some(start) = self.frame_start.take() {
            self.current.duration = start.elapsed();
        }
        self.frames += 1;
        self.last_frame = std::mem::take(&mut self.current);
        trace!(
            "Frame {}: {} opaque, {} transparent, {} vertices",
            self.frames,
            self.last_frame.opaque_draws,
            self.last_frame.transparent_draws,
            self.last_frame.vertices
        );
    }
}
