//! Mesh generation for voxel rendering.
//!
//! Chunks are meshed one at a time into their own pair of vertex buffers. Every exposed
//! block face becomes one quad (two triangles, six vertices), colored by the light of
//! the block in front of it and textured from the block type's atlas cell.
//!
//! # Architecture
//! - `face`: the unit-cube vertex template, directional shading and atlas UVs
//! - `mesher`: the face-culling pass over a chunk and its six neighbors

pub mod face;
mod mesher;

pub use mesher::{ChunkMesher, ChunkNeighbors};
