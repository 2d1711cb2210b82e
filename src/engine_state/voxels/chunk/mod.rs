//! # Chunk Module
//!
//! This module provides the `Chunk` struct for managing 16x16x16 blocks of voxel data
//! together with the two vertex buffers holding the chunk's current mesh.
//!
//! ## Storage
//!
//! Blocks live in one flat boxed array indexed `y * CHUNK_PLANE_SIZE + z * CHUNK_DIMENSION + x`,
//! so a horizontal layer is contiguous. Chunks are pooled: when streaming evicts a chunk its
//! storage is regenerated in place for the new position instead of being reallocated.

use cgmath::Point3;

use super::block::Block;
use crate::engine_state::rendering::vertex::VertexBuffer;

pub mod chunk_generation;
pub mod chunk_hashlist;

/// The dimension (width, height, depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of blocks in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_SIZE: i32 = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;

/// Represents a 16x16x16 collection of voxel blocks and its mesh.
///
/// A chunk does not know its own position; the hash-list bucket that owns it does.
/// The mesh is only valid between remeshes: any edit to the chunk or to a
/// face-adjacent block in a neighbor sets `needs_remesh`.
#[derive(Debug)]
pub struct Chunk {
    /// Block storage, `CHUNK_SIZE` entries.
    blocks: Box<[Block]>,
    /// Faces of opaque blocks.
    pub opaque_mesh: VertexBuffer,
    /// Faces of transparent blocks (glass and friends).
    pub transparent_mesh: VertexBuffer,
    /// Set when the mesh no longer matches the block and light data.
    pub needs_remesh: bool,
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks are dark air).
    pub fn new() -> Self {
        Self::filled(Block::default())
    }

    /// Creates a chunk with every block set to `block`.
    pub fn filled(block: Block) -> Self {
        Chunk {
            blocks: vec![block; CHUNK_SIZE as usize].into_boxed_slice(),
            opaque_mesh: VertexBuffer::new(),
            transparent_mesh: VertexBuffer::new(),
            needs_remesh: true,
        }
    }

    /// Index of a chunk-local coordinate in the flat block array.
    ///
    /// # Panics
    /// Panics if any coordinate is outside `0..CHUNK_DIMENSION`.
    pub fn block_index(cx: usize, cy: usize, cz: usize) -> usize {
        let dimension = CHUNK_DIMENSION as usize;
        assert!(
            cx < dimension && cy < dimension && cz < dimension,
            "chunk-local coordinate ({cx}, {cy}, {cz}) out of range"
        );
        cy * CHUNK_PLANE_SIZE as usize + cz * dimension + cx
    }

    /// Gets a reference to the block at the specified chunk-relative coordinates.
    pub fn get_block_at(&self, cx: usize, cy: usize, cz: usize) -> &Block {
        &self.blocks[Self::block_index(cx, cy, cz)]
    }

    /// Gets a mutable reference to the block at the specified chunk-relative coordinates.
    pub fn get_block_at_mut(&mut self, cx: usize, cy: usize, cz: usize) -> &mut Block {
        &mut self.blocks[Self::block_index(cx, cy, cz)]
    }

    /// Replaces the block at the specified chunk-relative coordinates.
    pub fn set_block_at(&mut self, cx: usize, cy: usize, cz: usize, block: Block) {
        *self.get_block_at_mut(cx, cy, cz) = block;
    }

    /// Gets the block at a chunk-local point.
    pub fn block(&self, local: Point3<usize>) -> &Block {
        self.get_block_at(local.x, local.y, local.z)
    }

    /// All blocks in storage order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Overwrites every block, used when a pooled chunk is recycled.
    pub fn fill(&mut self, block: Block) {
        self.blocks.fill(block);
    }

    /// Chunk-local coordinate of a flat block index.
    pub fn local_position_of_index(index: usize) -> Point3<usize> {
        let dimension = CHUNK_DIMENSION as usize;
        Point3::new(
            index % dimension,
            index / CHUNK_PLANE_SIZE as usize,
            (index / dimension) % dimension,
        )
    }
}

/// Chunk coordinate containing a world block coordinate (floor division by 16).
pub fn chunk_position_of(block: Point3<i32>) -> Point3<i32> {
    Point3::new(
        block.x.div_euclid(CHUNK_DIMENSION),
        block.y.div_euclid(CHUNK_DIMENSION),
        block.z.div_euclid(CHUNK_DIMENSION),
    )
}

/// Chunk-local coordinate of a world block coordinate.
pub fn local_position_of(block: Point3<i32>) -> Point3<usize> {
    Point3::new(
        block.x.rem_euclid(CHUNK_DIMENSION) as usize,
        block.y.rem_euclid(CHUNK_DIMENSION) as usize,
        block.z.rem_euclid(CHUNK_DIMENSION) as usize,
    )
}

/// World coordinate of a chunk's local origin block.
pub fn chunk_origin(chunk: Point3<i32>) -> Point3<i32> {
    Point3::new(
        chunk.x * CHUNK_DIMENSION,
        chunk.y * CHUNK_DIMENSION,
        chunk.z * CHUNK_DIMENSION,
    )
}

/// Largest per-axis distance between two chunk coordinates.
pub fn chebyshev_distance(a: Point3<i32>, b: Point3<i32>) -> i32 {
    (a.x - b.x)
        .abs()
        .max((a.y - b.y).abs())
        .max((a.z - b.z).abs())
}
