//! # World Module
//!
//! This module provides the `World` struct which owns every loaded chunk in the voxel world.
//! It serves as the central coordinator for block access across chunk boundaries, remesh
//! bookkeeping and, together with the streaming module, chunk loading and recycling.
//!
//! ## Storage
//!
//! Chunks live in a [`ChunkHashList`] keyed by chunk coordinate. Iteration follows
//! insertion order, which is also the order chunks are drawn and scanned for eviction.
//!
//! ## Remeshing
//!
//! Edits and light changes only set a chunk's `needs_remesh` flag. [`World::remesh_dirty`]
//! rebuilds every flagged mesh in one pass.

use cgmath::Point3;
use log::trace;

use super::block::{block_side::BlockSide, Block, MAX_LIGHT};
use super::chunk::{
    chunk_generation::TerrainGenerator, chunk_hashlist::ChunkHashList, chunk_position_of,
    local_position_of, Chunk,
};
use crate::engine_state::rendering::meshing::{ChunkMesher, ChunkNeighbors};

/// Represents a voxel world composed of multiple chunks.
///
/// Only chunks within the streaming radius of the player are kept in memory; block
/// lookups outside them return `None`.
#[derive(Debug)]
pub struct World {
    /// Loaded chunks by chunk coordinate, in load order.
    pub(crate) chunks: ChunkHashList<Box<Chunk>>,
    /// Fills newly loaded chunks.
    pub(crate) generator: TerrainGenerator,
    /// Light level of generated transparent blocks and the floor darkening stops at.
    pub(crate) ambient_light: u8,
    mesher: ChunkMesher,
}

impl World {
    /// Creates a new, empty world.
    ///
    /// # Arguments
    /// * `generator` - Terrain for chunks loaded later
    /// * `ambient_light` - Light floor of transparent blocks, clamped to `MAX_LIGHT`
    pub fn new(generator: TerrainGenerator, ambient_light: u8) -> Self {
        World {
            chunks: ChunkHashList::new(),
            generator,
            ambient_light: ambient_light.min(MAX_LIGHT),
            mesher: ChunkMesher::new(),
        }
    }

    /// The lowest light level a transparent block holds.
    pub fn ambient_light(&self) -> u8 {
        self.ambient_light
    }

    /// Number of loaded chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Whether a chunk is loaded at chunk coordinate `position`.
    pub fn is_loaded(&self, position: Point3<i32>) -> bool {
        self.chunks.contains(position)
    }

    /// Retrieves the chunk at the specified chunk coordinates.
    pub fn get_chunk_at(&self, position: Point3<i32>) -> Option<&Chunk> {
        self.chunks.get_checked(position).map(|chunk| &**chunk)
    }

    /// Mutable variant of [`World::get_chunk_at`].
    pub fn get_chunk_at_mut(&mut self, position: Point3<i32>) -> Option<&mut Chunk> {
        self.chunks.get_checked_mut(position).map(|chunk| &mut **chunk)
    }

    /// Loaded chunks with their coordinates, in load order.
    pub fn chunks(&self) -> impl Iterator<Item = (Point3<i32>, &Chunk)> + '_ {
        self.chunks.iter().map(|(position, chunk)| (position, &**chunk))
    }

    /// Generates a fresh chunk at `position` and inserts it, marking it and its
    /// loaded neighbors for remeshing.
    ///
    /// Does nothing if the chunk is already loaded. Lighting is not propagated.
    pub fn add_chunk_at(&mut self, position: Point3<i32>) {
        if self.is_loaded(position) {
            return;
        }
        let chunk = Box::new(Chunk::new());
        self.place_chunk(position, chunk);
    }

    /// Generates `chunk` for `position` and inserts it.
    pub(crate) fn place_chunk(&mut self, position: Point3<i32>, mut chunk: Box<Chunk>) {
        self.generator
            .generate(&mut chunk, position, self.ambient_light);
        self.chunks.insert(position, chunk);
        self.mark_chunk_and_neighbors_dirty(position);
    }

    /// The block at world coordinate `position`, or `None` if its chunk is not loaded.
    pub fn get_block(&self, position: Point3<i32>) -> Option<Block> {
        let chunk = self.get_chunk_at(chunk_position_of(position))?;
        Some(*chunk.block(local_position_of(position)))
    }

    /// Mutable access to the block at world coordinate `position`.
    ///
    /// Does not mark anything for remeshing.
    pub fn get_block_mut(&mut self, position: Point3<i32>) -> Option<&mut Block> {
        let local = local_position_of(position);
        let chunk = self.get_chunk_at_mut(chunk_position_of(position))?;
        Some(chunk.get_block_at_mut(local.x, local.y, local.z))
    }

    /// Whether the block at `position` is loaded and not air.
    pub fn is_solid(&self, position: Point3<i32>) -> bool {
        self.get_block(position).is_some_and(|block| !block.is_air())
    }

    /// Flags one chunk for remeshing if it is loaded.
    pub fn mark_dirty(&mut self, position: Point3<i32>) {
        if let Some(chunk) = self.get_chunk_at_mut(position) {
            chunk.needs_remesh = true;
        }
    }

    /// Flags a chunk and its six face neighbors for remeshing.
    pub fn mark_chunk_and_neighbors_dirty(&mut self, position: Point3<i32>) {
        self.mark_dirty(position);
        for side in BlockSide::all() {
            self.mark_dirty(position + side.normal());
        }
    }

    /// Flags every loaded chunk intersecting the inclusive world block box `min..=max`.
    pub fn mark_region_dirty(&mut self, min: Point3<i32>, max: Point3<i32>) {
        let min = chunk_position_of(min);
        let max = chunk_position_of(max);
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    self.mark_dirty(Point3::new(x, y, z));
                }
            }
        }
    }

    /// Coordinates of chunks waiting for a remesh, in load order.
    pub fn dirty_chunks(&self) -> Vec<Point3<i32>> {
        self.chunks
            .iter()
            .filter(|(_, chunk)| chunk.needs_remesh)
            .map(|(position, _)| position)
            .collect()
    }

    /// Rebuilds the mesh of the chunk at `position` from its blocks and loaded neighbors.
    ///
    /// Returns `false` if the chunk is not loaded.
    pub fn remesh_chunk(&mut self, position: Point3<i32>) -> bool {
        let (mut opaque, mut transparent) = match self.get_chunk_at_mut(position) {
            Some(chunk) => (
                std::mem::take(&mut chunk.opaque_mesh),
                std::mem::take(&mut chunk.transparent_mesh),
            ),
            None => return false,
        };

        if let Some(center) = self.get_chunk_at(position) {
            let neighbors: ChunkNeighbors<'_> =
                BlockSide::all().map(|side| self.get_chunk_at(position + side.normal()));
            self.mesher
                .mesh(center, &neighbors, &mut opaque, &mut transparent);
        }

        match self.get_chunk_at_mut(position) {
            Some(chunk) => {
                chunk.opaque_mesh = opaque;
                chunk.transparent_mesh = transparent;
                chunk.needs_remesh = false;
                true
            }
            None => false,
        }
    }

    /// Remeshes every flagged chunk, returning how many were rebuilt.
    pub fn remesh_dirty(&mut self) -> usize {
        let dirty = self.dirty_chunks();
        for position in &dirty {
            self.remesh_chunk(*position);
        }
        if !dirty.is_empty() {
            trace!("Remeshed {} chunks", dirty.len());
        }
        dirty.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::engine_state::voxels::block::block_type::BlockType;

    fn flat_world() -> World {
        World::new(
            TerrainGenerator::from_config(&GeneratorConfig::Flat { depth: 4 }),
            15,
        )
    }

    #[test]
    fn blocks_are_addressed_across_chunks() {
        let mut world = flat_world();
        world.add_chunk_at(Point3::new(0, 0, 0));
        world.add_chunk_at(Point3::new(-1, 0, 0));

        assert!(world.is_solid(Point3::new(0, 0, 0)));
        assert!(world.is_solid(Point3::new(-1, 3, 5)));
        assert!(!world.is_solid(Point3::new(-1, 4, 5)));
        assert_eq!(world.get_block(Point3::new(-17, 0, 0)), None);
        assert_eq!(world.get_block(Point3::new(0, 0, 16)), None);

        *world
            .get_block_mut(Point3::new(-16, 8, 15))
            .expect("loaded") = Block::new(BlockType::BRICK);
        let chunk = world.get_chunk_at(Point3::new(-1, 0, 0)).expect("loaded");
        assert_eq!(chunk.get_block_at(0, 8, 15).block_type, BlockType::BRICK as u8);
    }

    #[test]
    fn remesh_stitches_across_chunk_boundaries() {
        let mut world = flat_world();
        world.add_chunk_at(Point3::new(0, 0, 0));
        assert_eq!(world.remesh_dirty(), 1);
        // Alone, only the grass tops are exposed: 256 faces.
        let alone = world.get_chunk_at(Point3::new(0, 0, 0)).expect("loaded");
        assert_eq!(alone.opaque_mesh.len(), 256 * 6);

        // The neighbor's arrival flags the first chunk again; the shared wall stays hidden.
        world.add_chunk_at(Point3::new(1, 0, 0));
        assert_eq!(world.dirty_chunks().len(), 2);
        assert_eq!(world.remesh_dirty(), 2);
        for (_, chunk) in world.chunks() {
            assert_eq!(chunk.opaque_mesh.len(), 256 * 6);
            assert!(!chunk.needs_remesh);
        }
    }

    #[test]
    fn region_marks_every_intersecting_chunk() {
        let mut world = flat_world();
        for x in -1..=1 {
            world.add_chunk_at(Point3::new(x, 0, 0));
        }
        world.remesh_dirty();
        world.mark_region_dirty(Point3::new(-1, 2, 2), Point3::new(0, 3, 3));
        assert_eq!(
            world.dirty_chunks(),
            vec![Point3::new(-1, 0, 0), Point3::new(0, 0, 0)]
        );
    }
}
