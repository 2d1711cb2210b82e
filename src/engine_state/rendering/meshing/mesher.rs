use crate::engine_state::rendering::vertex::{Vertex, VertexBuffer};
use crate::engine_state::voxels::block::{block_side::BlockSide, Block, LightChannel, MAX_LIGHT};
use crate::engine_state::voxels::chunk::{Chunk, CHUNK_DIMENSION, CHUNK_SIZE};

use super::face::{face_uvs, face_vertices, FACE_AMBIENT, VERTICES_PER_FACE};

/// Up to six face-adjacent chunks, indexed by [`BlockSide`] id. `None` means unloaded.
pub type ChunkNeighbors<'a> = [Option<&'a Chunk>; 6];

/// Builds face-culled meshes for single chunks.
///
/// A face is emitted when the block on its other side is transparent. Faces on a chunk
/// boundary are resolved through the neighbor chunk on that side; when that chunk is not
/// loaded the face is skipped, so unloaded space never produces walls.
#[derive(Debug, Clone)]
pub struct ChunkMesher {
    /// Light level to brightness, `a / ((1 - a) * 3 + 1)` with `a = level / 15`.
    attenuation: [f32; MAX_LIGHT as usize + 1],
}

impl Default for ChunkMesher {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkMesher {
    /// Creates a mesher with a precomputed attenuation table.
    pub fn new() -> Self {
        let mut attenuation = [0.0; MAX_LIGHT as usize + 1];
        for (level, value) in attenuation.iter_mut().enumerate() {
            let a = level as f32 / MAX_LIGHT as f32;
            *value = a / ((1.0 - a) * 3.0 + 1.0);
        }
        ChunkMesher { attenuation }
    }

    /// The light attenuation table, one entry per level.
    pub fn attenuation(&self) -> &[f32; MAX_LIGHT as usize + 1] {
        &self.attenuation
    }

    /// Regenerates both meshes of `center` from its blocks and its neighbors.
    ///
    /// # Arguments
    /// * `center` - The chunk being meshed
    /// * `neighbors` - The chunks across each face of `center`
    /// * `opaque` - Cleared, then filled with faces of opaque blocks
    /// * `transparent` - Cleared, then filled with faces of transparent blocks
    pub fn mesh(
        &self,
        center: &Chunk,
        neighbors: &ChunkNeighbors<'_>,
        opaque: &mut VertexBuffer,
        transparent: &mut VertexBuffer,
    ) {
        opaque.clear();
        transparent.clear();

        for index in 0..CHUNK_SIZE as usize {
            let block = &center.blocks()[index];
            if block.is_air() {
                continue;
            }
            let local = Chunk::local_position_of_index(index);
            let target = if block.is_transparent() {
                &mut *transparent
            } else {
                &mut *opaque
            };

            for side in BlockSide::all() {
                let neighbor = match Self::neighbor_block(center, neighbors, local, side) {
                    Some(neighbor) => neighbor,
                    None => continue,
                };
                if !neighbor.is_transparent() {
                    continue;
                }

                let color = self.face_color(side, neighbor);
                let uvs = face_uvs(block.info().faces[side as usize]);
                let corners = face_vertices(side);
                let vertices = target.make_room(VERTICES_PER_FACE);
                for (i, vertex) in vertices.iter_mut().enumerate() {
                    *vertex = Vertex {
                        position: [
                            local.x as f32 + corners[i][0],
                            local.y as f32 + corners[i][1],
                            local.z as f32 + corners[i][2],
                        ],
                        uv: uvs[i],
                        color,
                    };
                }
            }
        }
    }

    /// The block across `side` of the block at `local`, looking into the neighbor chunk
    /// on a boundary.
    fn neighbor_block<'a>(
        center: &'a Chunk,
        neighbors: &ChunkNeighbors<'a>,
        local: cgmath::Point3<usize>,
        side: BlockSide,
    ) -> Option<&'a Block> {
        let normal = side.normal();
        let mut coords = [
            local.x as i32 + normal.x,
            local.y as i32 + normal.y,
            local.z as i32 + normal.z,
        ];
        let axis = side.axis();
        let chunk = if (0..CHUNK_DIMENSION).contains(&coords[axis]) {
            center
        } else {
            coords[axis] = coords[axis].rem_euclid(CHUNK_DIMENSION);
            neighbors[side as usize]?
        };
        Some(chunk.get_block_at(coords[0] as usize, coords[1] as usize, coords[2] as usize))
    }

    /// Vertex color of a face lit by the block in front of it.
    ///
    /// Red follows the warm channel, blue the cool channel and green the brighter of
    /// the two.
    fn face_color(&self, side: BlockSide, lit_by: &Block) -> [u8; 4] {
        let ambient = FACE_AMBIENT[side as usize];
        let warm = self.attenuation[lit_by.light(LightChannel::Warm) as usize];
        let cool = self.attenuation[lit_by.light(LightChannel::Cool) as usize];
        let scale = |value: f32| (255.0 * ambient * value) as u8;
        [scale(warm), scale(warm.max(cool)), scale(cool), 255]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    fn mesh(center: &Chunk, neighbors: &ChunkNeighbors<'_>) -> (VertexBuffer, VertexBuffer) {
        let mut opaque = VertexBuffer::new();
        let mut transparent = VertexBuffer::new();
        ChunkMesher::new().mesh(center, neighbors, &mut opaque, &mut transparent);
        (opaque, transparent)
    }

    #[test]
    fn attenuation_is_monotonic_from_zero_to_one() {
        let mesher = ChunkMesher::new();
        let table = mesher.attenuation();
        assert_eq!(table[0], 0.0);
        assert_eq!(table[15], 1.0);
        assert!(table.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn enclosed_block_emits_no_faces() {
        let stone = Chunk::filled(Block::new(BlockType::STONE));
        let neighbors = [Some(&stone); 6];
        let (opaque, transparent) = mesh(&stone, &neighbors);
        assert!(opaque.is_empty());
        assert!(transparent.is_empty());
    }

    #[test]
    fn one_open_side_emits_one_face() {
        let mut center = Chunk::filled(Block::new(BlockType::STONE));
        let stone = Chunk::filled(Block::new(BlockType::STONE));
        let neighbors = [Some(&stone); 6];
        center.set_block_at(8, 9, 8, Block::with_light(BlockType::AIR, 15));

        let (opaque, transparent) = mesh(&center, &neighbors);
        // The air cell exposes one face of each of its six neighbors.
        assert_eq!(opaque.len(), 6 * VERTICES_PER_FACE);
        assert!(transparent.is_empty());

        // The block below the hole shows its top face at full brightness.
        let top: Vec<&Vertex> = opaque
            .as_slice()
            .iter()
            .filter(|v| v.position.iter().all(|c| *c >= 8.0) && v.position[1] == 9.0)
            .filter(|v| v.position[0] <= 9.0 && v.position[2] <= 9.0)
            .collect();
        assert!(top.iter().any(|v| v.color == [255, 255, 255, 255]));
    }

    #[test]
    fn single_neighbor_face_is_exactly_six_vertices() {
        let mut center = Chunk::new();
        center.set_block_at(4, 4, 4, Block::new(BlockType::BRICK));
        center.set_block_at(3, 4, 4, Block::new(BlockType::BRICK));
        center.set_block_at(5, 4, 4, Block::new(BlockType::BRICK));
        center.set_block_at(4, 3, 4, Block::new(BlockType::BRICK));
        center.set_block_at(4, 5, 4, Block::new(BlockType::BRICK));
        center.set_block_at(4, 4, 3, Block::new(BlockType::BRICK));

        let mut alone = Chunk::new();
        alone.set_block_at(4, 4, 4, Block::new(BlockType::BRICK));
        let (opaque_alone, _) = mesh(&alone, &[None; 6]);
        assert_eq!(opaque_alone.len(), 6 * VERTICES_PER_FACE);

        // Count only the faces of the middle brick: it is open towards +Z alone.
        let (opaque, _) = mesh(&center, &[None; 6]);
        let middle_front = opaque
            .as_slice()
            .chunks(VERTICES_PER_FACE)
            .filter(|face| face.iter().all(|v| v.position[2] == 5.0))
            .filter(|face| face.iter().all(|v| (4.0..=5.0).contains(&v.position[0])))
            .filter(|face| face.iter().all(|v| (4.0..=5.0).contains(&v.position[1])))
            .count();
        assert_eq!(middle_front, 1);
    }

    #[test]
    fn missing_neighbor_chunk_hides_boundary_faces() {
        let mut center = Chunk::new();
        center.set_block_at(0, 0, 0, Block::new(BlockType::STONE));
        let air = Chunk::filled(Block::with_light(BlockType::AIR, 15));

        let (all_loaded, _) = mesh(&center, &[Some(&air); 6]);
        assert_eq!(all_loaded.len(), 6 * VERTICES_PER_FACE);

        // LEFT, BOTTOM and BACK are on the boundary; without those chunks only the three
        // interior faces remain.
        let mut neighbors: ChunkNeighbors<'_> = [Some(&air); 6];
        neighbors[BlockSide::LEFT as usize] = None;
        neighbors[BlockSide::BOTTOM as usize] = None;
        neighbors[BlockSide::BACK as usize] = None;
        let (partial, _) = mesh(&center, &neighbors);
        assert_eq!(partial.len(), 3 * VERTICES_PER_FACE);
    }

    #[test]
    fn transparent_blocks_go_to_the_transparent_buffer() {
        let mut center = Chunk::new();
        center.set_block_at(7, 7, 7, Block::new(BlockType::GLASS));
        let (opaque, transparent) = mesh(&center, &[None; 6]);
        assert!(opaque.is_empty());
        assert_eq!(transparent.len(), 6 * VERTICES_PER_FACE);
    }

    #[test]
    fn channels_map_to_color_components() {
        let mesher = ChunkMesher::new();
        let mut lit = Block::new(BlockType::AIR);
        lit.set_light(LightChannel::Warm, 15);
        let color = mesher.face_color(BlockSide::TOP, &lit);
        assert_eq!(color, [255, 255, 0, 255]);

        let dark = Block::new(BlockType::AIR);
        assert_eq!(mesher.face_color(BlockSide::LEFT, &dark), [0, 0, 0, 255]);
    }
}
