//! # Chunk Generation Module
//!
//! Procedural fill of a chunk for a given chunk coordinate. Generation always writes
//! every block, so a recycled chunk carries nothing over from its previous position.
//!
//! ## Lighting
//!
//! Transparent blocks start with both channels at the configured ambient level and
//! opaque blocks start dark. Emitters are not propagated here; the light propagator
//! seeds them once the chunk is in the world.

use cgmath::Point3;
use noise::NoiseFn;
use noise::Perlin;

use crate::config::GeneratorConfig;
use crate::engine_state::voxels::block::{block_type::BlockType, Block, MAX_LIGHT};

use super::{chunk_origin, Chunk, CHUNK_DIMENSION};

/// Height below the surface where dirt gives way to stone in Perlin terrain.
const DIRT_DEPTH: i32 = 3;

/// A terrain generator built from a [`GeneratorConfig`].
#[derive(Debug, Clone)]
pub enum TerrainGenerator {
    /// Floor covering world y in `0..depth`.
    Flat { depth: i32 },
    /// Noise height-map with occasional lamps on the surface.
    Perlin {
        perlin: Perlin,
        seed: u32,
        scale: f64,
        base_height: f64,
        amplitude: f64,
        lamp_chance: f32,
    },
    /// All air.
    Empty,
}

impl TerrainGenerator {
    /// Creates the generator described by `config`.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        match *config {
            GeneratorConfig::Flat { depth } => TerrainGenerator::Flat { depth },
            GeneratorConfig::Perlin {
                seed,
                scale,
                base_height,
                amplitude,
                lamp_chance,
            } => TerrainGenerator::Perlin {
                perlin: Perlin::new(seed),
                seed,
                scale,
                base_height,
                amplitude,
                lamp_chance,
            },
            GeneratorConfig::Empty => TerrainGenerator::Empty,
        }
    }

    /// Overwrites every block of `chunk` with terrain for chunk coordinate `position`.
    ///
    /// # Arguments
    /// * `chunk` - The chunk to fill, possibly recycled from another position
    /// * `position` - The chunk coordinate being generated
    /// * `ambient_light` - Initial level of both channels in transparent blocks
    pub fn generate(&self, chunk: &mut Chunk, position: Point3<i32>, ambient_light: u8) {
        let air = Block::with_light(BlockType::AIR, ambient_light.min(MAX_LIGHT));
        chunk.fill(air);
        chunk.needs_remesh = true;

        let origin = chunk_origin(position);
        match self {
            TerrainGenerator::Empty => {}
            TerrainGenerator::Flat { depth } => {
                for cy in 0..CHUNK_DIMENSION {
                    let block_type = match Self::flat_layer(origin.y + cy, *depth) {
                        Some(block_type) => block_type,
                        None => continue,
                    };
                    for cz in 0..CHUNK_DIMENSION {
                        for cx in 0..CHUNK_DIMENSION {
                            chunk.set_block_at(
                                cx as usize,
                                cy as usize,
                                cz as usize,
                                Self::initial_block(block_type, ambient_light),
                            );
                        }
                    }
                }
            }
            TerrainGenerator::Perlin {
                perlin,
                seed,
                scale,
                base_height,
                amplitude,
                lamp_chance,
            } => {
                let mut rng = fastrand::Rng::with_seed(Self::column_seed(position, *seed));
                for cz in 0..CHUNK_DIMENSION {
                    for cx in 0..CHUNK_DIMENSION {
                        let wx = origin.x + cx;
                        let wz = origin.z + cz;
                        let sample = perlin.get([wx as f64 * scale, wz as f64 * scale]);
                        let height = (base_height + amplitude * sample).floor() as i32;
                        let place_lamp = rng.f32() < *lamp_chance;

                        for cy in 0..CHUNK_DIMENSION {
                            let wy = origin.y + cy;
                            let block_type = if wy < height - DIRT_DEPTH {
                                BlockType::STONE
                            } else if wy < height - 1 {
                                BlockType::DIRT
                            } else if wy == height - 1 {
                                BlockType::GRASS
                            } else if wy == height && place_lamp {
                                if rng.bool() {
                                    BlockType::WARM_LAMP
                                } else {
                                    BlockType::COOL_LAMP
                                }
                            } else {
                                continue;
                            };
                            chunk.set_block_at(
                                cx as usize,
                                cy as usize,
                                cz as usize,
                                Self::initial_block(block_type, ambient_light),
                            );
                        }
                    }
                }
            }
        }
    }

    /// Block type of the flat floor at world height `y`, or `None` for air.
    fn flat_layer(y: i32, depth: i32) -> Option<BlockType> {
        if y < 0 || y >= depth {
            None
        } else if y == 0 {
            Some(BlockType::BEDROCK)
        } else if y == depth - 1 {
            Some(BlockType::GRASS)
        } else {
            Some(BlockType::DIRT)
        }
    }

    fn initial_block(block_type: BlockType, ambient_light: u8) -> Block {
        if block_type.is_transparent() {
            Block::with_light(block_type, ambient_light.min(MAX_LIGHT))
        } else {
            Block::new(block_type)
        }
    }

    /// Deterministic per-chunk seed so lamp placement does not depend on load order.
    fn column_seed(position: Point3<i32>, seed: u32) -> u64 {
        let mut bytes = [0u8; 16];
        bytes[0..4].copy_from_slice(&position.x.to_le_bytes());
        bytes[4..8].copy_from_slice(&position.y.to_le_bytes());
        bytes[8..12].copy_from_slice(&position.z.to_le_bytes());
        bytes[12..16].copy_from_slice(&seed.to_le_bytes());
        super::chunk_hashlist::fnv_1a(&bytes) as u64
    }
}
