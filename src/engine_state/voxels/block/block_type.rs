//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world and the static
//! registry of their properties: atlas cells per face, transparency and light emission.

use num_derive::FromPrimitive;
use phf::phf_map;

use super::{BlockTypeSize, LightChannel};

/// Enumerates all possible block types in the voxel world.
///
/// The discriminant is the id stored in [`super::Block::block_type`] and indexes
/// [`BLOCK_TYPES`]. Id 0 is air, the universal empty sentinel.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Transparent and never meshed.
    AIR,
    /// Indestructible-looking floor layer of generated worlds.
    BEDROCK,
    /// Plain stone.
    STONE,
    /// Dirt, the bulk of generated terrain.
    DIRT,
    /// Dirt with a grass top.
    GRASS,
    /// Tree trunk with ring tops.
    LOG,
    /// Clear glass.
    GLASS,
    /// Red tinted glass.
    RED_GLASS,
    /// Green tinted glass.
    GREEN_GLASS,
    /// Blue tinted glass.
    BLUE_GLASS,
    /// Brick, the default block placed by the player.
    BRICK,
    /// Opaque emitter on the warm light channel.
    WARM_LAMP,
    /// Opaque emitter on the cool light channel.
    COOL_LAMP,
}

/// Immutable properties of a block type.
#[derive(Debug)]
pub struct BlockTypeInfo {
    /// Lowercase name, also the key of [`BLOCK_TYPES_BY_NAME`].
    pub name: &'static str,
    /// Whether light passes through and neighbors' faces are exposed.
    pub transparent: bool,
    /// Atlas cell (column, row) for each face, indexed by `BlockSide`.
    pub faces: [[u8; 2]; 6],
    /// Light channel this block emits at full strength, if any.
    pub emits: Option<LightChannel>,
}

const fn uniform(cell: [u8; 2]) -> [[u8; 2]; 6] {
    [cell, cell, cell, cell, cell, cell]
}

/// Number of registered block types.
pub const BLOCK_TYPE_COUNT: usize = 13;

/// The block type registry, indexed by block type id.
pub static BLOCK_TYPES: [BlockTypeInfo; BLOCK_TYPE_COUNT] = [
    BlockTypeInfo { name: "air", transparent: true, faces: uniform([0, 0]), emits: None },
    BlockTypeInfo { name: "bedrock", transparent: false, faces: uniform([0, 0]), emits: None },
    BlockTypeInfo { name: "stone", transparent: false, faces: uniform([1, 0]), emits: None },
    BlockTypeInfo { name: "dirt", transparent: false, faces: uniform([0, 3]), emits: None },
    BlockTypeInfo {
        name: "grass",
        transparent: false,
        faces: [[0, 2], [0, 2], [0, 3], [0, 1], [0, 2], [0, 2]],
        emits: None,
    },
    BlockTypeInfo {
        name: "log",
        transparent: false,
        faces: [[1, 3], [1, 3], [1, 2], [1, 2], [1, 3], [1, 3]],
        emits: None,
    },
    BlockTypeInfo { name: "glass", transparent: true, faces: uniform([8, 0]), emits: None },
    BlockTypeInfo { name: "red_glass", transparent: true, faces: uniform([8, 1]), emits: None },
    BlockTypeInfo { name: "green_glass", transparent: true, faces: uniform([8, 2]), emits: None },
    BlockTypeInfo { name: "blue_glass", transparent: true, faces: uniform([8, 3]), emits: None },
    BlockTypeInfo { name: "brick", transparent: false, faces: uniform([10, 0]), emits: None },
    BlockTypeInfo {
        name: "warm_lamp",
        transparent: false,
        faces: uniform([9, 0]),
        emits: Some(LightChannel::Warm),
    },
    BlockTypeInfo {
        name: "cool_lamp",
        transparent: false,
        faces: uniform([9, 1]),
        emits: Some(LightChannel::Cool),
    },
];

/// Compile-time lookup from block name to block type.
pub static BLOCK_TYPES_BY_NAME: phf::Map<&'static str, BlockType> = phf_map! {
    "air" => BlockType::AIR,
    "bedrock" => BlockType::BEDROCK,
    "stone" => BlockType::STONE,
    "dirt" => BlockType::DIRT,
    "grass" => BlockType::GRASS,
    "log" => BlockType::LOG,
    "glass" => BlockType::GLASS,
    "red_glass" => BlockType::RED_GLASS,
    "green_glass" => BlockType::GREEN_GLASS,
    "blue_glass" => BlockType::BLUE_GLASS,
    "brick" => BlockType::BRICK,
    "warm_lamp" => BlockType::WARM_LAMP,
    "cool_lamp" => BlockType::COOL_LAMP,
};

impl BlockType {
    /// Converts a stored id back to a `BlockType`.
    ///
    /// # Returns
    /// `None` if the id is not registered.
    pub fn from_id(id: BlockTypeSize) -> Option<Self> {
        num::FromPrimitive::from_u8(id)
    }

    /// Looks a block type up by its registry name.
    pub fn from_name(name: &str) -> Option<Self> {
        BLOCK_TYPES_BY_NAME.get(name).copied()
    }

    /// The static properties of this block type.
    pub fn info(self) -> &'static BlockTypeInfo {
        &BLOCK_TYPES[self as usize]
    }

    /// Whether this block type lets light and visibility through.
    pub fn is_transparent(self) -> bool {
        self.info().transparent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_and_name_map_agree() {
        for (id, info) in BLOCK_TYPES.iter().enumerate() {
            let by_id = BlockType::from_id(id as BlockTypeSize).expect("registered id");
            assert_eq!(BlockType::from_name(info.name), Some(by_id));
            assert_eq!(by_id.info().name, info.name);
        }
        assert_eq!(BLOCK_TYPES_BY_NAME.len(), BLOCK_TYPE_COUNT);
        assert_eq!(BlockType::from_id(BLOCK_TYPE_COUNT as BlockTypeSize), None);
        assert_eq!(BlockType::from_name("obsidian"), None);
    }

    #[test]
    fn air_is_the_transparent_zero_id() {
        assert_eq!(BlockType::AIR as usize, 0);
        assert!(BlockType::AIR.is_transparent());
        assert!(BlockType::GLASS.is_transparent());
        assert!(!BlockType::BRICK.is_transparent());
    }

    #[test]
    fn lamps_emit_on_their_own_channel() {
        assert_eq!(BlockType::WARM_LAMP.info().emits, Some(LightChannel::Warm));
        assert_eq!(BlockType::COOL_LAMP.info().emits, Some(LightChannel::Cool));
        assert!(!BlockType::WARM_LAMP.is_transparent());
        assert_eq!(BlockType::STONE.info().emits, None);
    }
}
