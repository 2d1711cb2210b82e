//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face handling, the two light channels
//! and the per-voxel block record.

use block_type::{BlockType, BlockTypeInfo, BLOCK_TYPES};

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Highest level either light channel can hold.
pub const MAX_LIGHT: u8 = 15;

/// One of the two independently propagated light fields.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LightChannel {
    /// Channel A, rendered into the red component.
    #[default]
    Warm,
    /// Channel B, rendered into the blue component.
    Cool,
}

impl LightChannel {
    /// Both channels, in propagation order.
    pub const ALL: [LightChannel; 2] = [LightChannel::Warm, LightChannel::Cool];
}

/// Represents a single voxel block in the world.
///
/// Stores the block type id and one 0..=15 level per light channel. The actual
/// block properties are looked up from the block type registry.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute keeps the record at three bytes with no padding.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, Default, PartialEq, Eq)]
pub struct Block {
    /// The type of this block, encoded as a `BlockTypeSize` for compact storage.
    pub block_type: BlockTypeSize,
    warm_light: u8,
    cool_light: u8,
}

impl Block {
    /// Creates a new, unlit block of the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
            warm_light: 0,
            cool_light: 0,
        }
    }

    /// Creates a block of the specified type with both channels at `level`.
    pub fn with_light(block_type: BlockType, level: u8) -> Self {
        let mut block = Block::new(block_type);
        block.set_light(LightChannel::Warm, level);
        block.set_light(LightChannel::Cool, level);
        block
    }

    /// Whether this is the empty sentinel.
    pub fn is_air(&self) -> bool {
        self.block_type == BlockType::AIR as BlockTypeSize
    }

    /// The registry entry for this block's type.
    pub fn info(&self) -> &'static BlockTypeInfo {
        &BLOCK_TYPES[self.block_type as usize]
    }

    /// Whether light and visibility pass through this block.
    pub fn is_transparent(&self) -> bool {
        self.info().transparent
    }

    /// Light level of one channel.
    pub fn light(&self, channel: LightChannel) -> u8 {
        match channel {
            LightChannel::Warm => self.warm_light,
            LightChannel::Cool => self.cool_light,
        }
    }

    /// Sets the light level of one channel, saturating at [`MAX_LIGHT`].
    pub fn set_light(&mut self, channel: LightChannel, level: u8) {
        let level = level.min(MAX_LIGHT);
        match channel {
            LightChannel::Warm => self.warm_light = level,
            LightChannel::Cool => self.cool_light = level,
        }
    }

    /// Whether this block emits light on the given channel.
    pub fn emits(&self, channel: LightChannel) -> bool {
        self.info().emits == Some(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_are_independent_and_saturate() {
        let mut block = Block::new(BlockType::AIR);
        block.set_light(LightChannel::Warm, 9);
        block.set_light(LightChannel::Cool, 200);
        assert_eq!(block.light(LightChannel::Warm), 9);
        assert_eq!(block.light(LightChannel::Cool), MAX_LIGHT);
        block.set_light(LightChannel::Warm, 0);
        assert_eq!(block.light(LightChannel::Cool), MAX_LIGHT);
    }

    #[test]
    fn default_block_is_dark_air() {
        let block = Block::default();
        assert!(block.is_air());
        assert!(block.is_transparent());
        assert_eq!(block.light(LightChannel::Warm), 0);
        assert_eq!(std::mem::size_of::<Block>(), 3);
    }
}
