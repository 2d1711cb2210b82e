//! # Block Side Module
//!
//! This module defines the six faces of a voxel block. The discriminants double as
//! face ids for the mesher's vertex template, the ambient shading table, the block
//! type atlas table and the neighbor chunk cache.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The order is: [LEFT, RIGHT, BOTTOM, TOP, BACK, FRONT], i.e. -X, +X, -Y, +Y, -Z, +Z.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The left face (facing negative X)
    LEFT = 0,

    /// The right face (facing positive X)
    RIGHT = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The back face (facing negative Z)
    BACK = 4,

    /// The front face (facing positive Z)
    FRONT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in face id order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::LEFT,
            BlockSide::RIGHT,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::BACK,
            BlockSide::FRONT,
        ]
    }

    /// The axis this face is perpendicular to (0 = X, 1 = Y, 2 = Z).
    pub fn axis(self) -> usize {
        self as usize / 2
    }

    /// The direction along [`BlockSide::axis`] the face points to, either -1 or +1.
    pub fn direction(self) -> i32 {
        if self as usize % 2 == 0 {
            -1
        } else {
            1
        }
    }

    /// Unit offset from a block to the neighbor that shares this face.
    pub fn normal(self) -> Vector3<i32> {
        let mut normal = Vector3::new(0, 0, 0);
        normal[self.axis()] = self.direction();
        normal
    }
}
