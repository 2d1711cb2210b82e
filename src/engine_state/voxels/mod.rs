//! # Voxel Engine Core
//!
//! This module contains the core voxel engine functionality, providing the foundation
//! for representing, manipulating and lighting a voxel-based world.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: Defines individual voxel types, their properties and light levels
//! * **Chunk**: Fixed 16x16x16 arrays of blocks, their generation and the chunk hash list
//! * **World**: Owns the loaded chunks and provides a unified interface for the voxel space
//! * **Streaming**: Loads and recycles chunks around the player, one per tick
//! * **Lighting**: Incremental two-channel light propagation
//!
//! ## Data Flow
//!
//! 1. Streaming places generated chunks into the world and seeds their light
//! 2. Edits change blocks, queue relighting and flag affected chunks
//! 3. Flagged chunks are remeshed at the end of the tick
//! 4. The renderer walks the chunk list and draws each mesh

pub mod block;
pub mod chunk;
pub mod lighting;
pub mod streaming;
pub mod world;
