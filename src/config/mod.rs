//! # Configuration
//!
//! Engine settings, deserialized from JSON. Every field has a default so a partial file
//! (or no file at all) yields a playable setup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

mod loader;

pub use loader::{load_config, load_engine_config, ConfigError, CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH};

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Chebyshev radius, in chunks, kept loaded around the player.
    pub chunk_radius: i32,
    /// Degrees of head rotation per unit of mouse motion.
    pub mouse_sensitivity: f32,
    /// Where the player starts, in world coordinates (entity center).
    pub spawn_position: [f32; 3],
    /// Registry name of the block the secondary action places.
    pub place_block: String,
    /// PNG texture atlas, 16x16 cells.
    pub atlas_path: PathBuf,
    /// Terrain generator for newly streamed chunks.
    pub generator: GeneratorConfig,
    /// Initial level of both light channels in generated transparent blocks.
    pub ambient_light: u8,
    /// Window settings.
    pub window: WindowConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            chunk_radius: 2,
            mouse_sensitivity: 0.1,
            spawn_position: [8.0, 8.0, 8.0],
            place_block: String::from("brick"),
            atlas_path: PathBuf::from("textures/blocks.png"),
            generator: GeneratorConfig::default(),
            ambient_light: 15,
            window: WindowConfig::default(),
        }
    }
}

/// Terrain generator selection and parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratorConfig {
    /// Solid floor filling world y in `0..depth`.
    Flat {
        /// Floor thickness in blocks.
        depth: i32,
    },
    /// Perlin height-map with scattered lamps.
    Perlin {
        /// Noise seed, also mixed into lamp placement.
        seed: u32,
        /// World-to-noise coordinate scale.
        scale: f64,
        /// Mean surface height.
        base_height: f64,
        /// Surface height deviation.
        amplitude: f64,
        /// Per-column probability of a lamp on the surface.
        lamp_chance: f32,
    },
    /// Nothing but air.
    Empty,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig::Flat { depth: 4 }
    }
}

/// Window settings for the native front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title.
    pub title: String,
    /// Initial logical width.
    pub width: u32,
    /// Initial logical height.
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: String::from("Voxel Sandbox"),
            width: 640,
            height: 480,
        }
    }
}
