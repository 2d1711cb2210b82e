#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Sandbox
//!
//! A minimal first-person voxel sandbox: an infinite world of 16³ chunks streamed around
//! the player, face-culled meshes, two-channel flood-fill lighting and box physics
//! against the block grid.
//!
//! ## Key Modules
//!
//! * `application_state` - Window, event loop and input handling
//! * `config` - Engine settings loaded from JSON
//! * `engine_state` - The simulation context: world, lighting, player, meshing and rendering seam
//!
//! ## Architecture
//!
//! All simulation state lives in one [`engine_state::EngineState`] created at startup.
//! The event loop feeds it input snapshots and wall time; it runs fixed 1/20 s ticks and
//! hands chunk meshes to a [`engine_state::rendering::Renderer`]. The window draws
//! through the wgpu back-end and falls back to a counting renderer without an adapter.
//!
//! ## Usage
//!
//! ```ignore
//! fn main() {
//!     if let Err(err) = voxel_sandbox::run() {
//!         eprintln!("{err}");
//!     }
//! }
//! ```

use application_state::{ApplicationError, ApplicationState};
use engine_state::rendering::texture::AtlasImage;
use log::{info, warn};
use winit::event_loop::EventLoop;

#[allow(missing_docs)]
pub mod application_state;
#[allow(missing_docs)]
pub mod config;
pub mod engine_state;

/// Initializes logging, loads the configuration and atlas, and runs the event loop
/// until the window closes.
pub fn run() -> Result<(), ApplicationError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();
    info!("Logger initialized");

    let config = config::load_engine_config()?;

    let atlas = match AtlasImage::load(&config.atlas_path) {
        Ok(atlas) => {
            let (width, height) = atlas.dimensions();
            info!(
                "Loaded atlas {} ({}x{})",
                config.atlas_path.display(),
                width,
                height
            );
            Some(atlas)
        }
        Err(err) => {
            warn!(
                "Could not load atlas {}: {}",
                config.atlas_path.display(),
                err
            );
            None
        }
    };

    let event_loop = EventLoop::new()?;
    let mut state = ApplicationState::new(config, atlas);
    event_loop.run_app(&mut state)?;

    info!("Event loop finished");
    Ok(())
}
