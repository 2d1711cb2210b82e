//! # Voxel Sandbox Application Entry Point
//!
//! This is the main entry point of the voxel sandbox.
//! It simply calls into the library's `run()` function to initialize and start the engine.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

fn main() {
    if let Err(err) = voxel_sandbox::run() {
        log::error!("{}", err);
        eprintln!("voxel-sandbox: {err}");
        std::process::exit(1);
    }
}
