//! # Camera State Management
//!
//! This module keeps the first-person camera in step with the player entity and owns
//! the projection used by renderer back-ends.
//!
//! ## Core Components
//! - `Camera`: eye position plus yaw and pitch
//! - `Projection`: perspective projection, resized with the window
//! - `CameraUniform`: GPU representation of camera data for shaders

use cgmath::{Deg, Point3};

use camera::{Camera, CameraUniform, Projection, FIELD_OF_VIEW, Z_FAR, Z_NEAR};

pub mod camera;

/// Manages the camera, its projection and the packed shader uniform.
#[derive(Debug)]
pub struct CameraState {
    /// The current camera position and orientation
    pub camera: Camera,
    /// Perspective projection for the current viewport
    pub projection: Projection,
    /// GPU-optimized camera data for shaders
    pub camera_uniform: CameraUniform,
}

impl CameraState {
    /// Creates a camera at `position` looking down negative Z.
    pub fn new(position: Point3<f32>, width: u32, height: u32) -> Self {
        let camera = Camera::new(position, Deg(0.0), Deg(0.0));
        let projection = Projection::new(width, height, FIELD_OF_VIEW, Z_NEAR, Z_FAR);
        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj_and_pos(&camera, &projection);
        CameraState {
            camera,
            projection,
            camera_uniform,
        }
    }

    /// Moves the camera to an eye position and head rotation, refreshing the uniform.
    ///
    /// # Arguments
    /// * `eye` - World-space eye position
    /// * `head_rotation` - `[pitch, yaw]` in degrees
    pub fn follow(&mut self, eye: Point3<f32>, head_rotation: [f32; 2]) {
        self.camera.position = eye;
        self.camera.pitch = Deg(head_rotation[0]);
        self.camera.yaw = Deg(head_rotation[1]);
        self.camera_uniform
            .update_view_proj_and_pos(&self.camera, &self.projection);
    }

    /// Resizes the projection to a new viewport.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
        self.camera_uniform
            .update_view_proj_and_pos(&self.camera, &self.projection);
    }
}
