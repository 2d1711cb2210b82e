//! # Entities
//!
//! An entity is an axis-aligned box that falls, collides with solid blocks and carries a
//! head rotation. Physics advances it once per fixed tick; rendering interpolates between
//! its previous and current tick positions.

use cgmath::{Basis3, Deg, InnerSpace, Point3, Rotation, Rotation3, Vector3, VectorSpace};

pub mod physics;
pub mod raycast;

/// Player box width (X and Z) in blocks.
pub const PLAYER_WIDTH: f32 = 0.6;
/// Player box height in blocks.
pub const PLAYER_HEIGHT: f32 = 1.8;
/// Eye height above the bottom of the player's box.
pub const EYE_HEIGHT: f32 = 1.62;
/// Horizontal walking speed in blocks per tick.
pub const MOVE_SPEED: f32 = 0.25;
/// Fraction of the gap to the target horizontal velocity closed each tick.
pub const MOVE_SMOOTHING: f32 = 0.3;
/// Upward velocity of a jump in blocks per tick.
pub const JUMP_VELOCITY: f32 = 0.5;
/// Pitch is kept within plus or minus this many degrees.
pub const PITCH_LIMIT: f32 = 90.0;

/// Desired movement for one tick, relative to where the entity is facing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementIntent {
    /// Positive moves forward.
    pub forward: f32,
    /// Positive moves right.
    pub strafe: f32,
    /// Jump if standing on the ground.
    pub jump: bool,
}

/// A physics-driven box in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Whether the last tick ended with the box resting on a block.
    pub on_ground: bool,
    /// Box extent along X and Z.
    pub width: f32,
    /// Box extent along Y.
    pub height: f32,
    /// Center of the box at the start of the last tick.
    pub previous_position: Point3<f32>,
    /// Center of the box now.
    pub current_position: Point3<f32>,
    /// Displacement per tick.
    pub velocity: Vector3<f32>,
    /// `[pitch, yaw]` in degrees.
    pub head_rotation: [f32; 2],
}

impl Entity {
    /// Creates a resting entity centered at `position`.
    pub fn new(position: Point3<f32>, width: f32, height: f32) -> Self {
        Entity {
            on_ground: false,
            width,
            height,
            previous_position: position,
            current_position: position,
            velocity: Vector3::new(0.0, 0.0, 0.0),
            head_rotation: [0.0, 0.0],
        }
    }

    /// Creates a player-sized entity centered at `position`.
    pub fn player(position: Point3<f32>) -> Self {
        Self::new(position, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    /// Box center between the previous and current tick, `alpha` in `[0, 1]`.
    pub fn interpolated_position(&self, alpha: f32) -> Point3<f32> {
        let from = Vector3::new(
            self.previous_position.x,
            self.previous_position.y,
            self.previous_position.z,
        );
        let to = Vector3::new(
            self.current_position.x,
            self.current_position.y,
            self.current_position.z,
        );
        let blended = from.lerp(to, alpha);
        Point3::new(blended.x, blended.y, blended.z)
    }

    /// Eye position at the interpolated position.
    pub fn eye_position(&self, alpha: f32) -> Point3<f32> {
        let center = self.interpolated_position(alpha);
        Point3::new(center.x, center.y - self.height / 2.0 + EYE_HEIGHT, center.z)
    }

    /// Rotation that turns the entity's local frame into world space.
    fn orientation(&self) -> Basis3<f32> {
        Basis3::from_angle_y(Deg(-self.head_rotation[1]))
            * Basis3::from_angle_x(Deg(-self.head_rotation[0]))
    }

    /// Direction the head is facing, scaled to `length`.
    pub fn look_vector(&self, length: f32) -> Vector3<f32> {
        self.orientation()
            .rotate_vector(Vector3::new(0.0, 0.0, -length))
    }

    /// Turns the head by a mouse delta.
    ///
    /// Pitch is clamped to plus or minus 90 degrees and yaw wraps into `[0, 360)`.
    pub fn rotate_head(&mut self, delta_x: f32, delta_y: f32, sensitivity: f32) {
        let pitch = self.head_rotation[0] + delta_y * sensitivity;
        let yaw = self.head_rotation[1] + delta_x * sensitivity;
        self.head_rotation[0] = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        let yaw = yaw.rem_euclid(360.0);
        // A tiny negative yaw rounds up to exactly 360.
        self.head_rotation[1] = if yaw >= 360.0 { 0.0 } else { yaw };
    }

    /// Steers horizontal velocity towards the intent and starts a jump when grounded.
    pub fn steer(&mut self, intent: MovementIntent) {
        let mut local = Vector3::new(intent.strafe, 0.0, -intent.forward);
        if local.magnitude2() > 0.0 {
            local = local.normalize() * MOVE_SPEED;
        }
        let target = Basis3::from_angle_y(Deg(-self.head_rotation[1])).rotate_vector(local);

        self.velocity.x += (target.x - self.velocity.x) * MOVE_SMOOTHING;
        self.velocity.z += (target.z - self.velocity.z) * MOVE_SMOOTHING;

        if intent.jump && self.on_ground {
            self.velocity.y = JUMP_VELOCITY;
        }
    }
}
