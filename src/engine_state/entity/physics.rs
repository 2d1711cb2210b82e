//! Fixed-tick AABB physics against the voxel grid.
//!
//! Gravity is applied, then the pending displacement is clamped against every solid block
//! in the swept box one axis at a time: Y, then X, then Z. Each axis tests overlap with
//! the box as already moved along the earlier axes.

use cgmath::{Point3, Vector3};

use super::Entity;
use crate::engine_state::voxels::world::World;

/// Downward acceleration in blocks per tick squared.
pub const GRAVITY: f32 = 0.075;
/// Gap left between a box and the block it stops against.
pub const COLLISION_EPSILON: f32 = 0.001;

/// An axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(center: Vector3<f32>, half_extents: Vector3<f32>) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// The box grown along `displacement` so it covers the whole move.
    pub fn swept(&self, displacement: Vector3<f32>) -> Self {
        let mut swept = *self;
        for axis in 0..3 {
            if displacement[axis] < 0.0 {
                swept.min[axis] += displacement[axis];
            } else {
                swept.max[axis] += displacement[axis];
            }
        }
        swept
    }

    /// The box of `entity` at its current position.
    pub fn of_entity(entity: &Entity) -> Self {
        let center = Vector3::new(
            entity.current_position.x,
            entity.current_position.y,
            entity.current_position.z,
        );
        Self::new(
            center,
            Vector3::new(entity.width, entity.height, entity.width) * 0.5,
        )
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    /// Whether the box overlaps the unit block at `block` on `axis`, strictly.
    fn overlaps_block(&self, block: Point3<i32>, axis: usize) -> bool {
        let low = block[axis] as f32;
        self.min[axis] < low + 1.0 && self.max[axis] > low
    }

    /// Whether the box overlaps the unit block at `block` on every axis.
    pub fn intersects_block(&self, block: Point3<i32>) -> bool {
        (0..3).all(|axis| self.overlaps_block(block, axis))
    }

    /// Shortens `displacement` along `axis` so the box stops short of `block`.
    fn clip_displacement(&self, block: Point3<i32>, axis: usize, displacement: f32) -> f32 {
        let low = block[axis] as f32;
        let high = low + 1.0;
        if displacement < 0.0 && self.min[axis] >= high {
            let limit = high - self.min[axis];
            if limit > displacement {
                return limit + COLLISION_EPSILON;
            }
        } else if displacement > 0.0 && self.max[axis] <= low {
            let limit = low - self.max[axis];
            if limit < displacement {
                return limit - COLLISION_EPSILON;
            }
        }
        displacement
    }

    fn translate(&mut self, axis: usize, distance: f32) {
        self.min[axis] += distance;
        self.max[axis] += distance;
    }
}

/// Resolution order of the three axes.
const AXIS_ORDER: [usize; 3] = [1, 0, 2];

/// Advances `entity` by one tick against the solid blocks of `world`.
///
/// Unloaded blocks do not collide.
pub fn update_entity(world: &World, entity: &mut Entity) {
    entity.previous_position = entity.current_position;
    entity.velocity.y -= GRAVITY;

    let requested = entity.velocity;
    let mut aabb = Aabb::of_entity(entity);

    let broad = aabb.swept(requested);
    let low = broad.min.map(|v| v.floor() as i32);
    let high = broad.max.map(|v| v.floor() as i32);
    let mut solids = Vec::new();
    for x in low.x..=high.x {
        for y in low.y..=high.y {
            for z in low.z..=high.z {
                let block = Point3::new(x, y, z);
                if world.is_solid(block) {
                    solids.push(block);
                }
            }
        }
    }

    let mut resolved = requested;
    for axis in AXIS_ORDER {
        let (a, b) = ((axis + 1) % 3, (axis + 2) % 3);
        for block in &solids {
            if aabb.overlaps_block(*block, a) && aabb.overlaps_block(*block, b) {
                resolved[axis] = aabb.clip_displacement(*block, axis, resolved[axis]);
            }
        }
        aabb.translate(axis, resolved[axis]);
    }

    let center = aabb.center();
    entity.current_position = Point3::new(center.x, center.y, center.z);

    if resolved.x != requested.x {
        entity.velocity.x = 0.0;
    }
    if resolved.z != requested.z {
        entity.velocity.z = 0.0;
    }
    if resolved.y != requested.y {
        if requested.y < 0.0 {
            entity.on_ground = true;
        }
        entity.velocity.y = 0.0;
    } else {
        entity.on_ground = false;
    }
}
