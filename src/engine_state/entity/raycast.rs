use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::world::World;

/// The first solid block along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// World coordinate of the block that was hit.
    pub block: Point3<i32>,
    /// Normal of the face the ray entered through; zero if the ray started inside the block.
    pub normal: Vector3<i32>,
    /// Fraction of the ray travelled before entering the block, in `[0, 1]`.
    pub distance: f32,
}

/// Walks the voxel grid from `origin` along `ray` and returns the first solid block.
///
/// `ray` is the full displacement to test, so its length is the reach. Each step advances
/// along the axis whose next cell boundary is nearest. Unloaded blocks are not solid.
pub fn raycast(world: &World, origin: Point3<f32>, ray: Vector3<f32>) -> Option<RaycastHit> {
    let mut block = Point3::new(
        origin.x.floor() as i32,
        origin.y.floor() as i32,
        origin.z.floor() as i32,
    );

    let mut step = [0i32; 3];
    let mut t_delta = [f32::INFINITY; 3];
    let mut t_max = [f32::INFINITY; 3];
    for axis in 0..3 {
        if ray[axis] > 0.0 {
            step[axis] = 1;
            t_delta[axis] = (1.0 / ray[axis]).abs();
            t_max[axis] = ((block[axis] + 1) as f32 - origin[axis]) / ray[axis];
        } else if ray[axis] < 0.0 {
            step[axis] = -1;
            t_delta[axis] = (1.0 / ray[axis]).abs();
            t_max[axis] = (block[axis] as f32 - origin[axis]) / ray[axis];
        }
    }

    let mut normal = Vector3::new(0, 0, 0);
    let mut distance = 0.0;
    loop {
        if world.is_solid(block) {
            return Some(RaycastHit {
                block,
                normal,
                distance,
            });
        }

        let axis = if t_max[0] < t_max[1] {
            if t_max[0] < t_max[2] {
                0
            } else {
                2
            }
        } else if t_max[1] < t_max[2] {
            1
        } else {
            2
        };
        distance = t_max[axis];
        if distance > 1.0 {
            return None;
        }
        block[axis] += step[axis];
        t_max[axis] += t_delta[axis];
        normal = Vector3::new(0, 0, 0);
        normal[axis] = -step[axis];
    }
}
