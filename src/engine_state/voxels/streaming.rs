//! # World Streaming
//!
//! Keeps every chunk within a Chebyshev radius of the player loaded, one chunk per tick.
//!
//! The radius cube is scanned x, then y, then z from the most negative corner. The first
//! missing coordinate is filled, reusing the first loaded chunk (in load order) that has
//! fallen outside the radius, or a new allocation when none has. The new chunk is
//! generated, lit and flagged for remeshing along with its neighbors.

use cgmath::Point3;
use log::debug;

use super::chunk::{chebyshev_distance, Chunk};
use super::lighting::LightPropagator;
use super::world::World;

impl World {
    /// First coordinate within `radius` of `center` that has no loaded chunk.
    pub fn next_missing_chunk(&self, center: Point3<i32>, radius: i32) -> Option<Point3<i32>> {
        for x in -radius..=radius {
            for y in -radius..=radius {
                for z in -radius..=radius {
                    let position = Point3::new(center.x + x, center.y + y, center.z + z);
                    if !self.is_loaded(position) {
                        return Some(position);
                    }
                }
            }
        }
        None
    }

    /// Detaches the first loaded chunk, in load order, farther than `radius` from `center`.
    fn evict_out_of_range(&mut self, center: Point3<i32>, radius: i32) -> Option<Box<Chunk>> {
        let position = self
            .chunks
            .find_first(|position, _| chebyshev_distance(position, center) > radius)?;
        debug!("Evicting chunk {:?}", position);
        self.chunks.remove(position)
    }

    /// Loads at most one missing chunk around `center`.
    ///
    /// # Arguments
    /// * `center` - The player's chunk coordinate
    /// * `radius` - Chebyshev radius to keep loaded
    /// * `lighting` - Propagates the new chunk's light sources
    ///
    /// # Returns
    /// The coordinate that was loaded, or `None` when the radius is already complete
    pub fn load_next_chunk(
        &mut self,
        center: Point3<i32>,
        radius: i32,
        lighting: &mut LightPropagator,
    ) -> Option<Point3<i32>> {
        let position = self.next_missing_chunk(center, radius)?;

        let chunk = match self.evict_out_of_range(center, radius) {
            Some(mut recycled) => {
                recycled.opaque_mesh.clear();
                recycled.transparent_mesh.clear();
                recycled
            }
            None => Box::new(Chunk::new()),
        };
        self.place_chunk(position, chunk);
        debug!("Loaded chunk {:?} ({} loaded)", position, self.chunk_count());

        lighting.queue_chunk_sources(self, position);
        lighting.propagate_light(self);
        Some(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::engine_state::voxels::chunk::chunk_generation::TerrainGenerator;

    fn world() -> World {
        World::new(
            TerrainGenerator::from_config(&GeneratorConfig::Flat { depth: 4 }),
            15,
        )
    }

    #[test]
    fn scan_starts_at_the_negative_corner() {
        let mut world = world();
        let mut lighting = LightPropagator::new();
        let center = Point3::new(0, 0, 0);
        assert_eq!(
            world.load_next_chunk(center, 1, &mut lighting),
            Some(Point3::new(-1, -1, -1))
        );
        assert_eq!(
            world.load_next_chunk(center, 1, &mut lighting),
            Some(Point3::new(-1, -1, 0))
        );
    }

    #[test]
    fn fills_the_cube_then_stops() {
        let mut world = world();
        let mut lighting = LightPropagator::new();
        let center = Point3::new(2, 0, -3);
        for _ in 0..27 {
            assert!(world.load_next_chunk(center, 1, &mut lighting).is_some());
        }
        assert_eq!(world.chunk_count(), 27);
        assert_eq!(world.load_next_chunk(center, 1, &mut lighting), None);
        assert_eq!(world.next_missing_chunk(center, 1), None);
    }

    #[test]
    fn moving_recycles_the_first_chunk_out_of_range() {
        let mut world = world();
        let mut lighting = LightPropagator::new();
        for _ in 0..27 {
            world.load_next_chunk(Point3::new(0, 0, 0), 1, &mut lighting);
        }

        let loaded = world.load_next_chunk(Point3::new(1, 0, 0), 1, &mut lighting);
        assert_eq!(loaded, Some(Point3::new(2, -1, -1)));
        assert_eq!(world.chunk_count(), 27);
        // The first chunk loaded with x == -1 was the one reused.
        assert!(!world.is_loaded(Point3::new(-1, -1, -1)));
        assert!(world.is_loaded(Point3::new(-1, -1, 0)));
    }
}
