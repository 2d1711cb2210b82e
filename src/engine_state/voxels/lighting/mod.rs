//! # Light Propagation
//!
//! Two independent 0..=15 light channels are flooded breadth-first through transparent
//! blocks, losing one level per step.
//!
//! ## Passes
//!
//! - **Brighten**: a queued block spreads `level - 1` to every transparent neighbor that
//!   is darker, and queues the neighbor while that value can still spread. An emitter
//!   counts as one level above the maximum, so its neighbors receive 15.
//! - **Darken**: a queued block was just cleared from `level`. Neighbors darker than that
//!   were lit through it and are cleared in turn. Neighbors at least as bright are lit
//!   from somewhere else and are queued for brightening, as are emitters met on the way.
//!   Once the darken queue drains, a brighten pass refills the cleared region.
//!
//! ## Ambient floor
//!
//! The world's ambient level is the lowest light a transparent block can hold. Darkening
//! clears blocks down to it rather than to zero and leaves blocks already at it alone, and
//! a block opened by an edit starts at it.
//!
//! Every block whose light changes grows a bounding box. When a pass finishes, every
//! chunk within one block of that box is flagged for remeshing, since a face is shaded
//! by the light of the block in front of it.

use cgmath::{Point3, Vector3};
use log::trace;

use super::block::{block_side::BlockSide, block_type::BlockType, Block, LightChannel, MAX_LIGHT};
use super::chunk::{chunk_origin, Chunk, CHUNK_DIMENSION, CHUNK_SIZE};
use super::world::World;

mod light_queue;

pub use light_queue::{LightNode, LightQueue};

/// Capacity of each propagation queue.
pub const LIGHT_QUEUE_CAPACITY: usize = 1 << 16;

/// Level an emitter spreads from, so its direct neighbors receive [`MAX_LIGHT`].
const EMITTER_LEVEL: u8 = MAX_LIGHT + 1;

/// Incremental relighting state: the two frontier queues and the touched region.
#[derive(Debug)]
pub struct LightPropagator {
    brighten: LightQueue,
    darken: LightQueue,
    touched: Option<(Point3<i32>, Point3<i32>)>,
}

impl Default for LightPropagator {
    fn default() -> Self {
        Self::new()
    }
}

impl LightPropagator {
    /// Creates a propagator with [`LIGHT_QUEUE_CAPACITY`] entries per queue.
    pub fn new() -> Self {
        Self::with_capacity(LIGHT_QUEUE_CAPACITY)
    }

    /// Creates a propagator with `capacity` entries per queue.
    pub fn with_capacity(capacity: usize) -> Self {
        LightPropagator {
            brighten: LightQueue::with_capacity(capacity),
            darken: LightQueue::with_capacity(capacity),
            touched: None,
        }
    }

    /// Queues a block to spread its light, or full light if it is an emitter.
    pub fn queue_brighten(&mut self, position: Point3<i32>, channel: LightChannel) {
        self.brighten.push(LightNode {
            position,
            channel,
            level: 0,
        });
    }

    /// Queues the neighbors of a block that was cleared from `level` for darkening.
    pub fn queue_darken(&mut self, position: Point3<i32>, channel: LightChannel, level: u8) {
        self.darken.push(LightNode {
            position,
            channel,
            level,
        });
    }

    /// Queues the removal of an emitter at `position`.
    pub fn queue_removed_source(&mut self, position: Point3<i32>, channel: LightChannel) {
        self.queue_darken(position, channel, EMITTER_LEVEL);
    }

    /// The block to store when `old` is replaced by a block of `block_type`.
    ///
    /// A transparent block replacing a transparent one keeps its light, since the light
    /// flowing through the cell is unchanged. A transparent block replacing an opaque one
    /// starts at the ambient floor. Opaque blocks hold no light.
    pub fn replacement_block(old: Block, block_type: BlockType, ambient_light: u8) -> Block {
        let mut new = Block::new(block_type);
        if new.is_transparent() {
            for channel in LightChannel::ALL {
                let level = if old.is_transparent() {
                    old.light(channel)
                } else {
                    ambient_light
                };
                new.set_light(channel, level);
            }
        }
        new
    }

    /// Queues relighting after the block at `position` changed from `old` to `new`.
    ///
    /// The world must already hold `new` at `position`, built with
    /// [`LightPropagator::replacement_block`]. Run [`LightPropagator::propagate_dark`]
    /// afterwards.
    pub fn queue_block_change(
        &mut self,
        world: &World,
        position: Point3<i32>,
        old: Block,
        new: Block,
    ) {
        for channel in LightChannel::ALL {
            if old.emits(channel) {
                self.queue_removed_source(position, channel);
            }
        }

        if old.is_transparent() && !new.is_transparent() {
            // The cell now blocks light that used to pass through it.
            for channel in LightChannel::ALL {
                let level = old.light(channel);
                if level > 0 {
                    self.queue_darken(position, channel, level);
                }
            }
        }

        if new.is_transparent() {
            for side in BlockSide::all() {
                let neighbor_position = position + side.normal();
                if let Some(neighbor) = world.get_block(neighbor_position) {
                    for channel in LightChannel::ALL {
                        if neighbor.emits(channel) || neighbor.light(channel) > 0 {
                            self.queue_brighten(neighbor_position, channel);
                        }
                    }
                }
            }
        }

        for channel in LightChannel::ALL {
            if new.emits(channel) {
                self.queue_brighten(position, channel);
            }
        }
    }

    /// Queues the light sources relevant to a freshly loaded chunk: its own emitters and
    /// the lit blocks facing it in already loaded neighbors.
    pub fn queue_chunk_sources(&mut self, world: &World, position: Point3<i32>) {
        let origin = chunk_origin(position);
        if let Some(chunk) = world.get_chunk_at(position) {
            for index in 0..CHUNK_SIZE as usize {
                let block = &chunk.blocks()[index];
                for channel in LightChannel::ALL {
                    if block.emits(channel) {
                        let local = Chunk::local_position_of_index(index);
                        let offset = Vector3::new(local.x as i32, local.y as i32, local.z as i32);
                        self.queue_brighten(origin + offset, channel);
                    }
                }
            }
        }

        for side in BlockSide::all() {
            let neighbor = match world.get_chunk_at(position + side.normal()) {
                Some(neighbor) => neighbor,
                None => continue,
            };
            let axis = side.axis();
            let (u_axis, v_axis) = ((axis + 1) % 3, (axis + 2) % 3);
            // The neighbor's layer touching this chunk, in this chunk's local frame.
            let layer = if side.direction() < 0 { -1 } else { CHUNK_DIMENSION };
            let neighbor_layer = if side.direction() < 0 { CHUNK_DIMENSION - 1 } else { 0 };
            for u in 0..CHUNK_DIMENSION {
                for v in 0..CHUNK_DIMENSION {
                    let mut local = [0usize; 3];
                    local[axis] = neighbor_layer as usize;
                    local[u_axis] = u as usize;
                    local[v_axis] = v as usize;
                    let block = neighbor.get_block_at(local[0], local[1], local[2]);

                    let mut offset = Vector3::new(0, 0, 0);
                    offset[axis] = layer;
                    offset[u_axis] = u;
                    offset[v_axis] = v;
                    for channel in LightChannel::ALL {
                        if block.emits(channel) || block.light(channel) > 1 {
                            self.queue_brighten(origin + offset, channel);
                        }
                    }
                }
            }
        }
    }

    /// Runs the brighten pass to exhaustion and flags the touched chunks for remeshing.
    ///
    /// Returns the number of blocks whose light changed.
    pub fn propagate_light(&mut self, world: &mut World) -> usize {
        let mut changed = 0;
        while let Some(node) = self.brighten.pop() {
            let block = match world.get_block(node.position) {
                Some(block) => block,
                None => continue,
            };
            let current = if block.emits(node.channel) {
                EMITTER_LEVEL
            } else {
                block.light(node.channel)
            };
            let next = current.saturating_sub(1);
            if next == 0 {
                continue;
            }

            for side in BlockSide::all() {
                let neighbor_position = node.position + side.normal();
                let neighbor = match world.get_block_mut(neighbor_position) {
                    Some(neighbor) => neighbor,
                    None => continue,
                };
                if !neighbor.is_transparent() || neighbor.light(node.channel) >= next {
                    continue;
                }
                neighbor.set_light(node.channel, next);
                self.touch(neighbor_position);
                changed += 1;
                if next > 1 {
                    self.queue_brighten(neighbor_position, node.channel);
                }
            }
        }

        if changed > 0 {
            trace!("Brighten pass raised {} blocks", changed);
        }
        self.flush_touched(world);
        changed
    }

    /// Runs the darken pass to exhaustion, then the brighten pass.
    ///
    /// Returns the number of blocks whose light changed in either pass.
    pub fn propagate_dark(&mut self, world: &mut World) -> usize {
        let ambient_light = world.ambient_light();
        let mut cleared = 0;
        while let Some(node) = self.darken.pop() {
            for side in BlockSide::all() {
                let neighbor_position = node.position + side.normal();
                let neighbor = match world.get_block_mut(neighbor_position) {
                    Some(neighbor) => neighbor,
                    None => continue,
                };
                if neighbor.emits(node.channel) {
                    self.queue_brighten(neighbor_position, node.channel);
                    continue;
                }
                let level = neighbor.light(node.channel);
                if level <= ambient_light {
                    continue;
                }
                if level < node.level {
                    neighbor.set_light(node.channel, ambient_light);
                    self.touch(neighbor_position);
                    cleared += 1;
                    self.queue_darken(neighbor_position, node.channel, level);
                } else {
                    self.queue_brighten(neighbor_position, node.channel);
                }
            }
        }

        if cleared > 0 {
            trace!("Darken pass cleared {} blocks", cleared);
        }
        cleared + self.propagate_light(world)
    }

    fn touch(&mut self, position: Point3<i32>) {
        self.touched = Some(match self.touched {
            None => (position, position),
            Some((min, max)) => (
                Point3::new(
                    min.x.min(position.x),
                    min.y.min(position.y),
                    min.z.min(position.z),
                ),
                Point3::new(
                    max.x.max(position.x),
                    max.y.max(position.y),
                    max.z.max(position.z),
                ),
            ),
        });
    }

    fn flush_touched(&mut self, world: &mut World) {
        if let Some((min, max)) = self.touched.take() {
            let margin = Vector3::new(1, 1, 1);
            world.mark_region_dirty(min - margin, max + margin);
        }
    }
}
