//! # Engine State Module
//!
//! The simulation context of the voxel sandbox: one object that owns the world, the light
//! propagator, the player and the clock, created once at startup.
//!
//! ## Key Components
//!
//! * `EngineState` - The context every tick, edit and frame goes through
//! * `camera_state` - First-person camera following the player's eye
//! * `entity` - Player box, physics and block raycasts
//! * `rendering` - Vertex buffers, the mesher and the renderer seam
//! * `timing` - Fixed-step tick clock
//! * `voxels` - Blocks, chunks, the chunk hash list, streaming and lighting
//!
//! ## Tick order
//!
//! Each fixed tick streams at most one chunk around the player, steers and moves the
//! player, applies any pending break or place action and finally remeshes dirty chunks.
//! Frames run as many ticks as wall time allows and then draw with the leftover fraction
//! of a tick as the interpolant.

use cgmath::{Point3, Vector3};
use log::{debug, warn};
use web_time::Duration;
use winit::{event::MouseButton, keyboard::KeyCode};

use camera_state::CameraState;
use entity::{
    physics::{update_entity, Aabb},
    raycast::{raycast, RaycastHit},
    Entity, MovementIntent,
};
use rendering::{RenderPass, Renderer};
use timing::TickClock;
use voxels::{
    block::{block_type::BlockType, MAX_LIGHT},
    chunk::{chunk_generation::TerrainGenerator, chunk_origin, chunk_position_of},
    lighting::LightPropagator,
    world::World,
};

use crate::{application_state::input_state::ProcessedInputState, config::EngineConfig};

pub mod camera_state;
pub mod entity;
pub mod rendering;
pub mod timing;
pub mod voxels;

/// How far, in blocks, the player can reach to break or place.
pub const REACH: f32 = 5.0;

/// Represents player actions derived from input
///
/// Movement is level-triggered and persists until the next input snapshot. Break and
/// place are edge-triggered and consumed by the next tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerAction {
    /// Planar movement and jump for the coming ticks
    pub movement: MovementIntent,
    /// Break the targeted block on the next tick
    pub break_block: bool,
    /// Place a block against the targeted face on the next tick
    pub place_block: bool,
}

/// The main state container for the voxel sandbox
///
/// This struct owns the world and every subsystem acting on it. Input arrives through
/// [`EngineState::set_input_commands`], time through [`EngineState::advance`] or
/// [`EngineState::frame`], and [`EngineState::render`] hands the meshes to a back-end.
#[derive(Debug)]
pub struct EngineState {
    /// Loaded chunks and their meshes
    pub world: World,
    /// Brighten and darken frontiers shared by streaming and edits
    pub lighting: LightPropagator,
    /// The player entity
    pub player: Entity,
    /// Camera following the player's eye
    pub camera_state: CameraState,
    /// Fixed-step clock driving ticks
    pub clock: TickClock,
    /// Current player actions derived from input
    pub player_actions: PlayerAction,
    /// Block the place action puts down
    pub place_block: BlockType,
    chunk_radius: i32,
    mouse_sensitivity: f32,
    ticks: u64,
}

impl EngineState {
    /// Creates an empty world from `config` with the player at the spawn position.
    ///
    /// Chunks are streamed in one per tick from the first tick on.
    pub fn new(config: &EngineConfig) -> Self {
        let place_block = BlockType::from_name(&config.place_block).unwrap_or_else(|| {
            warn!(
                "Unknown place block '{}', placing brick instead",
                config.place_block
            );
            BlockType::BRICK
        });

        let ambient_light = config.ambient_light.min(MAX_LIGHT);
        let world = World::new(TerrainGenerator::from_config(&config.generator), ambient_light);

        let [x, y, z] = config.spawn_position;
        let player = Entity::player(Point3::new(x, y, z));
        let camera_state = CameraState::new(
            player.eye_position(1.0),
            config.window.width,
            config.window.height,
        );

        debug!(
            "Engine state created: radius {}, ambient light {}, placing {:?}",
            config.chunk_radius, ambient_light, place_block
        );

        Self {
            world,
            lighting: LightPropagator::new(),
            player,
            camera_state,
            clock: TickClock::new(),
            player_actions: PlayerAction::default(),
            place_block,
            chunk_radius: config.chunk_radius.max(0),
            mouse_sensitivity: config.mouse_sensitivity,
            ticks: 0,
        }
    }

    /// Number of ticks simulated so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Chebyshev radius kept loaded around the player.
    pub fn chunk_radius(&self) -> i32 {
        self.chunk_radius
    }

    /// Chunk coordinate containing the player's box center.
    pub fn player_chunk(&self) -> Point3<i32> {
        let position = self.player.current_position;
        chunk_position_of(Point3::new(
            position.x.floor() as i32,
            position.y.floor() as i32,
            position.z.floor() as i32,
        ))
    }

    /// Sets the input commands for the engine state.
    ///
    /// Mouse motion turns the head immediately; everything else takes effect on the next tick.
    ///
    /// # Arguments
    /// * `input` - The processed input state to use for setting commands
    pub fn set_input_commands(&mut self, input: ProcessedInputState) {
        if let Some((dx, dy)) = input.get_mouse_delta() {
            self.player
                .rotate_head(dx as f32, dy as f32, self.mouse_sensitivity);
        }

        let pending_break = self.player_actions.break_block;
        let pending_place = self.player_actions.place_block;
        self.player_actions = Self::translate_processed_input(&input);
        self.player_actions.break_block |= pending_break;
        self.player_actions.place_block |= pending_place;
    }

    /// Translates the processed input state into player actions.
    fn translate_processed_input(input: &ProcessedInputState) -> PlayerAction {
        let axis = |positive: KeyCode, negative: KeyCode| {
            let mut value = 0.0;
            if input.get_key_state(positive).is_active() {
                value += 1.0;
            }
            if input.get_key_state(negative).is_active() {
                value -= 1.0;
            }
            value
        };

        PlayerAction {
            movement: MovementIntent {
                forward: axis(KeyCode::KeyW, KeyCode::KeyS),
                strafe: axis(KeyCode::KeyD, KeyCode::KeyA),
                jump: input.get_key_state(KeyCode::Space).is_active(),
            },
            break_block: input
                .get_mouse_button_state(MouseButton::Left)
                .is_just_pressed(),
            place_block: input
                .get_mouse_button_state(MouseButton::Right)
                .is_just_pressed(),
        }
    }

    /// Advances the simulation by one fixed tick.
    pub fn tick(&mut self) {
        let center = self.player_chunk();
        self.world
            .load_next_chunk(center, self.chunk_radius, &mut self.lighting);

        self.player.steer(self.player_actions.movement);
        update_entity(&self.world, &mut self.player);

        if std::mem::take(&mut self.player_actions.break_block) {
            self.break_targeted_block();
        }
        if std::mem::take(&mut self.player_actions.place_block) {
            self.place_against_targeted_block();
        }

        self.world.remesh_dirty();
        self.ticks += 1;
    }

    /// Feeds `elapsed` into the clock and runs every tick that became due.
    ///
    /// # Returns
    /// The number of ticks run
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        let ticks = self.clock.advance(elapsed);
        for _ in 0..ticks {
            self.tick();
        }
        ticks
    }

    /// Runs the ticks due since the previous frame according to the wall clock.
    pub fn frame(&mut self) -> u32 {
        let ticks = self.clock.advance_to_now();
        for _ in 0..ticks {
            self.tick();
        }
        ticks
    }

    /// The solid block under the crosshair, within [`REACH`] of the player's eye.
    pub fn target_block(&self) -> Option<RaycastHit> {
        raycast(
            &self.world,
            self.player.eye_position(1.0),
            self.player.look_vector(REACH),
        )
    }

    /// Replaces the block at world coordinate `position` and relights around it.
    ///
    /// A see-through block keeps the light of a see-through predecessor; one opened up
    /// from a solid block starts at the ambient level and light flows back in from its
    /// neighbors. The block's chunk and its face neighbors are flagged for remeshing.
    ///
    /// # Returns
    /// `false` if the block's chunk is not loaded
    pub fn set_block(&mut self, position: Point3<i32>, block_type: BlockType) -> bool {
        let ambient_light = self.world.ambient_light();
        let (old, new) = match self.world.get_block_mut(position) {
            Some(block) => {
                let new = LightPropagator::replacement_block(*block, block_type, ambient_light);
                (std::mem::replace(block, new), new)
            }
            None => return false,
        };

        self.lighting
            .queue_block_change(&self.world, position, old, new);
        self.lighting.propagate_dark(&mut self.world);
        self.world
            .mark_chunk_and_neighbors_dirty(chunk_position_of(position));

        debug!(
            "Block at {:?} changed from {:?} to {:?}",
            position,
            BlockType::from_id(old.block_type),
            block_type
        );
        true
    }

    /// Breaks the targeted block, returning its coordinate.
    pub fn break_targeted_block(&mut self) -> Option<Point3<i32>> {
        let hit = self.target_block()?;
        self.set_block(hit.block, BlockType::AIR)
            .then_some(hit.block)
    }

    /// Places [`EngineState::place_block`] in the air cell in front of the targeted face.
    ///
    /// Nothing is placed when the eye is inside the targeted block, the cell is not air or
    /// the new block would overlap the player.
    pub fn place_against_targeted_block(&mut self) -> Option<Point3<i32>> {
        let hit = self.target_block()?;
        if hit.normal == Vector3::new(0, 0, 0) {
            return None;
        }
        let position = hit.block + hit.normal;
        if !self.world.get_block(position)?.is_air() {
            return None;
        }
        if Aabb::of_entity(&self.player).intersects_block(position) {
            return None;
        }
        self.set_block(position, self.place_block)
            .then_some(position)
    }

    /// Resizes the camera projection when the window size changes
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera_state.resize(width, height);
    }

    /// Renders the current frame
    ///
    /// Every opaque mesh is drawn before any transparent one, each pass in chunk load
    /// order. The targeted block, if any, is highlighted last.
    pub fn render(&mut self, renderer: &mut dyn Renderer) {
        let alpha = self.clock.alpha();
        self.camera_state
            .follow(self.player.eye_position(alpha), self.player.head_rotation);

        renderer.begin_frame(&self.camera_state);
        for pass in [RenderPass::Opaque, RenderPass::Transparent] {
            for (position, chunk) in self.world.chunks() {
                let mesh = match pass {
                    RenderPass::Opaque => &chunk.opaque_mesh,
                    RenderPass::Transparent => &chunk.transparent_mesh,
                };
                if mesh.is_empty() {
                    continue;
                }
                let origin = chunk_origin(position);
                let offset = Vector3::new(origin.x as f32, origin.y as f32, origin.z as f32);
                renderer.draw_chunk_mesh(offset, mesh.as_slice(), pass);
            }
        }

        if let Some(hit) = self.target_block() {
            renderer.draw_block_highlight(hit.block);
        }
        renderer.end_frame();
    }
}
