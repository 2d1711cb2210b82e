//! Integration tests for breaking and placing blocks through the engine
//! Edits change the block, relight around it and flag the affected meshes

use cgmath::Point3;
use voxel_sandbox::application_state::input_state::{ProcessedInputState, RawInputState};
use voxel_sandbox::config::{EngineConfig, GeneratorConfig};
use voxel_sandbox::engine_state::voxels::block::{block_type::BlockType, LightChannel};
use voxel_sandbox::engine_state::EngineState;
use winit::event::MouseButton;

fn engine(ambient_light: u8) -> EngineState {
    let config = EngineConfig {
        chunk_radius: 0,
        ambient_light,
        generator: GeneratorConfig::Flat { depth: 4 },
        spawn_position: [8.5, 4.901, 8.5],
        ..EngineConfig::default()
    };
    let mut engine = EngineState::new(&config);
    engine.world.add_chunk_at(Point3::new(0, 0, 0));
    engine.world.add_chunk_at(Point3::new(1, 0, 0));
    engine.world.remesh_dirty();
    engine
}

fn click(button: MouseButton) -> ProcessedInputState {
    let mut input = ProcessedInputState::default();
    input
        .mouse_button_states
        .insert(button, RawInputState::Pressed);
    input
}

fn block_type_at(engine: &EngineState, position: Point3<i32>) -> u8 {
    engine
        .world
        .get_block(position)
        .expect("loaded")
        .block_type
}

#[test]
fn test_click_breaks_the_block_under_the_crosshair() {
    let mut engine = engine(15);
    engine.player.head_rotation = [90.0, 0.0];

    engine.set_input_commands(click(MouseButton::Left));
    engine.tick();

    assert_eq!(block_type_at(&engine, Point3::new(8, 3, 8)), BlockType::AIR as u8);
    // An opened cell starts at the ambient floor, like the generated air above it.
    let opened = engine.world.get_block(Point3::new(8, 3, 8)).expect("loaded");
    assert_eq!(opened.light(LightChannel::Warm), 15);
    assert_eq!(opened.light(LightChannel::Cool), 15);
}

#[test]
fn test_holding_the_button_edits_only_once() {
    let mut engine = engine(15);
    engine.player.head_rotation = [90.0, 0.0];

    engine.set_input_commands(click(MouseButton::Left));
    engine.tick();

    let mut held = ProcessedInputState::default();
    held.mouse_button_states
        .insert(MouseButton::Left, RawInputState::Held);
    engine.set_input_commands(held);
    engine.tick();

    // Only the grass went; the dirt below is still there.
    assert_eq!(block_type_at(&engine, Point3::new(8, 3, 8)), BlockType::AIR as u8);
    assert_eq!(block_type_at(&engine, Point3::new(8, 2, 8)), BlockType::DIRT as u8);
}

#[test]
fn test_placed_lamp_lights_a_dark_world_and_removal_restores_it() {
    let mut engine = engine(0);
    let lamp = Point3::new(4, 4, 4);

    assert!(engine.set_block(lamp, BlockType::WARM_LAMP));
    let warm = |engine: &EngineState, p: Point3<i32>| {
        engine.world.get_block(p).expect("loaded").light(LightChannel::Warm)
    };
    assert_eq!(warm(&engine, Point3::new(5, 4, 4)), 15);
    assert_eq!(warm(&engine, Point3::new(6, 4, 4)), 14);
    assert_eq!(warm(&engine, Point3::new(4, 6, 4)), 14);
    // Light crosses into the neighboring chunk, twelve steps away.
    assert_eq!(warm(&engine, Point3::new(16, 4, 4)), 4);
    // The floor is opaque and stays dark.
    assert_eq!(warm(&engine, Point3::new(4, 3, 4)), 0);

    assert!(engine.set_block(lamp, BlockType::AIR));
    for x in 0..32 {
        assert_eq!(warm(&engine, Point3::new(x, 4, 4)), 0, "x = {x}");
    }
}

#[test]
fn test_edits_flag_the_chunk_and_its_loaded_neighbors() {
    let mut engine = engine(15);
    assert!(engine.world.dirty_chunks().is_empty());

    engine.set_block(Point3::new(15, 8, 8), BlockType::STONE);
    assert_eq!(
        engine.world.dirty_chunks(),
        vec![Point3::new(0, 0, 0), Point3::new(1, 0, 0)]
    );
    assert_eq!(engine.world.remesh_dirty(), 2);

    // The stone cube floats in the air: six faces more than the floor alone.
    let chunk = engine
        .world
        .get_chunk_at(Point3::new(0, 0, 0))
        .expect("loaded");
    assert_eq!(chunk.opaque_mesh.len(), (256 + 6) * 6);
}

#[test]
fn test_edits_in_unloaded_chunks_are_ignored() {
    let mut engine = engine(15);
    assert!(!engine.set_block(Point3::new(-1, 8, 8), BlockType::STONE));
    assert!(engine.world.get_block(Point3::new(-1, 8, 8)).is_none());
}

#[test]
fn test_right_click_places_the_configured_block() {
    let mut engine = engine(15);
    engine.place_block = BlockType::GLASS;
    // Stand back from the target column and look down-forward at it.
    engine.player.current_position = Point3::new(8.5, 4.901, 11.5);
    engine.player.previous_position = engine.player.current_position;
    engine.player.head_rotation = [45.0, 0.0];

    let target = engine.target_block().expect("floor in reach");
    let expected = target.block + target.normal;

    engine.set_input_commands(click(MouseButton::Right));
    engine.tick();

    assert_eq!(block_type_at(&engine, expected), BlockType::GLASS as u8);
    let chunk = engine
        .world
        .get_chunk_at(Point3::new(0, 0, 0))
        .expect("loaded");
    assert!(!chunk.transparent_mesh.is_empty());
}
