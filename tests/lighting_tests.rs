//! Integration tests for incremental relighting after block edits
//! A lamp placed in a sealed dark chamber and removed again must leave no trace

use cgmath::Point3;
use voxel_sandbox::config::{EngineConfig, GeneratorConfig};
use voxel_sandbox::engine_state::voxels::block::{block_type::BlockType, Block, LightChannel};
use voxel_sandbox::engine_state::EngineState;

const CHAMBER_MIN: i32 = 2;
const CHAMBER_MAX: i32 = 13;

fn dark_engine() -> EngineState {
    let config = EngineConfig {
        chunk_radius: 0,
        ambient_light: 0,
        generator: GeneratorConfig::Empty,
        ..EngineConfig::default()
    };
    let mut engine = EngineState::new(&config);
    engine.world.add_chunk_at(Point3::new(0, 0, 0));
    engine
}

/// Encloses the cells `CHAMBER_MIN..=CHAMBER_MAX` on every axis in a stone shell.
fn build_chamber(engine: &mut EngineState) {
    let (low, high) = (CHAMBER_MIN - 1, CHAMBER_MAX + 1);
    for x in low..=high {
        for y in low..=high {
            for z in low..=high {
                let on_shell = [x, y, z].iter().any(|v| *v == low || *v == high);
                if on_shell {
                    *engine
                        .world
                        .get_block_mut(Point3::new(x, y, z))
                        .expect("chamber lies in the loaded chunk") = Block::new(BlockType::STONE);
                }
            }
        }
    }
}

fn light_snapshot(engine: &EngineState) -> Vec<(u8, u8)> {
    let chunk = engine
        .world
        .get_chunk_at(Point3::new(0, 0, 0))
        .expect("loaded");
    chunk
        .blocks()
        .iter()
        .map(|block| (block.light(LightChannel::Warm), block.light(LightChannel::Cool)))
        .collect()
}

fn light_at(engine: &EngineState, position: Point3<i32>, channel: LightChannel) -> u8 {
    engine
        .world
        .get_block(position)
        .expect("loaded")
        .light(channel)
}

#[test]
fn test_lamp_place_then_remove_restores_darkness() {
    let mut engine = dark_engine();
    build_chamber(&mut engine);
    let before = light_snapshot(&engine);

    let lamp = Point3::new(7, 7, 7);
    assert!(engine.set_block(lamp, BlockType::WARM_LAMP));
    assert_eq!(light_at(&engine, Point3::new(8, 7, 7), LightChannel::Warm), 15);
    assert_eq!(light_at(&engine, Point3::new(7, 9, 7), LightChannel::Warm), 14);
    assert_eq!(light_at(&engine, Point3::new(8, 7, 7), LightChannel::Cool), 0);
    // The shell keeps the light inside the chamber.
    assert_eq!(light_at(&engine, Point3::new(0, 7, 7), LightChannel::Warm), 0);

    assert!(engine.set_block(lamp, BlockType::AIR));
    assert_eq!(light_snapshot(&engine), before);
}

#[test]
fn test_two_channels_round_trip_independently() {
    let mut engine = dark_engine();
    build_chamber(&mut engine);
    let before = light_snapshot(&engine);

    let warm = Point3::new(4, 4, 4);
    let cool = Point3::new(11, 11, 11);
    engine.set_block(warm, BlockType::WARM_LAMP);
    engine.set_block(cool, BlockType::COOL_LAMP);

    let middle = Point3::new(8, 8, 8);
    let warm_level = light_at(&engine, middle, LightChannel::Warm);
    let cool_level = light_at(&engine, middle, LightChannel::Cool);
    assert!(warm_level > 0 && cool_level > 0);

    // Removing the warm lamp leaves the cool field untouched.
    engine.set_block(warm, BlockType::AIR);
    assert_eq!(light_at(&engine, middle, LightChannel::Warm), 0);
    assert_eq!(light_at(&engine, middle, LightChannel::Cool), cool_level);

    engine.set_block(cool, BlockType::AIR);
    assert_eq!(light_snapshot(&engine), before);
}

#[test]
fn test_glass_passes_light_and_stone_blocks_it() {
    let mut engine = dark_engine();
    build_chamber(&mut engine);

    // Split the chamber at x = 8 with a wall that has one glass pane in it.
    for y in CHAMBER_MIN..=CHAMBER_MAX {
        for z in CHAMBER_MIN..=CHAMBER_MAX {
            engine.set_block(Point3::new(8, y, z), BlockType::STONE);
        }
    }
    engine.set_block(Point3::new(8, 7, 7), BlockType::GLASS);
    engine.set_block(Point3::new(6, 7, 7), BlockType::WARM_LAMP);

    // Lamp at 6 gives 15 at 7 and 14 in the pane, then 13 on the far side.
    assert_eq!(light_at(&engine, Point3::new(8, 7, 7), LightChannel::Warm), 14);
    assert_eq!(light_at(&engine, Point3::new(9, 7, 7), LightChannel::Warm), 13);

    // Replacing the pane with stone darkens the far side completely.
    engine.set_block(Point3::new(8, 7, 7), BlockType::STONE);
    assert_eq!(light_at(&engine, Point3::new(9, 7, 7), LightChannel::Warm), 0);
    assert_eq!(light_at(&engine, Point3::new(12, 12, 12), LightChannel::Warm), 0);
}

#[test]
fn test_swapping_transparent_blocks_keeps_their_light() {
    let mut engine = dark_engine();
    build_chamber(&mut engine);
    engine.set_block(Point3::new(7, 7, 7), BlockType::WARM_LAMP);

    let cell = Point3::new(9, 7, 7);
    assert_eq!(light_at(&engine, cell, LightChannel::Warm), 14);
    let before = light_snapshot(&engine);

    assert!(engine.set_block(cell, BlockType::GLASS));
    assert_eq!(light_at(&engine, cell, LightChannel::Warm), 14);
    assert_eq!(light_at(&engine, Point3::new(10, 7, 7), LightChannel::Warm), 13);

    assert!(engine.set_block(cell, BlockType::AIR));
    assert_eq!(light_snapshot(&engine), before);
}

fn ambient_engine() -> EngineState {
    let config = EngineConfig {
        chunk_radius: 0,
        ambient_light: 15,
        generator: GeneratorConfig::Empty,
        ..EngineConfig::default()
    };
    let mut engine = EngineState::new(&config);
    engine.world.add_chunk_at(Point3::new(0, 0, 0));
    engine
}

#[test]
fn test_lamp_round_trip_in_full_ambient_leaves_no_dent() {
    let mut engine = ambient_engine();
    let before = light_snapshot(&engine);
    assert!(before.iter().all(|&levels| levels == (15, 15)));

    let lamp = Point3::new(7, 7, 7);
    assert!(engine.set_block(lamp, BlockType::WARM_LAMP));
    assert_eq!(light_at(&engine, Point3::new(8, 7, 7), LightChannel::Warm), 15);
    assert!(engine.set_block(lamp, BlockType::AIR));

    assert_eq!(light_snapshot(&engine), before);
}

#[test]
fn test_broken_stone_opens_at_the_ambient_floor() {
    let mut engine = ambient_engine();
    let cell = Point3::new(3, 3, 3);
    assert!(engine.set_block(cell, BlockType::STONE));
    assert_eq!(light_at(&engine, cell, LightChannel::Warm), 0);

    assert!(engine.set_block(cell, BlockType::AIR));
    assert_eq!(light_at(&engine, cell, LightChannel::Warm), 15);
    assert_eq!(light_at(&engine, cell, LightChannel::Cool), 15);
}
