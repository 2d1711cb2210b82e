//! Integration tests for the player box against generated terrain
//! Dropping onto a flat floor must settle exactly one collision epsilon above it

use cgmath::Point3;
use voxel_sandbox::config::{EngineConfig, GeneratorConfig};
use voxel_sandbox::engine_state::entity::physics::COLLISION_EPSILON;
use voxel_sandbox::engine_state::timing::TICK_DURATION;
use voxel_sandbox::engine_state::EngineState;

const FLOOR_TOP: f32 = 4.0;

fn floor_engine() -> EngineState {
    let config = EngineConfig {
        chunk_radius: 1,
        generator: GeneratorConfig::Flat { depth: 4 },
        spawn_position: [8.5, 10.0, 8.5],
        ..EngineConfig::default()
    };
    let mut engine = EngineState::new(&config);
    // Preload the whole radius so the floor exists before the first tick.
    for x in -1..=1 {
        for y in -1..=1 {
            for z in -1..=1 {
                engine.world.add_chunk_at(Point3::new(x, y, z));
            }
        }
    }
    engine
}

#[test]
fn test_drop_comes_to_rest_on_the_floor() {
    let mut engine = floor_engine();
    assert_eq!(engine.advance(TICK_DURATION * 60), 60);

    let player = &engine.player;
    let rest = FLOOR_TOP + COLLISION_EPSILON + player.height / 2.0;
    assert!(
        (player.current_position.y - rest).abs() < 1e-4,
        "resting at {}",
        player.current_position.y
    );
    assert!(player.on_ground);
    assert_eq!(player.velocity.y, 0.0);
    assert!((player.current_position.x - 8.5).abs() < 1e-5);
    assert!((player.current_position.z - 8.5).abs() < 1e-5);
}

#[test]
fn test_resting_player_stays_grounded_over_time() {
    let mut engine = floor_engine();
    engine.advance(TICK_DURATION * 60);
    let rest = engine.player.current_position;

    engine.advance(TICK_DURATION * 40);
    assert!(engine.player.on_ground);
    assert!((engine.player.current_position.y - rest.y).abs() < 1e-5);
    assert!((engine.player.previous_position.y - engine.player.current_position.y).abs() < 1e-5);
}

#[test]
fn test_fall_never_passes_through_the_floor() {
    let mut engine = floor_engine();
    let feet = |engine: &EngineState| engine.player.current_position.y - engine.player.height / 2.0;
    for _ in 0..60 {
        engine.tick();
        assert!(feet(&engine) >= FLOOR_TOP, "feet sank to {}", feet(&engine));
    }
}

#[test]
fn test_jump_leaves_the_ground_and_lands_again() {
    let mut engine = floor_engine();
    engine.advance(TICK_DURATION * 60);
    let rest = engine.player.current_position.y;

    engine.player_actions.movement.jump = true;
    engine.tick();
    engine.player_actions.movement.jump = false;
    assert!(!engine.player.on_ground);
    assert!(engine.player.current_position.y > rest);

    engine.advance(TICK_DURATION * 40);
    assert!(engine.player.on_ground);
    assert!((engine.player.current_position.y - rest).abs() < 1e-4);
}
