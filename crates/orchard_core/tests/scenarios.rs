use glam::Vec2;
use orchard_core::collision::{Aabb, CollisionGeometry, StepOutcome};
use orchard_core::input::DirectionalInput;
use orchard_core::scene::{self, SceneState};
use orchard_core::{GameConfig, MapData};

const FARM_MAP: &str = r#"{
  "width": 320,
  "height": 180,
  "tilewidth": 16,
  "tileheight": 16,
  "layers": [
    { "name": "Collision", "type": "objectgroup", "objects": [] }
  ]
}"#;

fn farm_scene() -> SceneState {
    let map = MapData::from_json_str(FARM_MAP).expect("farm map loads");
    scene::setup(map, &GameConfig::default()).expect("setup")
}

#[test]
fn holding_right_for_one_second_moves_two_hundred_pixels() {
    let mut state = farm_scene();
    assert_eq!(state.bounds.size(), Vec2::new(5120.0, 2880.0));
    assert_eq!(state.position, Vec2::new(2560.0, 1440.0));

    let fixed_dt = state.scheduler.fixed_dt;
    let mut steps = 0;
    for _ in 0..60 {
        steps += scene::frame(&mut state, fixed_dt, &DirectionalInput::RIGHT);
    }

    assert_eq!(steps, 60);
    assert!((state.position.x - 2760.0).abs() <= 1.0, "x = {}", state.position.x);
    assert_eq!(state.position.y, 1440.0);
}

#[test]
fn obstacle_across_the_path_freezes_the_actor_exactly() {
    let mut map = MapData::from_json_str(FARM_MAP).expect("farm map loads");
    // Covers the actor's collision box and everything just to its right.
    map.collision = CollisionGeometry::new(vec![Aabb::new(2562.0, 1400.0, 100.0, 100.0)]);
    let mut state = scene::setup(map, &GameConfig::default()).expect("setup");

    let before = state.position;
    let outcome = scene::update(&mut state, DirectionalInput::RIGHT, 1.0 / 60.0);

    assert_eq!(outcome, StepOutcome::Rejected);
    assert_eq!(state.position.x.to_bits(), before.x.to_bits());
    assert_eq!(state.position.y.to_bits(), before.y.to_bits());
}

#[test]
fn resize_recomputes_half_extents_and_reclamps() {
    let mut state = farm_scene();
    // Walk to the bottom-left corner so the clamp band matters.
    for _ in 0..2000 {
        scene::update(
            &mut state,
            DirectionalInput {
                left: true,
                down: true,
                ..DirectionalInput::NONE
            },
            1.0 / 60.0,
        );
    }
    assert_eq!(state.position, Vec2::new(16.0, 16.0));
    assert_eq!(state.camera_focus().center, Vec2::new(320.0, 180.0));

    scene::resize(&mut state, 320.0, 180.0);
    let focus = state.camera_focus();
    assert_eq!(focus.half_extents, Vec2::new(160.0, 90.0));
    assert_eq!(focus.center, Vec2::new(160.0, 90.0));
}

#[test]
fn position_stays_in_bounds_under_any_input() {
    let mut state = farm_scene();
    let inputs = [
        DirectionalInput::RIGHT,
        DirectionalInput {
            up: true,
            ..DirectionalInput::NONE
        },
        DirectionalInput {
            left: true,
            up: true,
            ..DirectionalInput::NONE
        },
        DirectionalInput {
            down: true,
            right: true,
            ..DirectionalInput::NONE
        },
    ];
    for input in inputs {
        for _ in 0..1200 {
            scene::frame(&mut state, 0.1, &input);
            assert!(state.position.x >= 16.0 && state.position.x <= 5104.0);
            assert!(state.position.y >= 16.0 && state.position.y <= 2864.0);

            let center = state.camera_focus().center;
            assert!(center.x >= 320.0 && center.x <= 4800.0);
            assert!(center.y >= 180.0 && center.y <= 2700.0);
        }
    }
}

#[test]
fn small_map_keeps_camera_centered() {
    let map = MapData::from_json_str(
        r#"{"width":20,"height":10,"tilewidth":16,"tileheight":16,
            "layers":[{"name":"Collision","type":"objectgroup","objects":[]}]}"#,
    )
    .expect("small map loads");
    let mut state = scene::setup(map, &GameConfig::default()).expect("setup");
    for _ in 0..120 {
        scene::update(&mut state, DirectionalInput::RIGHT, 1.0 / 60.0);
        assert_eq!(state.camera_focus().center, Vec2::new(160.0, 80.0));
    }
    assert_eq!(state.position.x, 304.0);
}

#[test]
fn teardown_consumes_the_scene() {
    let state = farm_scene();
    scene::teardown(state);
}

#[test]
fn shipped_assets_load_and_replay() {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
    let config = orchard_core::load_config_from_path(&root.join("assets/config/game.json"))
        .expect("shipped config loads");
    assert_eq!(config, GameConfig::default());

    let mut state = scene::load_scene(&root.join("assets/maps/farm.json"), &config)
        .expect("shipped map loads");
    assert_eq!(state.geometry.len(), 9);
    // Tiled's top-down y is flipped: the farmhouse sits at y = 2880 - 1200 - 80.
    assert_eq!(
        state.geometry.iter().next().copied(),
        Some(Aabb::new(2400.0, 1600.0, 112.0, 80.0))
    );
    assert!(!state.geometry.collides(&state.collision_box()));

    let replay =
        orchard_core::replay::load_replay_from_path(&root.join("assets/replays/walk_right.json"))
            .expect("shipped replay loads");
    let counts = replay.run(&mut state);
    assert_eq!(counts.total(), 270);
    assert_eq!(counts.idle, 15);
}
