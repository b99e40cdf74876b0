//! Scene lifecycle and the per-step update.
//!
//! A scene is either not shown (the host holds no `SceneState`) or shown
//! (after `setup`). Teardown consumes the state, so a torn-down scene cannot
//! be updated again.
//!
//! One `update` is the atomic unit the scheduler runs: sample input, propose
//! a move, accept or reject it against the obstacles, clamp to the map, then
//! re-aim the camera.

use std::path::Path;

use glam::Vec2;
use thiserror::Error;

use crate::camera::{focus_for, CameraController, CameraFocus};
use crate::collision::{
    resolve_move, Aabb, ActorBody, CollisionGeometry, MapBounds, StepOutcome,
};
use crate::config::{ConfigError, GameConfig};
use crate::input::{DirectionalInput, InputSampler};
use crate::map::{load_map_from_path, MapData, MapLoadError};
use crate::movement::propose_move;
use crate::time::FixedStepScheduler;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Map(#[from] MapLoadError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepCounts {
    pub accepted: u64,
    pub rejected: u64,
    pub idle: u64,
}

impl StepCounts {
    pub fn total(&self) -> u64 {
        self.accepted + self.rejected + self.idle
    }

    pub(crate) fn record(&mut self, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Accepted => self.accepted += 1,
            StepOutcome::Rejected => self.rejected += 1,
            StepOutcome::Idle => self.idle += 1,
        }
    }
}

pub struct SceneState {
    pub bounds: MapBounds,
    pub geometry: CollisionGeometry,
    pub body: ActorBody,
    pub move_speed: f32,
    pub position: Vec2,
    /// Position before the most recent step.
    pub previous_position: Vec2,
    pub camera: CameraController,
    pub scheduler: FixedStepScheduler,
    pub counts: StepCounts,
}

impl SceneState {
    pub fn camera_focus(&self) -> CameraFocus {
        self.camera.focus()
    }

    pub fn collision_box(&self) -> Aabb {
        self.body.collision_box_at(self.position)
    }

    /// Blend between the last two steps; `alpha` is the scheduler's leftover
    /// fraction of a step.
    pub fn interpolated_position(&self, alpha: f32) -> Vec2 {
        self.previous_position
            .lerp(self.position, alpha.clamp(0.0, 1.0))
    }

    /// Camera focus for drawing at `interpolated_position(alpha)`, clamped
    /// the same way the simulation clamps it.
    pub fn interpolated_focus(&self, alpha: f32) -> CameraFocus {
        CameraFocus {
            center: focus_for(
                self.interpolated_position(alpha),
                self.camera.viewport(),
                self.bounds,
            ),
            half_extents: self.camera.half_extents(),
        }
    }
}

/// Builds a shown scene: actor at the map center, camera aimed at it.
pub fn setup(map: MapData, config: &GameConfig) -> Result<SceneState, SceneError> {
    config.validate()?;

    let bounds = map.bounds;
    let body = config.actor.body();
    let position = bounds.center();
    let mut camera = CameraController::new(config.viewport.width, config.viewport.height);
    camera.follow(position, bounds);

    log::info!(
        "Scene shown: map {}x{} px, {} obstacles, actor at ({}, {})",
        bounds.width,
        bounds.height,
        map.collision.len(),
        position.x,
        position.y
    );

    Ok(SceneState {
        bounds,
        geometry: map.collision,
        body,
        move_speed: config.move_speed,
        position,
        previous_position: position,
        camera,
        scheduler: FixedStepScheduler::new(config.fixed_dt, config.max_frame_dt),
        counts: StepCounts::default(),
    })
}

pub fn load_scene(map_path: &Path, config: &GameConfig) -> Result<SceneState, SceneError> {
    let map = load_map_from_path(map_path)?;
    setup(map, config)
}

/// One fixed simulation step.
pub fn update(state: &mut SceneState, input: DirectionalInput, dt: f32) -> StepOutcome {
    state.previous_position = state.position;
    let outcome = match propose_move(state.position, input, state.move_speed, dt) {
        Some(candidate) => {
            let (position, outcome) =
                resolve_move(state.position, candidate, &state.body, &state.geometry);
            state.position = position;
            outcome
        }
        None => StepOutcome::Idle,
    };

    // Identity for in-range positions, so a rejected step stays bit-identical.
    state.position = state
        .bounds
        .clamp(state.position, state.body.visual_half_extents());
    state.camera.follow(state.position, state.bounds);
    state.counts.record(outcome);
    outcome
}

/// Feeds one rendered frame's wall-clock delta and runs as many fixed steps
/// as it pays for, sampling input before each. Returns the step count.
pub fn frame(state: &mut SceneState, frame_dt: f64, input: &impl InputSampler) -> u32 {
    state.scheduler.begin_frame(frame_dt);
    while state.scheduler.should_step() {
        let dt = state.scheduler.fixed_dt as f32;
        update(state, input.sample(), dt);
    }
    state.scheduler.end_frame();
    state.scheduler.steps_this_frame
}

/// Viewport size in world units changed; reclamp the camera right away.
pub fn resize(state: &mut SceneState, width: f32, height: f32) {
    state.camera.resize(width, height);
    state.camera.follow(state.position, state.bounds);
    log::info!("Viewport resized to {}x{}", width, height);
}

pub fn teardown(state: SceneState) {
    let counts = state.counts;
    log::info!(
        "Scene torn down after {} steps ({} moved, {} blocked, {} idle)",
        counts.total(),
        counts.accepted,
        counts.rejected,
        counts.idle
    );
    log::info!(
        "Simulated {:.2}s of {:.2}s wall time fed to the scheduler",
        state.scheduler.total_time,
        state.scheduler.fed_time
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_map(width: f32, height: f32) -> MapData {
        MapData {
            bounds: MapBounds::new(width, height),
            tile_width: 16,
            tile_height: 16,
            collision: CollisionGeometry::default(),
        }
    }

    #[test]
    fn setup_centers_actor_and_camera() {
        let state = setup(open_map(5120.0, 2880.0), &GameConfig::default()).expect("setup");
        assert_eq!(state.position, Vec2::new(2560.0, 1440.0));
        assert_eq!(state.camera_focus().center, Vec2::new(2560.0, 1440.0));
        assert_eq!(state.camera_focus().half_extents, Vec2::new(320.0, 180.0));
    }

    #[test]
    fn setup_rejects_invalid_config() {
        let config = GameConfig {
            fixed_dt: -1.0,
            ..GameConfig::default()
        };
        let err = setup(open_map(100.0, 100.0), &config).err().expect("invalid config");
        assert!(matches!(err, SceneError::Config(_)));
    }

    #[test]
    fn idle_update_changes_nothing() {
        let mut state = setup(open_map(1000.0, 1000.0), &GameConfig::default()).expect("setup");
        let before = state.position;
        let outcome = update(&mut state, DirectionalInput::NONE, 1.0 / 60.0);
        assert_eq!(outcome, StepOutcome::Idle);
        assert_eq!(state.position, before);
        assert_eq!(state.counts.idle, 1);
    }

    #[test]
    fn rejected_step_still_reaims_camera_after_resize() {
        let mut map = open_map(5120.0, 2880.0);
        map.collision = CollisionGeometry::new(vec![Aabb::new(2560.0, 0.0, 64.0, 2880.0)]);
        let mut state = setup(map, &GameConfig::default()).expect("setup");
        state.position = Vec2::new(2552.0, 50.0);
        state.camera.resize(320.0, 180.0);

        let outcome = update(&mut state, DirectionalInput::RIGHT, 1.0 / 60.0);
        assert_eq!(outcome, StepOutcome::Rejected);
        assert_eq!(state.position, Vec2::new(2552.0, 50.0));
        assert_eq!(state.camera_focus().center, Vec2::new(2552.0, 90.0));
    }

    #[test]
    fn rejected_step_from_out_of_range_position_is_clamped() {
        let mut map = open_map(200.0, 120.0);
        map.collision = CollisionGeometry::new(vec![Aabb::new(180.0, 40.0, 20.0, 30.0)]);
        let mut state = setup(map, &GameConfig::default()).expect("setup");
        // Past the right clamp edge at 200 - 16.
        state.position = Vec2::new(190.0, 60.0);

        let outcome = update(&mut state, DirectionalInput::RIGHT, 1.0 / 60.0);
        assert_eq!(outcome, StepOutcome::Rejected);
        assert_eq!(state.position, Vec2::new(184.0, 60.0));
    }

    #[test]
    fn actor_never_leaves_map_bounds() {
        let mut state = setup(open_map(200.0, 120.0), &GameConfig::default()).expect("setup");
        let directions = [
            DirectionalInput::RIGHT,
            DirectionalInput {
                up: true,
                left: true,
                ..DirectionalInput::NONE
            },
            DirectionalInput {
                down: true,
                ..DirectionalInput::NONE
            },
            DirectionalInput {
                left: true,
                down: true,
                ..DirectionalInput::NONE
            },
        ];
        for input in directions {
            for _ in 0..200 {
                update(&mut state, input, 1.0 / 60.0);
                assert!(state.position.x >= 16.0 && state.position.x <= 184.0);
                assert!(state.position.y >= 16.0 && state.position.y <= 104.0);
            }
        }
    }

    #[test]
    fn frame_runs_whole_steps_and_samples_input() {
        let mut state = setup(open_map(5120.0, 2880.0), &GameConfig::default()).expect("setup");
        let steps = frame(&mut state, 0.05, &DirectionalInput::RIGHT);
        assert_eq!(steps, 3);
        assert!(state.position.x > 2560.0);
        assert_eq!(state.counts.accepted, 3);
        assert_eq!(state.counts.total(), 3);
    }

    #[test]
    fn interpolation_blends_the_last_step() {
        let mut state = setup(open_map(5120.0, 2880.0), &GameConfig::default()).expect("setup");
        // 1.5 steps: one update runs, half a step stays in the accumulator.
        let steps = frame(&mut state, 1.5 / 60.0, &DirectionalInput::RIGHT);
        assert_eq!(steps, 1);
        let alpha = state.scheduler.interpolation_alpha as f32;
        assert!((alpha - 0.5).abs() < 1e-4);

        let drawn = state.interpolated_position(alpha);
        let expected_x = (state.previous_position.x + state.position.x) * 0.5;
        assert!((drawn.x - expected_x).abs() < 1e-3);
        assert_eq!(state.interpolated_position(1.0), state.position);
        assert_eq!(state.interpolated_focus(1.0), state.camera_focus());
    }

    #[test]
    fn interpolated_focus_stays_clamped_at_map_edge() {
        let mut state = setup(open_map(5120.0, 2880.0), &GameConfig::default()).expect("setup");
        state.position = Vec2::new(16.0, 16.0);
        update(&mut state, DirectionalInput::NONE, 1.0 / 60.0);
        let focus = state.interpolated_focus(0.3);
        assert_eq!(focus.center, Vec2::new(320.0, 180.0));
    }

    #[test]
    fn resize_reclamps_focus_immediately() {
        let mut state = setup(open_map(5120.0, 2880.0), &GameConfig::default()).expect("setup");
        state.position = Vec2::new(100.0, 100.0);
        state.camera.follow(state.position, state.bounds);
        assert_eq!(state.camera_focus().center, Vec2::new(320.0, 180.0));

        resize(&mut state, 320.0, 180.0);
        assert_eq!(state.camera_focus().half_extents, Vec2::new(160.0, 90.0));
        assert_eq!(state.camera_focus().center, Vec2::new(160.0, 100.0));
    }
}
