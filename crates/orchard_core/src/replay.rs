use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::input::DirectionalInput;
use crate::scene::{update, SceneState, StepCounts};

/// About 46 hours of input at 60 steps per second.
pub const MAX_REPLAY_STEPS: u64 = 10_000_000;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read replay {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse replay JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("replay validation failed: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt")]
    pub fixed_dt: f32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub up: bool,
    #[serde(default)]
    pub down: bool,
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    pub fn from_json_str(raw: &str) -> Result<Self, ReplayError> {
        let replay: ReplaySequence = serde_json::from_str(raw)?;
        validate_replay(&replay)?;
        Ok(replay)
    }

    /// One input per fixed step, with `repeat` unrolled lazily. A repeat
    /// of 0 still plays once.
    pub fn inputs(&self) -> impl Iterator<Item = DirectionalInput> + '_ {
        self.frames.iter().flat_map(|frame| {
            std::iter::repeat(frame.input()).take(frame.step_count() as usize)
        })
    }

    pub fn expanded_inputs(&self) -> Vec<DirectionalInput> {
        self.inputs().collect()
    }

    pub fn total_steps(&self) -> u64 {
        self.frames.iter().map(ReplayFrame::step_count).sum()
    }

    /// Drives `state` one fixed step per expanded input, bypassing the
    /// wall-clock scheduler so runs are reproducible.
    pub fn run(&self, state: &mut SceneState) -> StepCounts {
        let mut counts = StepCounts::default();
        for input in self.inputs() {
            counts.record(update(state, input, self.fixed_dt));
        }
        counts
    }
}

impl ReplayFrame {
    fn input(&self) -> DirectionalInput {
        DirectionalInput {
            up: self.up,
            down: self.down,
            left: self.left,
            right: self.right,
        }
    }

    fn step_count(&self) -> u64 {
        u64::from(self.repeat.max(1))
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, ReplayError> {
    let raw = fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ReplaySequence::from_json_str(&raw)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), ReplayError> {
    if !(replay.fixed_dt > 0.0) {
        return Err(ReplayError::Invalid("fixed_dt must be > 0"));
    }
    if replay.frames.is_empty() {
        return Err(ReplayError::Invalid("frames list is empty"));
    }
    if replay.total_steps() > MAX_REPLAY_STEPS {
        return Err(ReplayError::Invalid("replay exceeds the step limit"));
    }
    Ok(())
}

const fn default_dt() -> f32 {
    1.0 / 60.0
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{Aabb, CollisionGeometry, MapBounds};
    use crate::config::GameConfig;
    use crate::map::MapData;
    use crate::scene::setup;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "orchard_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn fenced_scene() -> SceneState {
        let map = MapData {
            bounds: MapBounds::new(640.0, 480.0),
            tile_width: 16,
            tile_height: 16,
            collision: CollisionGeometry::new(vec![
                Aabb::new(400.0, 0.0, 32.0, 480.0),
                Aabb::new(100.0, 300.0, 64.0, 64.0),
            ]),
        };
        setup(map, &GameConfig::default()).expect("setup")
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "fixed_dt": 0.016666667,
              "frames": [
                { "right": true, "repeat": 3 },
                { "up": true, "left": true }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 4);
        assert!(expanded[0].right);
        assert!(expanded[3].up && expanded[3].left);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn zero_repeat_still_plays_once() {
        let replay =
            ReplaySequence::from_json_str(r#"{ "frames": [ { "down": true, "repeat": 0 } ] }"#)
                .expect("replay should parse");
        assert_eq!(replay.expanded_inputs().len(), 1);
    }

    #[test]
    fn oversized_repeat_is_rejected_before_running() {
        let err = ReplaySequence::from_json_str(
            r#"{ "frames": [ { "right": true, "repeat": 4000000000 } ] }"#,
        )
        .expect_err("step limit");
        assert!(matches!(err, ReplayError::Invalid(_)));
        assert!(err.to_string().contains("step limit"));
    }

    #[test]
    fn inputs_unroll_without_collecting() {
        let replay = ReplaySequence::from_json_str(
            r#"{ "frames": [ { "left": true, "repeat": 3 }, { "repeat": 0 }, { "up": true } ] }"#,
        )
        .expect("replay should parse");
        assert_eq!(replay.total_steps(), 5);
        let mut inputs = replay.inputs();
        assert!(inputs.next().is_some_and(|input| input.left));
        assert_eq!(inputs.by_ref().take(2).count(), 2);
        assert!(inputs.next().is_some_and(|input| input.is_idle()));
        assert!(inputs.next().is_some_and(|input| input.up));
        assert!(inputs.next().is_none());
    }

    #[test]
    fn empty_frames_are_rejected() {
        let err = ReplaySequence::from_json_str(r#"{ "frames": [] }"#).expect_err("empty");
        assert!(err.to_string().contains("frames list is empty"));
    }

    #[test]
    fn replay_run_is_deterministic() {
        let replay = ReplaySequence::from_json_str(
            r#"{
              "frames": [
                { "right": true, "repeat": 90 },
                { "up": true, "right": true, "repeat": 40 },
                { "left": true, "repeat": 120 },
                { "down": true, "left": true, "repeat": 45 }
              ]
            }"#,
        )
        .expect("replay should parse");

        let mut run_a = fenced_scene();
        let mut run_b = fenced_scene();
        let counts_a = replay.run(&mut run_a);
        let counts_b = replay.run(&mut run_b);

        assert_eq!(run_a.position, run_b.position);
        assert_eq!(run_a.camera_focus(), run_b.camera_focus());
        assert_eq!(counts_a, counts_b);
        // The wall at x=400 stops the actor before the first segment ends.
        assert!(counts_a.rejected > 0);
    }
}
