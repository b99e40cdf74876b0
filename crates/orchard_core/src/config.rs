//! Gameplay tuning loaded from JSON. Every field is optional; missing ones
//! fall back to the defaults below.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

use crate::collision::ActorBody;
use crate::time::{DEFAULT_FIXED_DT, DEFAULT_MAX_FRAME_DT};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("config validation failed: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// Pixels per second.
    pub move_speed: f32,
    pub fixed_dt: f64,
    pub max_frame_dt: f64,
    pub actor: ActorConfig,
    pub viewport: ViewportConfig,
    pub debug: DebugConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ActorConfig {
    pub visual_width: f32,
    pub visual_height: f32,
    pub collision_width: f32,
    pub collision_height: f32,
    pub collision_offset_x: f32,
    pub collision_offset_y: f32,
}

/// Visible world area in pixels. `zoom` is window pixels per world pixel.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
    pub zoom: f32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct DebugConfig {
    pub draw_collision_boxes: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            move_speed: 200.0,
            fixed_dt: DEFAULT_FIXED_DT,
            max_frame_dt: DEFAULT_MAX_FRAME_DT,
            actor: ActorConfig::default(),
            viewport: ViewportConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            visual_width: 32.0,
            visual_height: 32.0,
            collision_width: 12.0,
            collision_height: 8.0,
            collision_offset_x: 0.5,
            collision_offset_y: -6.0,
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 360.0,
            zoom: 2.0,
        }
    }
}

impl ActorConfig {
    pub fn body(&self) -> ActorBody {
        ActorBody {
            visual_size: Vec2::new(self.visual_width, self.visual_height),
            collision_size: Vec2::new(self.collision_width, self.collision_height),
            collision_offset: Vec2::new(self.collision_offset_x, self.collision_offset_y),
        }
    }
}

impl GameConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.move_speed >= 0.0) {
            return Err(invalid("move_speed must be >= 0"));
        }
        if !(self.fixed_dt > 0.0) {
            return Err(invalid("fixed_dt must be > 0"));
        }
        if !(self.max_frame_dt >= self.fixed_dt) {
            return Err(invalid("max_frame_dt must be >= fixed_dt"));
        }
        let actor = &self.actor;
        let sizes = [
            actor.visual_width,
            actor.visual_height,
            actor.collision_width,
            actor.collision_height,
        ];
        if sizes.iter().any(|size| !(*size >= 0.0)) {
            return Err(invalid("actor sizes must be >= 0"));
        }
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(invalid("viewport width and height must be > 0"));
        }
        if !(self.viewport.zoom > 0.0) {
            return Err(invalid("viewport zoom must be > 0"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Invalid(message.to_string())
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    GameConfig::from_json_str(&raw)
}
