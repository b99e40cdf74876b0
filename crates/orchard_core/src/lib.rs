//! Simulation core for a single actor walking a bounded, tile-sized 2D world.
//!
//! Everything in this crate is frame-synchronous and owns no window or GPU
//! resources. Hosts feed it wall-clock deltas, keyboard state and resize
//! events, and read back the actor position and camera focus to draw.

pub mod camera;
pub mod collision;
pub mod config;
pub mod input;
pub mod map;
pub mod movement;
pub mod render;
pub mod replay;
pub mod scene;
pub mod time;

pub use camera::{CameraController, CameraFocus};
pub use collision::{Aabb, ActorBody, CollisionGeometry, MapBounds, StepOutcome};
pub use config::{load_config_from_path, ConfigError, DebugConfig, GameConfig};
pub use input::{DirectionalInput, InputSampler, InputState, Key};
pub use map::{load_map_from_path, MapData, MapLoadError};
pub use render::{LineColor, Region, RenderTarget};
pub use scene::{SceneError, SceneState};
pub use time::FixedStepScheduler;
