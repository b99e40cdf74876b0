//! Native window creation for the game binary.

pub mod window;

pub use window::{create_window, PlatformConfig};
