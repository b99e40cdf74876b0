use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::error::OsError;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

/// Window title and initial size in physical pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Smallest size the user may shrink the window to.
    pub min_width: u32,
    pub min_height: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self::for_viewport("The Last Orchard", 640.0, 360.0, 2.0)
    }
}

impl PlatformConfig {
    /// Sized so `viewport` world pixels fill the window at `zoom`. The
    /// minimum is half the viewport on each axis.
    pub fn for_viewport(title: &str, viewport_width: f32, viewport_height: f32, zoom: f32) -> Self {
        let scaled = |extent: f32, factor: f32| (extent * factor).round().max(1.0) as u32;
        Self {
            title: title.to_string(),
            width: scaled(viewport_width, zoom),
            height: scaled(viewport_height, zoom),
            min_width: scaled(viewport_width, 0.5),
            min_height: scaled(viewport_height, 0.5),
        }
    }

    fn attributes(&self) -> WindowAttributes {
        WindowAttributes::default()
            .with_title(&self.title)
            .with_inner_size(PhysicalSize::new(self.width, self.height))
            .with_min_inner_size(PhysicalSize::new(
                self.min_width.min(self.width),
                self.min_height.min(self.height),
            ))
            .with_resizable(true)
    }
}

pub fn create_window(
    event_loop: &ActiveEventLoop,
    config: &PlatformConfig,
) -> Result<Arc<Window>, OsError> {
    let window = event_loop.create_window(config.attributes())?;
    let size = window.inner_size();
    log::info!(
        "Window '{}' created: {}x{}",
        config.title,
        size.width,
        size.height
    );
    Ok(Arc::new(window))
}
