//! Camera follow with map-edge clamping.
//!
//! Each axis is handled on its own. When the map is no larger than the
//! viewport on an axis the camera pins to the map's center there; otherwise
//! it follows the actor but stops half a viewport short of each edge, so the
//! area outside the map is never shown.

use glam::Vec2;

use crate::collision::MapBounds;

/// The point the viewport is centered on, with the viewport half-extents it
/// was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraFocus {
    pub center: Vec2,
    pub half_extents: Vec2,
}

#[derive(Debug, Clone)]
pub struct CameraController {
    viewport: Vec2,
    half_extents: Vec2,
    focus: Vec2,
}

impl CameraController {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        let mut camera = Self {
            viewport: Vec2::ZERO,
            half_extents: Vec2::ZERO,
            focus: Vec2::ZERO,
        };
        camera.resize(viewport_width, viewport_height);
        camera
    }

    /// Records a new viewport size in world units. The focus is left as is;
    /// call `follow` afterwards to reclamp it.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(0.0), height.max(0.0));
        self.half_extents = self.viewport * 0.5;
    }

    pub fn follow(&mut self, target: Vec2, bounds: MapBounds) -> Vec2 {
        self.focus = focus_for(target, self.viewport, bounds);
        self.focus
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn half_extents(&self) -> Vec2 {
        self.half_extents
    }

    pub fn focus(&self) -> CameraFocus {
        CameraFocus {
            center: self.focus,
            half_extents: self.half_extents,
        }
    }
}

pub fn focus_for(target: Vec2, viewport: Vec2, bounds: MapBounds) -> Vec2 {
    Vec2::new(
        focus_axis(target.x, viewport.x, bounds.width),
        focus_axis(target.y, viewport.y, bounds.height),
    )
}

fn focus_axis(target: f32, viewport: f32, map_extent: f32) -> f32 {
    if map_extent <= viewport {
        map_extent * 0.5
    } else {
        let half = viewport * 0.5;
        target.clamp(half, map_extent - half)
    }
}
