//! Draw requests issued by a shown scene.
//!
//! The core never touches GPU resources. It describes what to draw through
//! `RenderTarget` and the host decides how: textured regions, colored quads,
//! or a recording list in tests.

use glam::Vec2;

use crate::collision::Aabb;
use crate::config::DebugConfig;
use crate::scene::SceneState;

/// Opaque handle for a texture region owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    ActorIdle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineColor {
    Red,
    Green,
}

impl LineColor {
    pub fn rgba(self) -> [f32; 4] {
        match self {
            Self::Red => [1.0, 0.0, 0.0, 1.0],
            Self::Green => [0.0, 1.0, 0.0, 1.0],
        }
    }
}

pub trait RenderTarget {
    /// Draws `region` with its bottom-left corner at (x, y) in world space.
    fn draw_region(&mut self, region: Region, x: f32, y: f32);
    /// Outline only, for debug views.
    fn draw_rect_lines(&mut self, rect: Aabb, color: LineColor);
}

/// Emits the actor sprite, and with `debug.draw_collision_boxes` the
/// obstacles in red and the actor's collision box in green.
pub fn render(state: &SceneState, target: &mut impl RenderTarget, debug: &DebugConfig) {
    render_at(state, state.position, target, debug);
}

/// Same as `render` with the actor drawn at `position`, e.g. a position
/// interpolated between fixed steps.
pub fn render_at(
    state: &SceneState,
    position: Vec2,
    target: &mut impl RenderTarget,
    debug: &DebugConfig,
) {
    let sprite_min = position - state.body.visual_half_extents();
    target.draw_region(Region::ActorIdle, sprite_min.x, sprite_min.y);

    if debug.draw_collision_boxes {
        for rect in state.geometry.iter() {
            target.draw_rect_lines(*rect, LineColor::Red);
        }
        target.draw_rect_lines(state.body.collision_box_at(position), LineColor::Green);
    }
}
