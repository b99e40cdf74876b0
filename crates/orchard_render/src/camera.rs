use glam::{Mat4, Vec2};
use orchard_core::CameraFocus;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Orthographic view of the world around the simulation's camera focus.
/// `half_extents` are in world pixels, so the window's zoom is already
/// folded in by whoever sized the viewport.
pub struct Camera2D {
    pub position: Vec2,
    pub half_extents: Vec2,
}

impl Camera2D {
    pub fn new(focus: CameraFocus) -> Self {
        Self {
            position: focus.center,
            half_extents: focus.half_extents,
        }
    }

    pub fn set_focus(&mut self, focus: CameraFocus) {
        self.position = focus.center;
        self.half_extents = focus.half_extents;
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let half_w = self.half_extents.x.max(f32::EPSILON);
        let half_h = self.half_extents.y.max(f32::EPSILON);

        let proj = Mat4::orthographic_rh(
            self.position.x - half_w,
            self.position.x + half_w,
            self.position.y - half_h,
            self.position.y + half_h,
            -1.0,
            1.0,
        );

        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}
