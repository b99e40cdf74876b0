//! CPU-side quad list rebuilt every frame from the scene's draw requests.

use std::collections::HashMap;

use glam::Vec2;
use orchard_core::{Aabb, LineColor, Region, RenderTarget};

use crate::vertex::QuadVertex;

/// How a texture region is stood in for until real art is bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionStyle {
    pub size: Vec2,
    pub color: [f32; 4],
}

pub struct QuadBatch {
    pub vertices: Vec<QuadVertex>,
    pub indices: Vec<u32>,
    /// Outline thickness in world pixels.
    pub line_width: f32,
    regions: HashMap<Region, RegionStyle>,
}

impl QuadBatch {
    pub fn new(line_width: f32) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            line_width,
            regions: HashMap::new(),
        }
    }

    pub fn set_region_style(&mut self, region: Region, style: RegionStyle) {
        self.regions.insert(region, style);
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Filled axis-aligned quad from its bottom-left corner.
    pub fn push_quad(&mut self, min: Vec2, size: Vec2, color: [f32; 4]) {
        let max = min + size;
        let base_index = self.vertices.len() as u32;

        self.vertices.push(QuadVertex {
            position: [min.x, min.y],
            color,
        });
        self.vertices.push(QuadVertex {
            position: [max.x, min.y],
            color,
        });
        self.vertices.push(QuadVertex {
            position: [max.x, max.y],
            color,
        });
        self.vertices.push(QuadVertex {
            position: [min.x, max.y],
            color,
        });

        self.indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);
    }
}

impl RenderTarget for QuadBatch {
    fn draw_region(&mut self, region: Region, x: f32, y: f32) {
        let Some(style) = self.regions.get(&region).copied() else {
            log::warn!("No style registered for region {:?}", region);
            return;
        };
        self.push_quad(Vec2::new(x, y), style.size, style.color);
    }

    fn draw_rect_lines(&mut self, rect: Aabb, color: LineColor) {
        let rgba = color.rgba();
        let min = rect.min();
        let size = Vec2::new(rect.width, rect.height);
        let t = self.line_width.min(size.x * 0.5).min(size.y * 0.5).max(0.0);

        // Bottom, top, left, right. Side strips skip the corners.
        self.push_quad(min, Vec2::new(size.x, t), rgba);
        self.push_quad(Vec2::new(min.x, min.y + size.y - t), Vec2::new(size.x, t), rgba);
        self.push_quad(
            Vec2::new(min.x, min.y + t),
            Vec2::new(t, size.y - 2.0 * t),
            rgba,
        );
        self.push_quad(
            Vec2::new(min.x + size.x - t, min.y + t),
            Vec2::new(t, size.y - 2.0 * t),
            rgba,
        );
    }
}
