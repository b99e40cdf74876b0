//! Static rectangle collision for the actor.
//!
//! Movement is all-or-nothing: if the actor's collision box at the proposed
//! position overlaps any obstacle, the whole step is dropped and the actor
//! stays put. There is no per-axis slide, so pushing diagonally into a wall
//! stops the actor even though one axis alone would have been clear.
//!
//! The collision box is deliberately smaller than the sprite and shifted
//! towards its feet, while the map-edge clamp uses the full sprite extents.

use glam::Vec2;

/// Axis-aligned rectangle stored as min corner plus size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    /// Open-interval overlap: boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// World size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MapBounds {
    pub width: f32,
    pub height: f32,
}

impl MapBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Keeps a box with the given half-extents fully inside the map. On an
    /// axis where the map is narrower than the box, the box is centered.
    pub fn clamp(&self, position: Vec2, half_extents: Vec2) -> Vec2 {
        Vec2::new(
            clamp_axis(position.x, half_extents.x, self.width),
            clamp_axis(position.y, half_extents.y, self.height),
        )
    }
}

fn clamp_axis(value: f32, half: f32, extent: f32) -> f32 {
    if extent < half * 2.0 {
        extent * 0.5
    } else {
        value.clamp(half, extent - half)
    }
}

/// Obstacles loaded with the map. Read-only for the lifetime of a scene.
#[derive(Debug, Clone, Default)]
pub struct CollisionGeometry {
    rects: Vec<Aabb>,
}

impl CollisionGeometry {
    pub fn new(rects: Vec<Aabb>) -> Self {
        Self { rects }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Aabb> {
        self.rects.iter()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn first_overlap(&self, aabb: &Aabb) -> Option<&Aabb> {
        self.rects.iter().find(|rect| rect.overlaps(aabb))
    }

    pub fn collides(&self, aabb: &Aabb) -> bool {
        self.first_overlap(aabb).is_some()
    }
}

/// Sprite extents plus the smaller box used for obstacle tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorBody {
    pub visual_size: Vec2,
    pub collision_size: Vec2,
    pub collision_offset: Vec2,
}

impl ActorBody {
    pub fn visual_half_extents(&self) -> Vec2 {
        self.visual_size * 0.5
    }

    pub fn collision_box_at(&self, position: Vec2) -> Aabb {
        let min = position - self.collision_size * 0.5 + self.collision_offset;
        Aabb::new(
            min.x,
            min.y,
            self.collision_size.x,
            self.collision_size.y,
        )
    }

    pub fn visual_box_at(&self, position: Vec2) -> Aabb {
        let min = position - self.visual_half_extents();
        Aabb::new(min.x, min.y, self.visual_size.x, self.visual_size.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Idle,
    Accepted,
    Rejected,
}

/// Accepts `candidate` unless the body would overlap an obstacle there.
/// The returned position is not yet clamped to the map.
pub fn resolve_move(
    position: Vec2,
    candidate: Vec2,
    body: &ActorBody,
    geometry: &CollisionGeometry,
) -> (Vec2, StepOutcome) {
    let proposed = body.collision_box_at(candidate);
    match geometry.first_overlap(&proposed) {
        Some(hit) => {
            log::trace!(
                "Move to ({:.2}, {:.2}) blocked by obstacle at ({}, {}) {}x{}",
                candidate.x,
                candidate.y,
                hit.x,
                hit.y,
                hit.width,
                hit.height
            );
            (position, StepOutcome::Rejected)
        }
        None => (candidate, StepOutcome::Accepted),
    }
}
