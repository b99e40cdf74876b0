//! Typed loader for Tiled JSON maps.
//!
//! Only the pieces the simulation needs are decoded: the map size in tiles,
//! the tile size, and the object layer named `Collision`. The layer is
//! checked once here, at load time. A missing layer, a layer of the wrong
//! kind, or any non-rectangle object fails the load instead of yielding an
//! empty obstacle set that would let the actor walk through everything.
//!
//! Tiled stores object coordinates with y growing downwards from the top of
//! the map. The simulation uses y-up world space, so every rectangle is
//! flipped on load.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::collision::{Aabb, CollisionGeometry, MapBounds};

pub const COLLISION_LAYER: &str = "Collision";
const OBJECT_GROUP: &str = "objectgroup";

#[derive(Debug, Error)]
pub enum MapLoadError {
    #[error("failed to read map {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse map JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tile size must be > 0, got {width}x{height}")]
    InvalidTileSize { width: i32, height: i32 },
    #[error("map size {width}x{height} tiles is negative or too large")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("map has no '{0}' layer")]
    MissingLayer(String),
    #[error("layer '{name}' must be an object group, found '{found}'")]
    WrongLayerType { name: String, found: String },
    #[error("collision object {id} is a {shape}; only rectangles are supported")]
    NonRectangleObject { id: u32, shape: &'static str },
    #[error("collision object {id} has negative size {width}x{height}")]
    NegativeObjectSize { id: u32, width: f32, height: f32 },
}

#[derive(Debug, Deserialize, Clone)]
pub struct TiledMapFile {
    pub width: i32,
    pub height: i32,
    #[serde(rename = "tilewidth")]
    pub tile_width: i32,
    #[serde(rename = "tileheight")]
    pub tile_height: i32,
    #[serde(default)]
    pub layers: Vec<TiledLayer>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TiledLayer {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub objects: Vec<TiledObject>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TiledObject {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub ellipse: bool,
    #[serde(default)]
    pub point: bool,
    #[serde(default)]
    pub polygon: Option<Vec<TiledPoint>>,
    #[serde(default)]
    pub polyline: Option<Vec<TiledPoint>>,
    #[serde(default)]
    pub text: Option<serde_json::Value>,
    #[serde(default)]
    pub gid: Option<u32>,
    /// Degrees clockwise around the object's top-left corner.
    #[serde(default)]
    pub rotation: f32,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct TiledPoint {
    pub x: f32,
    pub y: f32,
}

impl TiledObject {
    fn shape(&self) -> Option<&'static str> {
        if self.ellipse {
            Some("ellipse")
        } else if self.point {
            Some("point")
        } else if self.polygon.is_some() {
            Some("polygon")
        } else if self.polyline.is_some() {
            Some("polyline")
        } else if self.text.is_some() {
            Some("text")
        } else if self.gid.is_some() {
            Some("tile object")
        } else if self.rotation != 0.0 {
            Some("rotated rectangle")
        } else {
            None
        }
    }
}

/// Everything a scene needs from a map, in world units.
#[derive(Debug, Clone)]
pub struct MapData {
    pub bounds: MapBounds,
    pub tile_width: i32,
    pub tile_height: i32,
    pub collision: CollisionGeometry,
}

impl MapData {
    pub fn from_json_str(raw: &str) -> Result<Self, MapLoadError> {
        let file: TiledMapFile = serde_json::from_str(raw)?;
        Self::from_file(&file)
    }

    pub fn from_file(file: &TiledMapFile) -> Result<Self, MapLoadError> {
        if file.tile_width <= 0 || file.tile_height <= 0 {
            return Err(MapLoadError::InvalidTileSize {
                width: file.tile_width,
                height: file.tile_height,
            });
        }
        let pixel_size = file
            .width
            .checked_mul(file.tile_width)
            .zip(file.height.checked_mul(file.tile_height))
            .filter(|&(w, h)| w >= 0 && h >= 0);
        let Some((pixel_width, pixel_height)) = pixel_size else {
            return Err(MapLoadError::InvalidDimensions {
                width: file.width,
                height: file.height,
            });
        };

        let bounds = MapBounds::new(pixel_width as f32, pixel_height as f32);
        let layer = file
            .layers
            .iter()
            .find(|layer| layer.name == COLLISION_LAYER)
            .ok_or_else(|| MapLoadError::MissingLayer(COLLISION_LAYER.to_string()))?;
        if layer.kind != OBJECT_GROUP {
            return Err(MapLoadError::WrongLayerType {
                name: layer.name.clone(),
                found: layer.kind.clone(),
            });
        }

        let mut rects = Vec::with_capacity(layer.objects.len());
        for object in &layer.objects {
            rects.push(collision_rect(object, bounds.height)?);
        }
        log::info!("Loaded {} collision rectangles.", rects.len());

        Ok(Self {
            bounds,
            tile_width: file.tile_width,
            tile_height: file.tile_height,
            collision: CollisionGeometry::new(rects),
        })
    }
}

fn collision_rect(object: &TiledObject, map_height: f32) -> Result<Aabb, MapLoadError> {
    if let Some(shape) = object.shape() {
        return Err(MapLoadError::NonRectangleObject {
            id: object.id,
            shape,
        });
    }
    if object.width < 0.0 || object.height < 0.0 {
        return Err(MapLoadError::NegativeObjectSize {
            id: object.id,
            width: object.width,
            height: object.height,
        });
    }

    let rect = Aabb::new(
        object.x,
        map_height - object.y - object.height,
        object.width,
        object.height,
    );
    log::debug!(
        "Found collision rect '{}' {}x{} at ({}, {})",
        object.name,
        rect.width,
        rect.height,
        rect.x,
        rect.y
    );
    Ok(rect)
}

pub fn load_map_from_path(path: &Path) -> Result<MapData, MapLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| MapLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    MapData::from_json_str(&raw)
}
