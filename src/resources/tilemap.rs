//! Tilemap construction.
//!
//! [`load_tilemap`] turns a [`LevelDescription`] plus its sliced
//! [`SpriteSheet`] into a [`Tilemap`]: layers with their placed tiles, z-order
//! assigned, and the animated-tile families recognized. The result is not yet
//! attached to any world; mounting is done by
//! [`crate::systems::tilemap::mount_tilemap`].

use std::sync::Arc;

use bevy_ecs::prelude::{Entity, Resource};
use log::warn;
use raylib::prelude::Vector2;

use crate::components::animatedtile::AnimatedTile;
use crate::components::tile::Tile;
use crate::components::zindex::ZIndex;
use crate::resources::level::{LevelDescription, LoadError, TileError};
use crate::resources::spritesheet::{SpriteSheet, TileRegion};

/// Family name reserved for water tiles.
pub const WATER_FAMILY: &str = "water";
/// Default water cycle, as sprite-sheet indices.
pub const WATER_FRAMES: [u32; 4] = [48, 49, 50, 51];
/// Default milliseconds per water frame.
pub const WATER_FRAME_MS: f64 = 250.0;

/// A set of sprite-sheet ids that animate together through a fixed cycle.
///
/// Any placed tile whose id belongs to `frames` becomes an [`AnimatedTile`]
/// running the whole cycle from its first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedFamily {
    pub name: String,
    pub frames: Vec<u32>,
    pub frame_duration: f64,
}

impl AnimatedFamily {
    pub fn water(frame_duration: f64) -> Self {
        Self {
            name: WATER_FAMILY.to_string(),
            frames: WATER_FRAMES.to_vec(),
            frame_duration,
        }
    }

    pub fn matches(&self, id: u32) -> bool {
        self.frames.contains(&id)
    }

    fn animate(&self) -> AnimatedTile {
        AnimatedTile::new(self.frames.iter().copied(), self.frame_duration)
    }
}

/// One tile after resolution against the sprite sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedTile {
    pub tile: Tile,
    /// World position of the top-left corner, in pixels.
    pub pos: Vector2,
    pub region: TileRegion,
    pub animated: Option<AnimatedTile>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub collider: bool,
    /// Higher draws on top; the first layer of the level gets the highest value.
    pub z: i32,
    pub tiles: Vec<PlacedTile>,
    /// Container entity, set while mounted.
    pub container: Option<Entity>,
}

/// Tiles skipped while loading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub skipped: Vec<TileError>,
}

#[derive(Resource, Debug, Clone)]
pub struct Tilemap {
    /// Key of the sheet (and texture) in the stores.
    pub sheet_key: String,
    pub sheet: Arc<SpriteSheet>,
    pub tile_size: u32,
    pub map_width: u32,
    pub map_height: u32,
    pub layers: Vec<Layer>,
    /// Entities driven by the Animated Tile Updater while mounted.
    pub animated: Vec<Entity>,
    pub report: LoadReport,
}

impl Tilemap {
    /// Authored world size in pixels, clamped at `u32::MAX`.
    pub fn world_size(&self) -> (u32, u32) {
        (
            self.map_width.saturating_mul(self.tile_size),
            self.map_height.saturating_mul(self.tile_size),
        )
    }

    pub fn is_mounted(&self) -> bool {
        self.layers.iter().any(|l| l.container.is_some())
    }

    pub fn tile_count(&self) -> usize {
        self.layers.iter().map(|l| l.tiles.len()).sum()
    }

    pub fn animated_tile_count(&self) -> usize {
        self.layers
            .iter()
            .flat_map(|l| l.tiles.iter())
            .filter(|t| t.animated.is_some())
            .count()
    }
}

/// Families to use for a level: its own overrides first, then the defaults
/// for any family it does not override.
pub fn effective_families(
    level: &LevelDescription,
    defaults: &[AnimatedFamily],
) -> Vec<AnimatedFamily> {
    let mut families: Vec<AnimatedFamily> = level
        .animated_tiles
        .iter()
        .map(|f| AnimatedFamily {
            name: f.family.clone(),
            frames: f.frames.clone(),
            frame_duration: f.frame_duration,
        })
        .collect();
    for default in defaults {
        if !families.iter().any(|f| f.name == default.name) {
            families.push(default.clone());
        }
    }
    families
}

/// Build a tilemap from a level description.
///
/// Tiles with non-numeric or out-of-range ids are logged, recorded in
/// [`Tilemap::report`], and skipped. A level without layers, or with a zero
/// tile size, is fatal.
pub fn load_tilemap(
    level: &LevelDescription,
    sheet_key: impl Into<String>,
    sheet: Arc<SpriteSheet>,
    families: &[AnimatedFamily],
) -> Result<Tilemap, LoadError> {
    let layer_descs = level.layers.as_ref().ok_or(LoadError::MissingLayers)?;
    let families = effective_families(level, families);
    let grid = level.tile_size;
    let tile_size = level.tile_size.unwrap_or(sheet.tile_width);
    if tile_size == 0 {
        return Err(LoadError::ZeroTileSize);
    }
    let mut report = LoadReport::default();

    let mut max_x = 0.0_f32;
    let mut max_y = 0.0_f32;

    let mut layers = Vec::with_capacity(layer_descs.len());
    for (layer_index, desc) in layer_descs.iter().enumerate() {
        let z = ZIndex::for_layer(layer_index, layer_descs.len()).0;
        let mut tiles = Vec::with_capacity(desc.tiles.len());

        for tile_desc in &desc.tiles {
            let Some(raw_id) = tile_desc.id.resolve() else {
                let err = TileError::NonNumericId {
                    layer: desc.name.clone(),
                    id: tile_desc.id.to_string(),
                };
                warn!("Skipping tile: {}", err);
                report.skipped.push(err);
                continue;
            };
            let region = u32::try_from(raw_id).ok().and_then(|id| sheet.get(id).copied());
            let Some(region) = region else {
                let err = TileError::OutOfBounds {
                    layer: desc.name.clone(),
                    id: raw_id,
                    len: sheet.len(),
                };
                warn!("Skipping tile: {}", err);
                report.skipped.push(err);
                continue;
            };
            let id = raw_id as u32;

            let pos = match grid {
                Some(size) => Vector2 {
                    x: tile_desc.x * size as f32,
                    y: tile_desc.y * size as f32,
                },
                None => Vector2 {
                    x: tile_desc.x,
                    y: tile_desc.y,
                },
            };
            max_x = max_x.max(pos.x + region.width as f32);
            max_y = max_y.max(pos.y + region.height as f32);

            let animated = families.iter().find(|f| f.matches(id)).map(|f| f.animate());

            tiles.push(PlacedTile {
                tile: Tile {
                    id,
                    x: tile_desc.x,
                    y: tile_desc.y,
                    scale_x: tile_desc.scale_x,
                },
                pos,
                region,
                animated,
            });
        }

        layers.push(Layer {
            name: desc.name.clone(),
            collider: desc.collider,
            z,
            tiles,
            container: None,
        });
    }

    // Without explicit dimensions the map spans the placed tiles.
    let map_width = level
        .map_width
        .unwrap_or_else(|| (max_x / tile_size as f32).ceil() as u32);
    let map_height = level
        .map_height
        .unwrap_or_else(|| (max_y / tile_size as f32).ceil() as u32);

    Ok(Tilemap {
        sheet_key: sheet_key.into(),
        sheet,
        tile_size,
        map_width,
        map_height,
        layers,
        animated: Vec::new(),
        report,
    })
}
