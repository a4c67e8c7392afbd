//! Sprite sheet slicing and storage.
//!
//! A [`SpriteSheet`] carves one atlas image into equally sized regions,
//! indexed row-major from 0. Sheets are immutable once sliced and shared via
//! `Arc` between the tilemap and the [`SpriteSheetStore`], keyed by the same
//! string as the texture in [`TextureStore`](crate::resources::texturestore::TextureStore).

use std::path::Path;
use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use image::GenericImageView;
use rustc_hash::FxHashMap;

use crate::resources::level::LoadError;

/// Rectangular area of the atlas image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    pub image_width: u32,
    pub image_height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    tiles: Vec<TileRegion>,
}

impl SpriteSheet {
    /// Slice an image of the given size into `floor(w/tw) * floor(h/th)` tiles.
    pub fn slice(
        image_width: u32,
        image_height: u32,
        tile_width: u32,
        tile_height: u32,
    ) -> Result<Self, LoadError> {
        if tile_width == 0 || tile_height == 0 {
            return Err(LoadError::InvalidSpriteSheet(format!(
                "tile size must be positive, got {}x{}",
                tile_width, tile_height
            )));
        }
        let columns = image_width / tile_width;
        let rows = image_height / tile_height;
        let mut tiles = Vec::with_capacity((columns * rows) as usize);
        for row in 0..rows {
            for col in 0..columns {
                tiles.push(TileRegion {
                    x: col * tile_width,
                    y: row * tile_height,
                    width: tile_width,
                    height: tile_height,
                });
            }
        }
        Ok(Self {
            image_width,
            image_height,
            tile_width,
            tile_height,
            tiles,
        })
    }

    /// Decode an in-memory image and slice it.
    pub fn from_image_bytes(
        bytes: &[u8],
        tile_width: u32,
        tile_height: u32,
    ) -> Result<Self, LoadError> {
        let image = image::load_from_memory(bytes)?;
        let (w, h) = image.dimensions();
        Self::slice(w, h, tile_width, tile_height)
    }

    /// Read the image header at `path` and slice it.
    pub fn from_image_file(
        path: impl AsRef<Path>,
        tile_width: u32,
        tile_height: u32,
    ) -> Result<Self, LoadError> {
        let (w, h) = image::image_dimensions(path.as_ref())?;
        Self::slice(w, h, tile_width, tile_height)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn columns(&self) -> u32 {
        self.image_width / self.tile_width
    }

    pub fn get(&self, index: u32) -> Option<&TileRegion> {
        self.tiles.get(index as usize)
    }

    pub fn regions(&self) -> &[TileRegion] {
        &self.tiles
    }
}

/// Registry of loaded sprite sheets by texture key.
#[derive(Resource, Debug, Default)]
pub struct SpriteSheetStore {
    pub map: FxHashMap<String, Arc<SpriteSheet>>,
}

impl SpriteSheetStore {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn get(&self, key: impl AsRef<str>) -> Option<&Arc<SpriteSheet>> {
        self.map.get(key.as_ref())
    }
    pub fn insert(&mut self, key: impl Into<String>, sheet: Arc<SpriteSheet>) {
        self.map.insert(key.into(), sheet);
    }
    pub fn remove(&mut self, key: &str) -> Option<Arc<SpriteSheet>> {
        self.map.remove(key)
    }
    /// Region for `index` in the sheet stored under `key`.
    pub fn region(&self, key: &str, index: u32) -> Option<TileRegion> {
        self.map.get(key).and_then(|s| s.get(index)).copied()
    }
    pub fn clear(&mut self) {
        self.map.clear();
    }
}
