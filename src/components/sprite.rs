use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

use crate::resources::spritesheet::TileRegion;

/// Sprite is identified by a texture key, its size in world units and an
/// offset if the texture is a spritesheet.
/// The offset is used to select the correct frame from the spritesheet.
/// The origin selects the pivot point (in pixels) relative to the texture's top-left
/// used for placement when rendering.
#[derive(Component, Clone, Debug)]
pub struct Sprite {
    pub tex_key: String,
    pub width: f32,
    pub height: f32,
    pub offset: Vector2,
    pub origin: Vector2,
    pub flip_h: bool,
    pub flip_v: bool,
}

impl Sprite {
    /// Sprite showing a single sprite-sheet region, pivot at the top-left corner.
    pub fn from_region(tex_key: impl Into<String>, region: &TileRegion) -> Self {
        Self {
            tex_key: tex_key.into(),
            width: region.width as f32,
            height: region.height as f32,
            offset: Vector2 {
                x: region.x as f32,
                y: region.y as f32,
            },
            origin: Vector2::zero(),
            flip_h: false,
            flip_v: false,
        }
    }

    pub fn with_origin(mut self, origin: Vector2) -> Self {
        self.origin = origin;
        self
    }

    /// Swap the visible region, keeping placement and flips untouched.
    pub fn set_region(&mut self, region: &TileRegion) {
        self.offset = Vector2 {
            x: region.x as f32,
            y: region.y as f32,
        };
        self.width = region.width as f32;
        self.height = region.height as f32;
    }

    pub fn shows_region(&self, region: &TileRegion) -> bool {
        self.offset.x == region.x as f32
            && self.offset.y == region.y as f32
            && self.width == region.width as f32
            && self.height == region.height as f32
    }
}
