//! Placed tile components.
//!
//! A mounted tilemap becomes one [`TileLayer`] container entity per layer,
//! with one child entity per placed [`Tile`]. The container is the unit that
//! gets attached to (and detached from) the scene.

use bevy_ecs::prelude::Component;

/// A single placed reference into a sprite sheet.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Tile {
    /// Sprite-sheet index, already resolved from the level's string id.
    pub id: u32,
    /// Placement as authored (grid cells when the level has a tile size).
    pub x: f32,
    pub y: f32,
    /// Negative values flip the sprite horizontally.
    pub scale_x: f32,
}

/// Layer container mounted for one level layer.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct TileLayer {
    pub name: String,
    pub collider: bool,
    pub z: i32,
}
