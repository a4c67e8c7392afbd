//! Animated Tile Updater.
//!
//! Advances every [`AnimatedTile`] against [`WorldTime::elapsed_ms`] and, when
//! the visible frame changes, patches the [`Sprite`] on the same entity with
//! the new region from its sprite sheet. Running twice with the same clock
//! does nothing the second time.

use bevy_ecs::prelude::*;
use log::warn;

use crate::components::animatedtile::AnimatedTile;
use crate::components::sprite::Sprite;
use crate::resources::spritesheet::SpriteSheetStore;
use crate::resources::worldtime::WorldTime;

pub fn animated_tile_system(
    mut query: Query<(Entity, &mut AnimatedTile, &mut Sprite)>,
    sheets: Res<SpriteSheetStore>,
    time: Res<WorldTime>,
) {
    let now = time.elapsed_ms;
    for (entity, mut tile, mut sprite) in query.iter_mut() {
        if !tile.advance(now) {
            continue;
        }
        let Some(frame) = tile.current_frame_id() else {
            continue;
        };
        match sheets.region(&sprite.tex_key, frame) {
            Some(region) => sprite.set_region(&region),
            None => warn!(
                "{:?}: sprite sheet '{}' has no frame {}; keeping previous frame",
                entity, sprite.tex_key, frame
            ),
        }
    }
}
