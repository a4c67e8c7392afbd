//! Mounting and unmounting a tilemap in the world.
//!
//! Each [`Layer`] becomes a container entity carrying [`TileLayer`] and
//! [`ZIndex`]; each placed tile becomes a child of it (`ChildOf`) with
//! [`Tile`], [`MapPosition`], [`ZIndex`] and [`Sprite`]. Water-family tiles
//! also get an [`AnimatedTile`], and their entities are listed in
//! [`Tilemap::animated`]. The animated record and the sprite it patches live
//! on the same entity, so there is no back-reference to dangle.
//!
//! Teardown runs in the order the GPU side needs: tile entities, then layer
//! containers, then the animated list and sheet, and the texture last.

use std::path::Path;
use std::sync::Arc;

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;
use log::{debug, info};
use raylib::prelude::Texture2D;

use crate::components::animatedtile::AnimatedTile;
use crate::components::mapposition::MapPosition;
use crate::components::sprite::Sprite;
use crate::components::tile::{Tile, TileLayer};
use crate::components::zindex::ZIndex;
use crate::resources::engineconfig::EngineConfig;
use crate::resources::level::{LoadError, LoadedLevel};
use crate::resources::rendertarget::RenderTarget;
use crate::resources::spritesheet::SpriteSheetStore;
use crate::resources::texturestore::TextureStore;
use crate::resources::tilemap::{AnimatedFamily, Tilemap, load_tilemap};
use crate::resources::viewport::Viewport;
use crate::resources::worldtime::WorldTime;

/// Build, upload and mount a resolved level, replacing any mounted one.
///
/// The viewport and offscreen surface take the level's authored world size;
/// the configured `[world]` size only applies until a level with a usable
/// size is mounted. Everything fallible (tilemap construction, texture
/// upload, surface creation) happens before the current scene is touched, so
/// an error leaves the world as it was.
pub fn mount_level(world: &mut World, loaded: LoadedLevel) -> Result<(), LoadError> {
    let water_ms = world
        .get_resource::<EngineConfig>()
        .map(|c| c.water_frame_ms)
        .unwrap_or(crate::resources::tilemap::WATER_FRAME_MS);
    let families = [AnimatedFamily::water(water_ms)];
    let sheet = Arc::new(loaded.sheet);
    let tilemap = load_tilemap(&loaded.level, &loaded.sheet_key, sheet.clone(), &families)?;
    let texture = upload_texture(world, &loaded.image_path)?;
    let world_size = level_world_size(world, &tilemap);
    let surface = resize_surface(world, world_size)?;

    unmount_tilemap(world);

    if let Some(mut viewport) = world.get_resource_mut::<Viewport>() {
        viewport.set_world_size(world_size.0, world_size.1);
    }
    if let Some(surface) = surface {
        world.insert_non_send_resource(surface);
    }

    world
        .get_resource_or_insert_with(SpriteSheetStore::new)
        .insert(loaded.sheet_key.clone(), sheet);
    if let Some(texture) = texture {
        if let Some(mut store) = world.get_non_send_resource_mut::<TextureStore>() {
            store.insert(loaded.sheet_key.clone(), texture);
        }
    }
    mount_tilemap(world, tilemap);
    Ok(())
}

/// World size to render a tilemap at: its own, or the current viewport's
/// when the level has no extent.
fn level_world_size(world: &World, tilemap: &Tilemap) -> (u32, u32) {
    match tilemap.world_size() {
        (w, h) if w > 0 && h > 0 => (w, h),
        size => world
            .get_resource::<Viewport>()
            .map(Viewport::world_size)
            .unwrap_or((size.0.max(1), size.1.max(1))),
    }
}

/// A new offscreen surface when a window is attached and its surface has a
/// different size; `None` headless or when the current one fits.
fn resize_surface(world: &mut World, size: (u32, u32)) -> Result<Option<RenderTarget>, LoadError> {
    let smooth = match world.get_non_send_resource::<RenderTarget>() {
        Some(target) if (target.world_width, target.world_height) != size => target.is_smooth(),
        _ => return Ok(None),
    };
    let Some(mut rl) = world.remove_non_send_resource::<raylib::RaylibHandle>() else {
        return Ok(None);
    };
    let result = match world.get_non_send_resource::<raylib::RaylibThread>() {
        Some(thread) => RenderTarget::new(&mut rl, thread, size.0, size.1, smooth)
            .map(Some)
            .map_err(LoadError::Surface),
        None => Ok(None),
    };
    world.insert_non_send_resource(rl);
    result
}

/// Load the sheet image as a GPU texture when a window exists; `None` headless.
fn upload_texture(world: &mut World, path: &Path) -> Result<Option<Texture2D>, LoadError> {
    let Some(mut rl) = world.remove_non_send_resource::<raylib::RaylibHandle>() else {
        return Ok(None);
    };
    let result = match world.get_non_send_resource::<raylib::RaylibThread>() {
        Some(thread) => rl
            .load_texture(thread, &path.to_string_lossy())
            .map(Some)
            .map_err(|e| LoadError::Texture(e.to_string())),
        None => Ok(None),
    };
    world.insert_non_send_resource(rl);
    result
}

/// Spawn layer containers and tile entities, then insert `tilemap` as a resource.
pub fn mount_tilemap(world: &mut World, mut tilemap: Tilemap) {
    let now = world
        .get_resource::<WorldTime>()
        .map(|t| t.elapsed_ms)
        .unwrap_or(0.0);
    let key = tilemap.sheet_key.clone();
    let mut animated = Vec::new();

    for layer in tilemap.layers.iter_mut() {
        let container = world
            .spawn((
                TileLayer {
                    name: layer.name.clone(),
                    collider: layer.collider,
                    z: layer.z,
                },
                ZIndex(layer.z),
            ))
            .id();
        layer.container = Some(container);

        for placed in &layer.tiles {
            let mut sprite = Sprite::from_region(key.clone(), &placed.region);
            sprite.flip_h = placed.tile.scale_x < 0.0;
            let mut entity = world.spawn((
                placed.tile.clone(),
                MapPosition::new(placed.pos.x, placed.pos.y),
                ZIndex(layer.z),
                sprite,
                ChildOf(container),
            ));
            if let Some(anim) = &placed.animated {
                entity.insert(anim.clone().started_at(now));
                animated.push(entity.id());
            }
        }
    }

    tilemap.animated = animated;
    info!(
        "Mounted tilemap '{}': {} layers, {} tiles ({} animated, {} skipped)",
        key,
        tilemap.layers.len(),
        tilemap.tile_count(),
        tilemap.animated.len(),
        tilemap.report.skipped.len()
    );
    world.insert_resource(tilemap);
}

/// Tear down the mounted tilemap, if any. Returns whether one was mounted.
pub fn unmount_tilemap(world: &mut World) -> bool {
    let Some(mut tilemap) = world.remove_resource::<Tilemap>() else {
        return false;
    };

    let containers: Vec<Entity> = tilemap.layers.iter().filter_map(|l| l.container).collect();
    let tiles: Vec<Entity> = {
        let mut q = world.query_filtered::<(Entity, &ChildOf), With<Tile>>();
        q.iter(world)
            .filter(|(_, parent)| containers.contains(&parent.parent()))
            .map(|(e, _)| e)
            .collect()
    };
    for entity in &tiles {
        let _ = world.try_despawn(*entity);
    }
    for container in &containers {
        let _ = world.try_despawn(*container);
    }
    for layer in tilemap.layers.iter_mut() {
        layer.container = None;
    }
    tilemap.animated.clear();

    if let Some(mut sheets) = world.get_resource_mut::<SpriteSheetStore>() {
        sheets.remove(&tilemap.sheet_key);
    }
    if let Some(mut textures) = world.get_non_send_resource_mut::<TextureStore>() {
        textures.remove(&tilemap.sheet_key);
    }
    debug!(
        "Unmounted tilemap '{}' ({} tiles, {} layers)",
        tilemap.sheet_key,
        tiles.len(),
        containers.len()
    );
    true
}

/// Run condition: a tilemap is mounted.
pub fn scene_is_mounted(tilemap: Option<Res<Tilemap>>) -> bool {
    tilemap.is_some()
}
