//! Tilemap loading integration tests: sprite-sheet slicing from real image
//! files, layer z-order, skipped tiles, water animation registration, and
//! what is (not) mounted when a load fails.

use std::path::{Path, PathBuf};

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;

use gardenengine::components::animatedtile::AnimatedTile;
use gardenengine::components::mapposition::MapPosition;
use gardenengine::components::sprite::Sprite;
use gardenengine::components::tile::{Tile, TileLayer};
use gardenengine::components::zindex::ZIndex;
use gardenengine::engine::GardenEngine;
use gardenengine::resources::engineconfig::EngineConfig;
use gardenengine::resources::level::{LoadError, LoadedLevel, TileError};
use gardenengine::resources::scene::SceneStatus;
use gardenengine::resources::spritesheet::{SpriteSheet, SpriteSheetStore};
use gardenengine::resources::tilemap::Tilemap;

/// Scratch directory holding a 128×128 sheet of 16px tiles (ids 0..64).
struct Fixture {
    dir: PathBuf,
}

impl Fixture {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!(
            "gardenengine-tilemap-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        image::RgbaImage::new(128, 128)
            .save(dir.join("sheet.png"))
            .unwrap();
        std::fs::write(
            dir.join("sheet.json"),
            r#"{ "source": "sheet.png", "tileWidth": 16, "tileHeight": 16 }"#,
        )
        .unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        &self.dir
    }

    fn write_level(&self, file: &str, json: &str) -> PathBuf {
        let path = self.dir.join(file);
        std::fs::write(&path, json).unwrap();
        path
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

const THREE_LAYERS: &str = r#"{
    "tileSize": 16,
    "mapWidth": 10,
    "mapHeight": 8,
    "spritesheet": "sheet.json",
    "layers": [
        { "name": "decor", "tiles": [ { "id": "7", "x": 1, "y": 1 } ] },
        { "name": "pond", "collider": true, "tiles": [
            { "id": "48", "x": 2, "y": 3 },
            { "id": "50", "x": 3, "y": 3 }
        ] },
        { "name": "ground", "tiles": [
            { "id": "0", "x": 0, "y": 0 },
            { "id": "1", "x": 1, "y": 0, "scaleX": -1 }
        ] }
    ]
}"#;

fn engine() -> GardenEngine {
    GardenEngine::new(EngineConfig::new())
}

fn count<C: Component>(world: &mut World) -> usize {
    world.query::<&C>().iter(world).count()
}

#[test]
fn sheet_slicing_floors_partial_tiles() {
    let fx = Fixture::new("slicing");
    let odd = fx.path().join("odd.png");
    image::RgbaImage::new(100, 50).save(&odd).unwrap();

    let sheet = SpriteSheet::from_image_file(&odd, 16, 16).unwrap();
    assert_eq!(sheet.len(), 6 * 3);
    assert_eq!(sheet.columns(), 6);
    let last = sheet.get(17).unwrap();
    assert_eq!((last.x, last.y), (80, 32));
    assert!(sheet.get(18).is_none());
}

#[test]
fn level_file_resolves_sheet_relative_to_itself() {
    let fx = Fixture::new("resolve");
    let path = fx.write_level("level.json", THREE_LAYERS);

    let loaded = LoadedLevel::read(&path).unwrap();
    assert_eq!(loaded.sheet.len(), 64);
    assert_eq!(loaded.image_path, fx.path().join("sheet.png"));
    assert_eq!(loaded.level.layers().len(), 3);
}

#[test]
fn layers_get_strictly_decreasing_z_and_own_their_tiles() {
    let fx = Fixture::new("zorder");
    let mut engine = engine();
    engine.load_level_from_str(THREE_LAYERS, fx.path()).unwrap();
    assert_eq!(engine.status(), SceneStatus::Ready);

    let world = engine.world_mut();
    let tilemap = world.resource::<Tilemap>().clone();
    let zs: Vec<i32> = tilemap.layers.iter().map(|l| l.z).collect();
    assert_eq!(zs, vec![3, 2, 1]);
    assert_eq!(tilemap.world_size(), (160, 128));
    assert_eq!(count::<TileLayer>(world), 3);
    assert_eq!(count::<Tile>(world), 5);

    let mut q = world.query::<(&Tile, &ZIndex, &ChildOf)>();
    for (tile, z, parent) in q.iter(world) {
        let layer = tilemap
            .layers
            .iter()
            .find(|l| l.container == Some(parent.parent()))
            .expect("tile parented to a layer container");
        assert_eq!(z.0, layer.z, "tile {} carries its layer's z", tile.id);
    }
}

#[test]
fn tiles_are_placed_on_the_grid_and_flipped_by_negative_scale() {
    let fx = Fixture::new("placement");
    let mut engine = engine();
    engine.load_level_from_str(THREE_LAYERS, fx.path()).unwrap();

    let world = engine.world_mut();
    let mut q = world.query::<(&Tile, &MapPosition, &Sprite)>();
    let mut seen = 0;
    for (tile, pos, sprite) in q.iter(world) {
        if tile.id == 1 {
            assert_eq!((pos.pos.x, pos.pos.y), (16.0, 0.0));
            assert!(sprite.flip_h);
            seen += 1;
        }
        if tile.id == 7 {
            assert_eq!((pos.pos.x, pos.pos.y), (16.0, 16.0));
            assert!(!sprite.flip_h);
            assert_eq!((sprite.offset.x, sprite.offset.y), (112.0, 0.0));
            seen += 1;
        }
    }
    assert_eq!(seen, 2);
}

#[test]
fn pixel_positions_without_tile_size() {
    let fx = Fixture::new("pixels");
    let mut engine = engine();
    engine
        .load_level_from_str(
            r#"{
                "spritesheet": "sheet.json",
                "layers": [ { "name": "free", "tiles": [ { "id": 3, "x": 20, "y": 8 } ] } ]
            }"#,
            fx.path(),
        )
        .unwrap();

    let world = engine.world_mut();
    let pos = world.query::<&MapPosition>().single(world).unwrap();
    assert_eq!((pos.pos.x, pos.pos.y), (20.0, 8.0));
    // Dimensions come from the placed extent: (20 + 16) / 16 rounded up.
    assert_eq!(world.resource::<Tilemap>().world_size(), (48, 32));
}

#[test]
fn bad_tile_ids_are_skipped_and_reported() {
    let fx = Fixture::new("skipped");
    let mut engine = engine();
    engine
        .load_level_from_str(
            r#"{
                "tileSize": 16,
                "spritesheet": "sheet.json",
                "layers": [ { "name": "ground", "tiles": [
                    { "id": "moss", "x": 0, "y": 0 },
                    { "id": "64", "x": 1, "y": 0 },
                    { "id": -1, "x": 2, "y": 0 },
                    { "id": " 5 ", "x": 3, "y": 0 }
                ] } ]
            }"#,
            fx.path(),
        )
        .unwrap();

    let world = engine.world_mut();
    assert_eq!(world.resource::<Tilemap>().report.skipped.len(), 3);
    let ids: Vec<u32> = world.query::<&Tile>().iter(world).map(|t| t.id).collect();
    assert_eq!(ids, vec![5]);
}

#[test]
fn non_integer_json_ids_skip_only_their_tile() {
    let fx = Fixture::new("jsonids");
    let mut engine = engine();
    engine
        .load_level_from_str(
            r#"{
                "tileSize": 16,
                "spritesheet": "sheet.json",
                "layers": [ { "name": "ground", "tiles": [
                    { "id": "1", "x": 0, "y": 0 },
                    { "id": 2.5, "x": 1, "y": 0 },
                    { "id": 3, "x": 2, "y": 0 }
                ] } ]
            }"#,
            fx.path(),
        )
        .unwrap();

    let world = engine.world_mut();
    let skipped = &world.resource::<Tilemap>().report.skipped;
    assert_eq!(skipped.len(), 1);
    assert!(matches!(&skipped[0], TileError::NonNumericId { id, .. } if id == "2.5"));
    let mut ids: Vec<u32> = world.query::<&Tile>().iter(world).map(|t| t.id).collect();
    ids.sort();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn zero_tile_size_is_fatal_and_keeps_the_scene() {
    let fx = Fixture::new("zerotile");
    let mut engine = engine();
    engine.load_level_from_str(THREE_LAYERS, fx.path()).unwrap();
    let err = engine
        .load_level_from_str(
            r#"{ "tileSize": 0, "mapWidth": 4, "mapHeight": 4, "spritesheet": "sheet.json",
                 "layers": [ { "name": "a", "tiles": [ { "id": "1", "x": 1, "y": 1 } ] } ] }"#,
            fx.path(),
        )
        .unwrap_err();
    assert!(matches!(err, LoadError::ZeroTileSize), "{err}");
    assert_eq!(engine.world().resource::<Tilemap>().tile_count(), 5);
}

#[test]
fn water_tiles_are_registered_and_animate() {
    let fx = Fixture::new("water");
    let mut engine = engine();
    engine.load_level_from_str(THREE_LAYERS, fx.path()).unwrap();

    {
        let world = engine.world_mut();
        assert_eq!(world.resource::<Tilemap>().animated.len(), 2);
        assert_eq!(count::<AnimatedTile>(world), 2);
    }

    // 250 ms per water frame: 0.3 s moves every water tile to frame 49.
    engine.tick(0.3);

    let world = engine.world_mut();
    let expected = world
        .resource::<SpriteSheetStore>()
        .region(&world.resource::<Tilemap>().sheet_key, 49)
        .unwrap();
    let mut q = world.query::<(&AnimatedTile, &Sprite)>();
    for (anim, sprite) in q.iter(world) {
        assert_eq!(anim.current_frame(), 1);
        assert_eq!(anim.current_frame_id(), Some(49));
        assert!(sprite.shows_region(&expected));
    }
}

#[test]
fn level_override_replaces_default_water_frames() {
    let fx = Fixture::new("override");
    let mut engine = engine();
    engine
        .load_level_from_str(
            r#"{
                "tileSize": 16,
                "spritesheet": "sheet.json",
                "animatedTiles": [
                    { "family": "water", "frames": [40, 41], "frameDuration": 100 }
                ],
                "layers": [ { "name": "pond", "tiles": [
                    { "id": "48", "x": 0, "y": 0 },
                    { "id": "41", "x": 1, "y": 0 }
                ] } ]
            }"#,
            fx.path(),
        )
        .unwrap();

    let world = engine.world_mut();
    let frames: Vec<Option<u32>> = world
        .query::<&AnimatedTile>()
        .iter(world)
        .map(|a| a.current_frame_id())
        .collect();
    assert_eq!(frames, vec![Some(40)]);
}

#[test]
fn missing_spritesheet_is_fatal_and_mounts_nothing() {
    let fx = Fixture::new("nosheet");
    let mut engine = engine();
    let err = engine
        .load_level_from_str(
            r#"{ "spritesheet": "absent.json", "layers": [ { "name": "a", "tiles": [] } ] }"#,
            fx.path(),
        )
        .unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }), "{err}");

    let world = engine.world_mut();
    assert!(!world.contains_resource::<Tilemap>());
    assert_eq!(count::<TileLayer>(world), 0);
    assert_eq!(engine.status(), SceneStatus::Idle);
}

#[test]
fn missing_layers_is_fatal() {
    let fx = Fixture::new("nolayers");
    let mut engine = engine();
    let err = engine
        .load_level_from_str(r#"{ "spritesheet": "sheet.json" }"#, fx.path())
        .unwrap_err();
    assert!(matches!(err, LoadError::MissingLayers));
    assert!(!engine.world().contains_resource::<Tilemap>());
}

#[test]
fn failed_reload_keeps_the_mounted_scene() {
    let fx = Fixture::new("keep");
    let mut engine = engine();
    engine.load_level_from_str(THREE_LAYERS, fx.path()).unwrap();
    assert!(engine.load_level_from_str("{ not json", fx.path()).is_err());

    let world = engine.world_mut();
    assert_eq!(world.resource::<Tilemap>().tile_count(), 5);
    assert_eq!(count::<Tile>(world), 5);
}

#[test]
fn reload_replaces_previous_scene() {
    let fx = Fixture::new("replace");
    let mut engine = engine();
    engine.load_level_from_str(THREE_LAYERS, fx.path()).unwrap();
    engine
        .load_level_from_str(
            r#"{ "tileSize": 16, "spritesheet": "sheet.json",
                 "layers": [ { "name": "only", "tiles": [ { "id": "9", "x": 0, "y": 0 } ] } ] }"#,
            fx.path(),
        )
        .unwrap();

    let world = engine.world_mut();
    assert_eq!(count::<TileLayer>(world), 1);
    assert_eq!(count::<Tile>(world), 1);
    assert_eq!(count::<AnimatedTile>(world), 0);
    assert!(world.resource::<Tilemap>().animated.is_empty());
}

#[test]
fn unmount_tears_everything_down() {
    let fx = Fixture::new("unmount");
    let mut engine = engine();
    engine.load_level_from_str(THREE_LAYERS, fx.path()).unwrap();
    let key = engine.world().resource::<Tilemap>().sheet_key.clone();

    engine.unmount();

    let world = engine.world_mut();
    assert!(!world.contains_resource::<Tilemap>());
    assert_eq!(count::<Tile>(world), 0);
    assert_eq!(count::<TileLayer>(world), 0);
    assert_eq!(count::<AnimatedTile>(world), 0);
    assert!(world.resource::<SpriteSheetStore>().get(&key).is_none());
    assert_eq!(engine.status(), SceneStatus::Idle);

    // Ticking without a scene is harmless.
    engine.tick(0.016);
}
