//! Garden Engine main entry point.
//!
//! A 2D garden scene written in Rust using:
//! - **raylib** for windowing and graphics
//! - **bevy_ecs** for entity-component-system architecture
//!
//! The binary opens a resizable window, loads a level on the background asset
//! thread and, once it is mounted, adds a gardener that starts walking when
//! clicked and stops when the pointer leaves it.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --level assets/levels/garden.json \
//!     --shader assets/shaders/daynight.fs --debug
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use clap::Parser;
use gardenengine::components::animatedtile::AnimatedTile;
use gardenengine::components::animation::{
    CharacterAnimation, LocomotionState, LoopState, bind_transitions, start_condition,
    stop_condition,
};
use gardenengine::components::boxcollider::BoxCollider;
use gardenengine::components::interactive::Interactive;
use gardenengine::components::mapposition::MapPosition;
use gardenengine::components::sprite::Sprite;
use gardenengine::components::zindex::ZIndex;
use gardenengine::engine::GardenEngine;
use gardenengine::resources::debugmode::DebugMode;
use gardenengine::resources::engineconfig::{DEFAULT_CONFIG_PATH, EngineConfig};
use gardenengine::resources::pointer::PointerInteraction;
use gardenengine::resources::signalbus::{SignalBus, SignalData};
use gardenengine::resources::tilemap::Tilemap;
use log::{error, info, warn};
use raylib::prelude::Vector2;

/// Garden Engine 2D
#[derive(Parser)]
#[command(version, about = "A small animated 2D garden.")]
struct Cli {
    /// Level description to load.
    #[arg(long, value_name = "PATH", default_value = "assets/levels/garden.json")]
    level: PathBuf,

    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Fragment shader for the day/night post-process, e.g. assets/shaders/daynight.fs.
    #[arg(long, value_name = "PATH")]
    shader: Option<PathBuf>,

    /// Outline interactive hit boxes and show the pointer readout.
    #[arg(long)]
    debug: bool,
}

const GARDENER_IDLE: [u32; 2] = [16, 17];
const GARDENER_WALK: [u32; 4] = [18, 19, 20, 21];

/// Spawn the gardener on the mounted level's sheet and wire it to the bus.
fn spawn_gardener(world: &mut World) {
    let Some((key, region)) = world.get_resource::<Tilemap>().and_then(|map| {
        map.sheet
            .get(GARDENER_IDLE[0])
            .map(|region| (map.sheet_key.clone(), *region))
    }) else {
        warn!("Level sheet has no gardener frames; skipping gardener");
        return;
    };

    let walk = LocomotionState::new("walk", "idle", AnimatedTile::new(GARDENER_WALK, 120.0));
    let idle =
        LoopState::new("idle", AnimatedTile::new(GARDENER_IDLE, 500.0)).with_locomotion(&walk);
    let machine = CharacterAnimation::new().with_state(idle).with_state(walk);

    let interactive = Interactive::new()
        .with_tag("gardener")
        .on_click(|entity, bus: &mut SignalBus| {
            bus.emit(&start_condition("walk"), Some(SignalData::Entity(entity)));
        })
        .on_leave(|entity, bus: &mut SignalBus| {
            bus.emit(&stop_condition("walk"), Some(SignalData::Entity(entity)));
        });

    let half = Vector2::new(region.width as f32 * 0.5, region.height as f32 * 0.5);
    let gardener = world
        .spawn((
            Sprite::from_region(key, &region).with_origin(half),
            MapPosition::new(160.0, 120.0),
            ZIndex(100),
            BoxCollider::new(region.width as f32, region.height as f32),
            machine,
            interactive,
        ))
        .id();
    world.resource_mut::<PointerInteraction>().register(gardener);
    match bind_transitions(world, gardener) {
        Some(n) => info!("Gardener ready, {} transition signals bound", n),
        None => warn!("Gardener transitions not bound"),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = EngineConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        info!("{}; using defaults", e);
    }
    let (window_width, window_height) = config.window_size();
    let target_fps = config.target_fps;

    // --------------- Raylib window ---------------
    let (mut rl, thread) = raylib::init()
        .size(window_width as i32, window_height as i32)
        .resizable()
        .title("Garden Engine")
        .build();
    rl.set_target_fps(target_fps);

    // --------------- Engine ---------------
    let mut engine = GardenEngine::new(config);
    engine
        .attach_window(rl, thread)
        .expect("Failed to create render target");
    if let Some(shader) = &cli.shader {
        if let Err(e) = engine.load_post_process("daynight", shader) {
            warn!("Post-process disabled: {}", e);
        }
    }
    if cli.debug {
        engine.world_mut().insert_resource(DebugMode);
    }
    engine.on_ready(spawn_gardener);
    if let Err(e) = engine.load_level(&cli.level) {
        error!("Failed to request level '{}': {}", cli.level.display(), e);
    }

    // --------------- Main loop ---------------
    while !engine.window_should_close() {
        if let Some((w, h)) = engine.window_resized() {
            engine.resize(w, h);
        }
        let dt = engine.frame_time();
        engine.tick(dt);
    }
    engine.destroy();
}
