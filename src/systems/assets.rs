//! Background asset loader and the system that mounts its results.
//!
//! - [`asset_thread`] runs on its own OS thread, reads level files and sprite
//!   sheet headers in response to [`AssetCmd`], and replies with
//!   [`AssetMessage`].
//! - [`poll_asset_messages`] drains replies on the main thread each frame and
//!   mounts a delivered level, or records the failure in [`SceneStatus`].

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use log::{error, info};

use crate::events::assets::{AssetCmd, AssetMessage};
use crate::resources::assets::AssetBridge;
use crate::resources::level::LoadedLevel;
use crate::resources::scene::SceneStatus;
use crate::systems::tilemap::mount_level;

/// Entry point of the asset thread. Blocks until [`AssetCmd::Shutdown`] or
/// until the command sender is dropped.
pub fn asset_thread(rx_cmd: Receiver<AssetCmd>, tx_msg: Sender<AssetMessage>) {
    info!("Asset thread starting");
    for cmd in rx_cmd.iter() {
        match cmd {
            AssetCmd::LoadLevel { path } => {
                let reply = match LoadedLevel::read(&path) {
                    Ok(loaded) => {
                        info!("Loaded level '{}'", path.display());
                        AssetMessage::LevelLoaded(Box::new(loaded))
                    }
                    Err(e) => AssetMessage::LevelFailed {
                        path,
                        error: e.to_string(),
                    },
                };
                if tx_msg.send(reply).is_err() {
                    break;
                }
            }
            AssetCmd::Shutdown => break,
        }
    }
    info!("Asset thread exiting");
}

/// Mount levels delivered by the asset thread.
pub fn poll_asset_messages(world: &mut World) {
    let messages: Vec<AssetMessage> = match world.get_resource::<AssetBridge>() {
        Some(bridge) => bridge.rx_msg.try_iter().collect(),
        None => return,
    };
    for msg in messages {
        let status = match msg {
            AssetMessage::LevelLoaded(loaded) => {
                let source = loaded.source.display().to_string();
                match mount_level(world, *loaded) {
                    Ok(()) => SceneStatus::Ready,
                    Err(e) => {
                        error!("Failed to mount level '{}': {}", source, e);
                        SceneStatus::Failed(e.to_string())
                    }
                }
            }
            AssetMessage::LevelFailed { path, error: err } => {
                error!("Failed to load level '{}': {}", path.display(), err);
                SceneStatus::Failed(err)
            }
        };
        world.insert_resource(status);
    }
}
