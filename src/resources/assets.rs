//! ECS resource bridging the main thread with the background asset loader.
//!
//! Use [`setup_assets`] once to spawn the loader thread and insert the
//! [`AssetBridge`]. Call [`shutdown_assets`] during teardown to stop and join
//! it. Level reads and image decoding happen on the loader thread so the frame
//! loop never blocks on them.

use crate::events::assets::{AssetCmd, AssetMessage};
use crate::systems::assets::asset_thread;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::warn;

#[derive(Resource)]
pub struct AssetBridge {
    /// ECS -> asset thread.
    pub tx_cmd: Sender<AssetCmd>,
    /// Asset thread -> ECS.
    pub rx_msg: Receiver<AssetMessage>,
    pub handle: std::thread::JoinHandle<()>,
}

/// Spawn the loader thread and insert [`AssetBridge`].
pub fn setup_assets(world: &mut World) -> std::io::Result<()> {
    let (tx_cmd, rx_cmd) = unbounded::<AssetCmd>();
    let (tx_msg, rx_msg) = unbounded::<AssetMessage>();

    let handle = std::thread::Builder::new()
        .name("assets".into())
        .spawn(move || asset_thread(rx_cmd, tx_msg))?;

    world.insert_resource(AssetBridge {
        tx_cmd,
        rx_msg,
        handle,
    });
    Ok(())
}

/// Ask the loader thread to stop and join it. No-op without a bridge.
pub fn shutdown_assets(world: &mut World) {
    if let Some(bridge) = world.remove_resource::<AssetBridge>() {
        let _ = bridge.tx_cmd.send(AssetCmd::Shutdown);
        if bridge.handle.join().is_err() {
            warn!("Asset thread panicked before shutdown");
        }
    }
}
