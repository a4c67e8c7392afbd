//! Engine facade.
//!
//! [`GardenEngine`] owns the ECS [`World`] and the frame [`Schedule`] and is
//! the surface a host (the binary, a UI layer, tests) drives:
//!
//! ```ignore
//! let mut engine = GardenEngine::new(EngineConfig::new());
//! engine.on_ready(|world| { /* spawn characters, register interactive entities */ });
//! engine.load_level("assets/levels/garden.json")?;
//! loop {
//!     engine.tick(dt);
//! }
//! engine.destroy();
//! ```
//!
//! The engine exists before any asset resolves. Level loads requested with
//! [`GardenEngine::load_level`] run on the asset thread and are mounted by the
//! frame pipeline when they arrive. Every entry point is a no-op once
//! [`GardenEngine::destroy`] has run.
//!
//! Frame pipeline, in order: asset polling, pointer input, animated tiles,
//! parallax and day/night, draw pass, pointer interaction, character
//! animation, signal drain.

use std::path::Path;

use bevy_ecs::prelude::*;
use log::{debug, info};
use raylib::prelude::Vector2;

use crate::events::assets::AssetCmd;
use crate::resources::assets::{AssetBridge, setup_assets, shutdown_assets};
use crate::resources::daynight::DayNightCycle;
use crate::resources::engineconfig::EngineConfig;
use crate::resources::level::{LoadError, LoadedLevel};
use crate::resources::parallax::Parallax;
use crate::resources::pointer::{PointerInput, PointerInteraction, PointerState};
use crate::resources::postprocessshader::PostProcessShader;
use crate::resources::rendertarget::RenderTarget;
use crate::resources::scene::SceneStatus;
use crate::resources::shaderstore::ShaderStore;
use crate::resources::signalbus::SignalBus;
use crate::resources::spritesheet::SpriteSheetStore;
use crate::resources::texturestore::TextureStore;
use crate::resources::viewport::Viewport;
use crate::resources::worldtime::WorldTime;
use crate::systems::animatedtile::animated_tile_system;
use crate::systems::animation::character_animation_system;
use crate::systems::assets::poll_asset_messages;
use crate::systems::input::update_pointer_input;
use crate::systems::pointer::pointer_interaction_system;
use crate::systems::render::render_system;
use crate::systems::scene::{daynight_system, parallax_system};
use crate::systems::signalbus::drain_signals;
use crate::systems::tilemap::{mount_level, scene_is_mounted, unmount_tilemap};
use crate::systems::time::update_world_time;

/// Called once the drawing surface and a level exist.
pub type ReadyCallback = Box<dyn FnOnce(&mut World) + Send>;

pub struct GardenEngine {
    world: World,
    schedule: Schedule,
    ready_callbacks: Vec<ReadyCallback>,
    disposed: bool,
}

impl GardenEngine {
    /// Headless engine: no window, nothing loaded, `SceneStatus::Idle`.
    pub fn new(config: EngineConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(SignalBus::new());
        world.insert_resource(SpriteSheetStore::new());
        world.insert_resource(Viewport::new(
            config.window_width,
            config.window_height,
            config.world_width,
            config.world_height,
        ));
        world.insert_resource(Parallax::new(
            config.parallax_max_offset,
            config.parallax_lerp,
            config.parallax_decay,
        ));
        world.insert_resource(DayNightCycle::new(config.day_cycle_seconds));
        world.insert_resource(PointerInput::default());
        world.insert_resource(PointerState::default());
        world.insert_resource(PointerInteraction::new());
        world.insert_resource(PostProcessShader::new());
        world.insert_resource(SceneStatus::Idle);
        world.insert_resource(config);

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                poll_asset_messages,
                update_pointer_input,
                animated_tile_system.run_if(scene_is_mounted),
                parallax_system,
                daynight_system,
                render_system,
                pointer_interaction_system,
                character_animation_system,
                drain_signals,
            )
                .chain(),
        );

        Self {
            world,
            schedule,
            ready_callbacks: Vec::new(),
            disposed: false,
        }
    }

    /// Hand the engine a raylib window. Creates the GPU stores and the
    /// offscreen surface at the current world size: the mounted level's, or
    /// the configured one before any level is loaded.
    pub fn attach_window(
        &mut self,
        mut rl: raylib::RaylibHandle,
        thread: raylib::RaylibThread,
    ) -> Result<(), String> {
        if self.disposed {
            return Err(LoadError::Disposed.to_string());
        }
        let (w, h) = self.world.resource::<Viewport>().world_size();
        let smooth = self.world.resource::<EngineConfig>().smooth_scaling;
        let target = RenderTarget::new(&mut rl, &thread, w, h, smooth)?;
        let (win_w, win_h) = (rl.get_screen_width(), rl.get_screen_height());
        self.world.insert_non_send_resource(target);
        self.world.insert_non_send_resource(TextureStore::new());
        self.world.insert_non_send_resource(ShaderStore::new());
        self.world.insert_non_send_resource(rl);
        self.world.insert_non_send_resource(thread);
        self.resize(win_w.max(1) as u32, win_h.max(1) as u32);
        Ok(())
    }

    /// Queue a level load on the asset thread. The frame loop keeps running;
    /// the level is mounted by a later [`tick`](Self::tick).
    pub fn load_level(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        if self.disposed {
            return Err(LoadError::Disposed);
        }
        if !self.world.contains_resource::<AssetBridge>() {
            setup_assets(&mut self.world).map_err(|source| LoadError::Io {
                path: path.as_ref().to_path_buf(),
                source,
            })?;
        }
        let path = path.as_ref().to_path_buf();
        let bridge = self.world.resource::<AssetBridge>();
        if bridge
            .tx_cmd
            .send(AssetCmd::LoadLevel { path: path.clone() })
            .is_err()
        {
            return Err(LoadError::Io {
                path,
                source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "asset thread is gone"),
            });
        }
        info!("Loading level '{}'", path.display());
        self.world.insert_resource(SceneStatus::Loading {
            path: path.display().to_string(),
        });
        Ok(())
    }

    /// Load and mount level JSON right away. Relative paths inside it start
    /// at `base_dir`. On error nothing new is mounted.
    pub fn load_level_from_str(
        &mut self,
        json: &str,
        base_dir: impl AsRef<Path>,
    ) -> Result<(), LoadError> {
        if self.disposed {
            return Err(LoadError::Disposed);
        }
        let loaded = LoadedLevel::parse(json, base_dir.as_ref())?;
        mount_level(&mut self.world, loaded)?;
        self.world.insert_resource(SceneStatus::Ready);
        Ok(())
    }

    /// Load a fragment shader from `path` and use it for the window blit.
    ///
    /// The shader receives `uTime`, `uDayNight` and `uResolution` every frame.
    /// Needs an attached window.
    pub fn load_post_process(&mut self, key: &str, path: impl AsRef<Path>) -> Result<(), String> {
        if self.disposed {
            return Err(LoadError::Disposed.to_string());
        }
        let path = path.as_ref();
        if !path.is_file() {
            return Err(format!("Shader '{}' not found", path.display()));
        }
        let Some(mut rl) = self.world.remove_non_send_resource::<raylib::RaylibHandle>() else {
            return Err("No window attached".to_string());
        };
        let shader = self
            .world
            .get_non_send_resource::<raylib::RaylibThread>()
            .map(|thread| rl.load_shader(thread, None, Some(&path.to_string_lossy())));
        self.world.insert_non_send_resource(rl);
        let shader = shader.ok_or_else(|| "No render thread".to_string())?;

        match self.world.get_non_send_resource_mut::<ShaderStore>() {
            Some(mut store) => store.insert(key, shader),
            None => return Err("No shader store".to_string()),
        }
        self.world
            .resource_mut::<PostProcessShader>()
            .set_shader(Some(key));
        info!("Post-process shader '{}' loaded from '{}'", key, path.display());
        Ok(())
    }

    /// Run `callback` once the scene is ready. Fires on the next tick if it
    /// already is.
    pub fn on_ready(&mut self, callback: impl FnOnce(&mut World) + Send + 'static) {
        if self.disposed {
            debug!("on_ready after destroy ignored");
            return;
        }
        self.ready_callbacks.push(Box::new(callback));
    }

    /// New canvas size. Only the viewport transform changes; animation,
    /// state machines and parallax keep their state.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.disposed {
            debug!("resize after destroy ignored");
            return;
        }
        self.world.resource_mut::<Viewport>().resize(width, height);
    }

    /// Host-driven pointer: window position (`None` when away) and button.
    /// Overridden by the raylib mouse when a window is attached.
    pub fn set_pointer(&mut self, position: Option<Vector2>, down: bool) {
        if self.disposed {
            return;
        }
        *self.world.resource_mut::<PointerInput>() = PointerInput {
            screen: position,
            down,
        };
    }

    /// Register an entity with the pointer interaction system.
    pub fn register_interactive(&mut self, entity: Entity) -> bool {
        !self.disposed && self.world.resource_mut::<PointerInteraction>().register(entity)
    }

    pub fn unregister_interactive(&mut self, entity: Entity) -> bool {
        !self.disposed && self.world.resource_mut::<PointerInteraction>().unregister(entity)
    }

    /// Advance one frame by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if self.disposed {
            debug!("tick after destroy ignored");
            return;
        }
        update_world_time(&mut self.world, dt);
        self.schedule.run(&mut self.world);
        self.world.clear_trackers();

        if !self.ready_callbacks.is_empty() && self.status().is_ready() {
            for callback in std::mem::take(&mut self.ready_callbacks) {
                callback(&mut self.world);
            }
        }
    }

    /// Tear the scene down: tiles, layer containers, the animated list, then
    /// the sheet texture.
    pub fn unmount(&mut self) {
        if self.disposed {
            return;
        }
        if unmount_tilemap(&mut self.world) {
            self.world.resource_mut::<PointerInteraction>().clear();
            self.world.insert_resource(SceneStatus::Idle);
        }
    }

    /// Stop the asset thread, tear the scene down and release GPU resources
    /// ahead of the window. Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.disposed {
            debug!("destroy called twice");
            return;
        }
        shutdown_assets(&mut self.world);
        unmount_tilemap(&mut self.world);
        self.world.resource_mut::<SignalBus>().clear();
        self.world.resource_mut::<PointerInteraction>().clear();
        self.ready_callbacks.clear();

        self.world.remove_non_send_resource::<TextureStore>();
        self.world.remove_non_send_resource::<ShaderStore>();
        self.world.remove_non_send_resource::<RenderTarget>();
        self.world.remove_non_send_resource::<raylib::RaylibThread>();
        self.world.remove_non_send_resource::<raylib::RaylibHandle>();

        self.disposed = true;
        info!("Engine destroyed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn status(&self) -> SceneStatus {
        self.world
            .get_resource::<SceneStatus>()
            .cloned()
            .unwrap_or_default()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn signal_bus_mut(&mut self) -> Mut<'_, SignalBus> {
        self.world.resource_mut::<SignalBus>()
    }

    /// Window close requested, or no window attached.
    pub fn window_should_close(&self) -> bool {
        self.world
            .get_non_send_resource::<raylib::RaylibHandle>()
            .is_none_or(|rl| rl.window_should_close())
    }

    /// Seconds the last drawn frame took, 0 without a window.
    pub fn frame_time(&self) -> f32 {
        self.world
            .get_non_send_resource::<raylib::RaylibHandle>()
            .map_or(0.0, |rl| rl.get_frame_time())
    }

    /// Current window size when the OS resized it this frame.
    pub fn window_resized(&self) -> Option<(u32, u32)> {
        let rl = self.world.get_non_send_resource::<raylib::RaylibHandle>()?;
        rl.is_window_resized().then(|| {
            (
                rl.get_screen_width().max(1) as u32,
                rl.get_screen_height().max(1) as u32,
            )
        })
    }
}

impl Drop for GardenEngine {
    fn drop(&mut self) {
        if !self.disposed {
            self.destroy();
        }
    }
}
