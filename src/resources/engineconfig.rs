//! Engine configuration resource.
//!
//! Settings come from an INI file; anything missing keeps its default.
//!
//! # Configuration File Format
//!
//! ```ini
//! [world]
//! width = 640
//! height = 360
//!
//! [window]
//! width = 1280
//! height = 720
//! target_fps = 60
//! smooth = false
//!
//! [scene]
//! day_cycle_seconds = 240
//! parallax_max_offset = 12
//! parallax_lerp = 0.08
//! parallax_decay = 0.9
//! water_frame_ms = 250
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::{Path, PathBuf};

use crate::resources::daynight::DEFAULT_CYCLE_SECONDS;
use crate::resources::parallax::{DEFAULT_DECAY, DEFAULT_LERP, DEFAULT_MAX_OFFSET};
use crate::resources::tilemap::WATER_FRAME_MS;

const DEFAULT_WORLD_WIDTH: u32 = 640;
const DEFAULT_WORLD_HEIGHT: u32 = 360;
const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 720;
const DEFAULT_TARGET_FPS: u32 = 60;
pub const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// World size in pixels used until a level is mounted; levels bring their own.
    pub world_width: u32,
    pub world_height: u32,
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: u32,
    /// Bilinear sampling when the world surface is scaled onto the window.
    pub smooth_scaling: bool,
    pub day_cycle_seconds: f32,
    pub parallax_max_offset: f32,
    pub parallax_lerp: f32,
    pub parallax_decay: f32,
    /// Frame duration of the built-in water family.
    pub water_frame_ms: f64,
    pub config_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            world_width: DEFAULT_WORLD_WIDTH,
            world_height: DEFAULT_WORLD_HEIGHT,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            smooth_scaling: false,
            day_cycle_seconds: DEFAULT_CYCLE_SECONDS,
            parallax_max_offset: DEFAULT_MAX_OFFSET,
            parallax_lerp: DEFAULT_LERP,
            parallax_decay: DEFAULT_DECAY,
            water_frame_ms: WATER_FRAME_MS,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load `config_path`. Missing keys keep their current values.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);
        info!(
            "Loaded config: {}x{} world, {}x{} window, fps={}, day cycle {}s",
            self.world_width,
            self.world_height,
            self.window_width,
            self.window_height,
            self.target_fps,
            self.day_cycle_seconds
        );
        Ok(())
    }

    /// Parse INI text, e.g. embedded defaults.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        let uint = |section: &str, key: &str| config.getuint(section, key).ok().flatten();
        let float = |section: &str, key: &str| config.getfloat(section, key).ok().flatten();

        // [world]
        if let Some(v) = uint("world", "width") {
            self.world_width = v as u32;
        }
        if let Some(v) = uint("world", "height") {
            self.world_height = v as u32;
        }
        // [window]
        if let Some(v) = uint("window", "width") {
            self.window_width = v as u32;
        }
        if let Some(v) = uint("window", "height") {
            self.window_height = v as u32;
        }
        if let Some(v) = uint("window", "target_fps") {
            self.target_fps = v as u32;
        }
        if let Some(v) = config.getbool("window", "smooth").ok().flatten() {
            self.smooth_scaling = v;
        }
        // [scene]
        if let Some(v) = float("scene", "day_cycle_seconds") {
            self.day_cycle_seconds = v as f32;
        }
        if let Some(v) = float("scene", "parallax_max_offset") {
            self.parallax_max_offset = v as f32;
        }
        if let Some(v) = float("scene", "parallax_lerp") {
            self.parallax_lerp = v as f32;
        }
        if let Some(v) = float("scene", "parallax_decay") {
            self.parallax_decay = v as f32;
        }
        if let Some(v) = float("scene", "water_frame_ms") {
            self.water_frame_ms = v;
        }
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        let mut config = Ini::new();
        config.set("world", "width", Some(self.world_width.to_string()));
        config.set("world", "height", Some(self.world_height.to_string()));
        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "smooth", Some(self.smooth_scaling.to_string()));
        config.set("scene", "day_cycle_seconds", Some(self.day_cycle_seconds.to_string()));
        config.set("scene", "parallax_max_offset", Some(self.parallax_max_offset.to_string()));
        config.set("scene", "parallax_lerp", Some(self.parallax_lerp.to_string()));
        config.set("scene", "parallax_decay", Some(self.parallax_decay.to_string()));
        config.set("scene", "water_frame_ms", Some(self.water_frame_ms.to_string()));
        config
            .write(path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;
        info!("Saved config to {:?}", path);
        Ok(())
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    pub fn world_size(&self) -> (u32, u32) {
        (self.world_width, self.world_height)
    }
}
