//! Simulation clock.
//!
//! Advanced once per frame by [`crate::systems::time::update_world_time`].
//! Frame-animation timestamps are read from `elapsed_ms`, which accumulates
//! in `f64` so long sessions keep millisecond precision.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    /// Seconds since the engine started, scaled.
    pub elapsed: f32,
    /// Milliseconds since the engine started, scaled.
    pub elapsed_ms: f64,
    /// Seconds of the current frame, scaled.
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            elapsed_ms: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }
}
