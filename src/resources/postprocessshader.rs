//! Post-process shader selection resource.
//!
//! Controls which shader (if any) is applied during the final blit from the
//! offscreen surface to the window. The engine only parameterizes it; what
//! the shader does with the values is up to the host.

use bevy_ecs::prelude::Resource;
use log::warn;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Value of a shader uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec2 { x: f32, y: f32 },
}

/// Elapsed seconds.
pub const U_TIME: &str = "uTime";
/// [`DayNightCycle::value`](crate::resources::daynight::DayNightCycle).
pub const U_DAY_NIGHT: &str = "uDayNight";
/// Offscreen surface size.
pub const U_RESOLUTION: &str = "uResolution";

/// Uniform names set automatically by the render system.
pub const RESERVED_UNIFORMS: &[&str] = &[U_TIME, U_DAY_NIGHT, U_RESOLUTION];

/// When `key` is `Some`, the render system applies the named shader during
/// the final blit.
#[derive(Resource, Debug, Default)]
pub struct PostProcessShader {
    pub key: Option<Arc<str>>,
    pub uniforms: FxHashMap<Arc<str>, UniformValue>,
}

impl PostProcessShader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_shader(&mut self, key: Option<&str>) {
        self.key = key.map(Arc::from);
    }

    /// Store a user uniform. Reserved names are rejected.
    pub fn set_uniform(&mut self, name: &str, value: UniformValue) -> bool {
        if RESERVED_UNIFORMS.contains(&name) {
            warn!("Uniform '{}' is set by the engine; ignoring", name);
            return false;
        }
        self.uniforms.insert(Arc::from(name), value);
        true
    }

    pub fn clear_uniform(&mut self, name: &str) {
        self.uniforms.remove(name);
    }

    pub fn clear_uniforms(&mut self) {
        self.uniforms.clear();
    }

    /// Reserved uniforms for this frame followed by the user ones.
    pub fn frame_uniforms(
        &self,
        time: f32,
        day_night: f32,
        resolution: (f32, f32),
    ) -> Vec<(Arc<str>, UniformValue)> {
        let mut out: Vec<(Arc<str>, UniformValue)> = vec![
            (Arc::from(U_TIME), UniformValue::Float(time)),
            (Arc::from(U_DAY_NIGHT), UniformValue::Float(day_night)),
            (
                Arc::from(U_RESOLUTION),
                UniformValue::Vec2 {
                    x: resolution.0,
                    y: resolution.1,
                },
            ),
        ];
        out.extend(self.uniforms.iter().map(|(k, v)| (k.clone(), *v)));
        out
    }
}
