//! Post-process shaders loaded on the GPU.
//!
//! NonSend: shaders belong to the OpenGL context of the main thread. Entries
//! are dropped (and unloaded by raylib) before the window goes away, see
//! [`GardenEngine::destroy`](crate::engine::GardenEngine::destroy).

use raylib::prelude::Shader;
use rustc_hash::FxHashMap;

pub struct ShaderEntry {
    pub shader: Shader,
    /// Uniform locations resolved so far; -1 when the shader lacks the uniform.
    locations: FxHashMap<String, i32>,
}

impl ShaderEntry {
    pub fn new(shader: Shader) -> Self {
        Self {
            shader,
            locations: FxHashMap::default(),
        }
    }

    /// Location of `name`, asked of the GPU only the first time.
    pub fn location(&mut self, name: &str) -> Option<i32> {
        let loc = match self.locations.get(name) {
            Some(loc) => *loc,
            None => {
                let loc = self.shader.get_shader_location(name);
                self.locations.insert(name.to_string(), loc);
                loc
            }
        };
        (loc >= 0).then_some(loc)
    }
}

#[derive(Default)]
pub struct ShaderStore {
    entries: FxHashMap<String, ShaderEntry>,
}

impl ShaderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `shader` under `key`, dropping any shader it replaces.
    pub fn insert(&mut self, key: &str, shader: Shader) {
        self.entries.insert(key.to_string(), ShaderEntry::new(shader));
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ShaderEntry> {
        self.entries.get_mut(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
