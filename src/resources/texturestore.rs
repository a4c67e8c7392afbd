//! GPU textures keyed by the same string keys as
//! [`SpriteSheetStore`](crate::resources::spritesheet::SpriteSheetStore).
//!
//! Non-Send: textures belong to the main thread's GL context. Remove a
//! texture only after every sprite that names its key is gone.

use raylib::prelude::Texture2D;
use rustc_hash::FxHashMap;

#[derive(Default)]
pub struct TextureStore {
    map: FxHashMap<String, Texture2D>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Texture2D> {
        self.map.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, texture: Texture2D) {
        self.map.insert(key.into(), texture);
    }

    pub fn remove(&mut self, key: &str) -> Option<Texture2D> {
        self.map.remove(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
