//! Pointer state and the hover bookkeeping of the interaction system.
//!
//! [`PointerState`] is written once per frame by the input stage from
//! [`PointerInput`]. [`PointerInteraction`] is
//! written only by
//! [`pointer_interaction_system`](crate::systems::pointer::pointer_interaction_system)
//! and by explicit register/unregister calls.

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;
use rustc_hash::FxHashSet;

/// Latest raw pointer input: from raylib when a window exists, otherwise
/// whatever the host last passed to `GardenEngine::set_pointer`.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerInput {
    pub screen: Option<Vector2>,
    pub down: bool,
}

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    /// Window position, `None` when the pointer is not over the canvas.
    pub screen: Option<Vector2>,
    /// World position derived from `screen` this frame.
    pub world: Option<Vector2>,
    pub down: bool,
    /// `down` as of the previous frame.
    pub was_down: bool,
}

impl PointerState {
    /// Store this frame's raw input, shifting `down` into `was_down`.
    pub fn feed(&mut self, screen: Option<Vector2>, down: bool) {
        self.was_down = self.down;
        self.screen = screen;
        self.down = down;
    }

    /// Rising edge of the button.
    pub fn just_pressed(&self) -> bool {
        self.down && !self.was_down
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorStyle {
    #[default]
    Default,
    Pointer,
}

#[derive(Resource, Debug, Default)]
pub struct PointerInteraction {
    registered: FxHashSet<Entity>,
    hovered: FxHashSet<Entity>,
    cursor: CursorStyle,
}

impl PointerInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entity: Entity) -> bool {
        self.registered.insert(entity)
    }

    /// Stop hit testing `entity`. It also leaves the hovered set silently:
    /// no `on_leave` will ever fire for it.
    pub fn unregister(&mut self, entity: Entity) -> bool {
        self.hovered.remove(&entity);
        self.registered.remove(&entity)
    }

    pub fn is_registered(&self, entity: Entity) -> bool {
        self.registered.contains(&entity)
    }

    pub fn is_hovered(&self, entity: Entity) -> bool {
        self.hovered.contains(&entity)
    }

    /// Hovered entities, sorted.
    pub fn hovered(&self) -> Vec<Entity> {
        let mut v: Vec<Entity> = self.hovered.iter().copied().collect();
        v.sort();
        v
    }

    /// Registered entities, sorted.
    pub fn registered(&self) -> Vec<Entity> {
        let mut v: Vec<Entity> = self.registered.iter().copied().collect();
        v.sort();
        v
    }

    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    /// Replace the hovered set with this frame's hits, returning the previous
    /// set. The cursor follows whether anything is hovered.
    pub(crate) fn swap_hovered(&mut self, now: FxHashSet<Entity>) -> FxHashSet<Entity> {
        self.cursor = if now.is_empty() {
            CursorStyle::Default
        } else {
            CursorStyle::Pointer
        };
        std::mem::replace(&mut self.hovered, now)
    }

    /// Forget everything, e.g. on scene unmount.
    pub fn clear(&mut self) {
        self.registered.clear();
        self.hovered.clear();
        self.cursor = CursorStyle::Default;
    }
}
