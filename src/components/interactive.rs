//! Pointer-interaction data for an entity.
//!
//! An entity takes part in hit testing when it has an [`Interactive`]
//! component, a [`MapPosition`](crate::components::mapposition::MapPosition)
//! and is registered with
//! [`PointerInteraction`](crate::resources::pointer::PointerInteraction).
//! The hit box is its [`BoxCollider`](crate::components::boxcollider::BoxCollider),
//! or a 32×32 box centered on the position when it has none.
//!
//! Callbacks receive the entity and the [`SignalBus`], so any follow-up work
//! they start is deferred to the next drain.

use std::sync::Arc;

use bevy_ecs::prelude::*;
use rustc_hash::FxHashSet;

use crate::resources::signalbus::SignalBus;

/// Tag an entity must carry to be hit tested.
pub const CLICKABLE_TAG: &str = "clickable";

pub type InteractionCallback = Arc<dyn Fn(Entity, &mut SignalBus) + Send + Sync>;

/// Optional per-phase callbacks.
#[derive(Clone, Default)]
pub struct InteractionCallbacks {
    pub on_enter: Option<InteractionCallback>,
    pub on_leave: Option<InteractionCallback>,
    pub on_hover: Option<InteractionCallback>,
    pub on_click: Option<InteractionCallback>,
}

impl std::fmt::Debug for InteractionCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionCallbacks")
            .field("on_enter", &self.on_enter.is_some())
            .field("on_leave", &self.on_leave.is_some())
            .field("on_hover", &self.on_hover.is_some())
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

#[derive(Component, Debug, Clone)]
pub struct Interactive {
    /// Inactive entities are skipped by hit testing (and leave the hovered set).
    pub active: bool,
    pub tags: FxHashSet<String>,
    pub callbacks: InteractionCallbacks,
}

impl Default for Interactive {
    fn default() -> Self {
        let mut tags = FxHashSet::default();
        tags.insert(CLICKABLE_TAG.to_string());
        Self {
            active: true,
            tags,
            callbacks: InteractionCallbacks::default(),
        }
    }
}

impl Interactive {
    /// Active and tagged `"clickable"`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn without_tag(mut self, tag: &str) -> Self {
        self.tags.remove(tag);
        self
    }

    pub fn on_enter(mut self, f: impl Fn(Entity, &mut SignalBus) + Send + Sync + 'static) -> Self {
        self.callbacks.on_enter = Some(Arc::new(f));
        self
    }

    pub fn on_leave(mut self, f: impl Fn(Entity, &mut SignalBus) + Send + Sync + 'static) -> Self {
        self.callbacks.on_leave = Some(Arc::new(f));
        self
    }

    pub fn on_hover(mut self, f: impl Fn(Entity, &mut SignalBus) + Send + Sync + 'static) -> Self {
        self.callbacks.on_hover = Some(Arc::new(f));
        self
    }

    pub fn on_click(mut self, f: impl Fn(Entity, &mut SignalBus) + Send + Sync + 'static) -> Self {
        self.callbacks.on_click = Some(Arc::new(f));
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Whether hit testing considers this entity at all.
    pub fn is_clickable(&self) -> bool {
        self.active && self.has_tag(CLICKABLE_TAG)
    }
}
