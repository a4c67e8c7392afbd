//! Pointer interaction notifications.
//!
//! [`pointer_interaction_system`](crate::systems::pointer::pointer_interaction_system)
//! triggers an [`InteractionEvent`] next to every callback it runs, so hosts
//! can observe interaction without attaching callbacks to each entity:
//!
//! ```ignore
//! world.add_observer(|trigger: On<InteractionEvent>| {
//!     if trigger.event().kind == InteractionKind::Click { /* ... */ }
//! });
//! ```
use bevy_ecs::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Enter,
    Leave,
    Hover,
    Click,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionEvent {
    pub entity: Entity,
    pub kind: InteractionKind,
}
