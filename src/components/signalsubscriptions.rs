//! Ownership of signal subscriptions.
//!
//! A [`SignalHandler`] is any object that wires itself to the
//! [`SignalBus`] for the lifetime of something else (an avatar, a menu, a
//! scene). It records each subscription it makes in a [`SignalSubscriptions`]
//! set, and [`SignalHandler::destroy`] cancels exactly those, leaving other
//! handlers on the same signal names untouched.
//!
//! `SignalSubscriptions` is also a component: attach it to an entity and
//! despawn through [`despawn_with_subscriptions`] to release the entity's
//! wiring together with the entity.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::animation::TransitionBinding;
use crate::resources::signalbus::{Signal, SignalBus, SubscriptionId};

/// Set of subscriptions created by one owner.
#[derive(Component, Debug, Default, Clone)]
pub struct SignalSubscriptions {
    ids: Vec<SubscriptionId>,
}

impl SignalSubscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe on `bus` and remember the subscription.
    pub fn subscribe<F>(&mut self, bus: &mut SignalBus, name: &str, callback: F) -> SubscriptionId
    where
        F: FnMut(&Signal, &mut World) -> Result<(), String> + Send + 'static,
    {
        let id = bus.subscribe(name, callback);
        self.ids.push(id);
        id
    }

    /// Cancel every subscription in this set. Returns how many were still live.
    pub fn cancel_all(&mut self, bus: &mut SignalBus) -> usize {
        self.ids
            .drain(..)
            .filter(|id| bus.unsubscribe(*id))
            .count()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[SubscriptionId] {
        &self.ids
    }
}

/// Long-lived owner of bus wiring.
pub trait SignalHandler {
    /// Create this handler's subscriptions.
    fn initialize(&mut self, bus: &mut SignalBus);

    fn subscriptions_mut(&mut self) -> &mut SignalSubscriptions;

    /// Cancel the subscriptions this handler created, and only those.
    fn destroy(&mut self, bus: &mut SignalBus) {
        let cancelled = self.subscriptions_mut().cancel_all(bus);
        debug!("Signal handler released {} subscriptions", cancelled);
    }
}

/// Despawn `entity`, first cancelling the subscriptions it owns (including
/// its [`TransitionBinding`]).
///
/// Returns `false` if the entity did not exist.
pub fn despawn_with_subscriptions(world: &mut World, entity: Entity) -> bool {
    let owned = world
        .get_entity_mut(entity)
        .ok()
        .and_then(|mut e| e.take::<SignalSubscriptions>());
    let binding = world
        .get_entity_mut(entity)
        .ok()
        .and_then(|mut e| e.take::<TransitionBinding>());
    if let Some(mut bus) = world.get_resource_mut::<SignalBus>() {
        if let Some(mut owned) = owned {
            owned.cancel_all(&mut bus);
        }
        if let Some(mut binding) = binding {
            binding.destroy(&mut bus);
        }
    }
    world.try_despawn(entity).is_ok()
}
