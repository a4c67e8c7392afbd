//! Deferred publish/subscribe signal bus.
//!
//! The [`SignalBus`] resource decouples game logic: code that wants to
//! announce something calls [`SignalBus::emit`], which only enqueues. Once per
//! frame [`drain_signals`](crate::systems::signalbus::drain_signals) takes the
//! signals queued so far and delivers each to the subscribers registered for
//! its name at that moment, in subscription order. Signals emitted while a
//! drain runs wait for the next drain, so a callback can never re-enter
//! another callback on the same stack.
//!
//! Subscriptions are owned by whoever holds their [`SubscriptionId`];
//! [`SignalSubscriptions`](crate::components::signalsubscriptions::SignalSubscriptions)
//! groups them so they can be cancelled together.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bevy_ecs::prelude::{Entity, Resource, World};
use rustc_hash::FxHashMap;

/// Optional payload carried by a [`Signal`].
#[derive(Debug, Clone, PartialEq)]
pub enum SignalData {
    Scalar(f32),
    Integer(i32),
    Text(String),
    Entity(Entity),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub name: Arc<str>,
    pub data: Option<SignalData>,
    /// World time of the emit, in milliseconds.
    pub timestamp: f64,
}

impl Signal {
    /// Target entity, when the payload names one.
    pub fn entity(&self) -> Option<Entity> {
        match self.data {
            Some(SignalData::Entity(e)) => Some(e),
            _ => None,
        }
    }
}

/// Callbacks receive the world so they can reach any component or resource,
/// including the bus itself to emit follow-up signals.
pub type SignalCallback = dyn FnMut(&Signal, &mut World) -> Result<(), String> + Send;

pub(crate) type SharedCallback = Arc<Mutex<Box<SignalCallback>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    callback: SharedCallback,
}

#[derive(Resource, Default)]
pub struct SignalBus {
    subscribers: FxHashMap<Arc<str>, Vec<Subscription>>,
    names: FxHashMap<SubscriptionId, Arc<str>>,
    pending: VecDeque<Signal>,
    next_id: u64,
    clock: f64,
    draining: bool,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `name`. Delivery order follows subscription order.
    pub fn subscribe<F>(&mut self, name: &str, callback: F) -> SubscriptionId
    where
        F: FnMut(&Signal, &mut World) -> Result<(), String> + Send + 'static,
    {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        let name: Arc<str> = match self.subscribers.get_key_value(name) {
            Some((existing, _)) => existing.clone(),
            None => Arc::from(name),
        };
        self.subscribers
            .entry(name.clone())
            .or_default()
            .push(Subscription {
                id,
                callback: Arc::new(Mutex::new(Box::new(callback))),
            });
        self.names.insert(id, name);
        id
    }

    /// Cancel one subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let Some(name) = self.names.remove(&id) else {
            return false;
        };
        if let Some(list) = self.subscribers.get_mut(&name) {
            list.retain(|s| s.id != id);
            if list.is_empty() {
                self.subscribers.remove(&name);
            }
        }
        true
    }

    /// Queue a signal for the next drain. Never calls a subscriber.
    pub fn emit(&mut self, name: &str, data: Option<SignalData>) {
        self.pending.push_back(Signal {
            name: Arc::from(name),
            data,
            timestamp: self.clock,
        });
    }

    /// `true` while at least one subscriber listens to `name`.
    pub fn is_active(&self, name: &str) -> bool {
        self.subscribers.contains_key(name)
    }

    pub fn subscriber_count(&self, name: &str) -> usize {
        self.subscribers.get(name).map_or(0, Vec::len)
    }

    /// Total live subscriptions across all names.
    pub fn subscription_count(&self) -> usize {
        self.names.len()
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.names.contains_key(&id)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Signal> {
        self.pending.iter()
    }

    pub fn is_draining(&self) -> bool {
        self.draining
    }

    /// Time stamped on signals emitted from now on.
    pub fn set_clock(&mut self, now_ms: f64) {
        self.clock = now_ms;
    }

    /// Drop every subscription and queued signal.
    pub fn clear(&mut self) {
        self.subscribers.clear();
        self.names.clear();
        self.pending.clear();
    }

    pub(crate) fn begin_drain(&mut self) -> Option<Vec<Signal>> {
        if self.draining {
            return None;
        }
        self.draining = true;
        Some(self.pending.drain(..).collect())
    }

    pub(crate) fn end_drain(&mut self) {
        self.draining = false;
    }

    /// Subscribers of `name` right now, in delivery order.
    pub(crate) fn subscribers_of(&self, name: &str) -> Vec<(SubscriptionId, SharedCallback)> {
        self.subscribers
            .get(name)
            .map(|list| {
                list.iter()
                    .map(|s| (s.id, s.callback.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for SignalBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalBus")
            .field(
                "subscribers",
                &self
                    .subscribers
                    .iter()
                    .map(|(k, v)| (k.as_ref(), v.len()))
                    .collect::<Vec<_>>(),
            )
            .field("pending", &self.pending.len())
            .field("draining", &self.draining)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &Signal, _: &mut World) -> Result<(), String> {
        Ok(())
    }

    #[test]
    fn name_goes_idle_when_last_subscriber_leaves() {
        let mut bus = SignalBus::new();
        assert!(!bus.is_active("bloom"));
        let a = bus.subscribe("bloom", noop);
        let b = bus.subscribe("bloom", noop);
        assert!(bus.is_active("bloom"));
        assert_eq!(bus.subscriber_count("bloom"), 2);
        assert!(bus.unsubscribe(a));
        assert!(bus.is_active("bloom"));
        assert!(bus.unsubscribe(b));
        assert!(!bus.is_active("bloom"));
        assert!(!bus.unsubscribe(b));
    }

    #[test]
    fn emit_only_queues() {
        let mut bus = SignalBus::new();
        bus.set_clock(1500.0);
        bus.emit("watered", Some(SignalData::Integer(3)));
        bus.emit("watered", None);
        assert_eq!(bus.pending_len(), 2);
        let first = bus.pending().next().unwrap();
        assert_eq!(first.timestamp, 1500.0);
        assert_eq!(first.data, Some(SignalData::Integer(3)));
    }

    #[test]
    fn drain_takes_a_snapshot() {
        let mut bus = SignalBus::new();
        bus.emit("a", None);
        let batch = bus.begin_drain().unwrap();
        bus.emit("b", None);
        assert_eq!(batch.len(), 1);
        assert_eq!(bus.pending_len(), 1);
        assert!(bus.begin_drain().is_none());
        bus.end_drain();
        assert_eq!(bus.begin_drain().map(|b| b.len()), Some(1));
    }

    #[test]
    fn subscribers_are_listed_in_subscription_order() {
        let mut bus = SignalBus::new();
        let a = bus.subscribe("x", noop);
        let b = bus.subscribe("x", noop);
        let c = bus.subscribe("x", noop);
        bus.unsubscribe(b);
        let ids: Vec<_> = bus.subscribers_of("x").into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, c]);
    }
}
