//! Per-entity animation state machine.
//!
//! A [`CharacterAnimation`] holds a set of [`AnimationState`]s keyed by id and
//! exactly one current state. Each state owns the [`AnimatedTile`] it plays and
//! declares named transition edges (`condition -> target state id`).
//!
//! Transitions happen in two ways:
//! - `on_update` returning `Some(id)` (see [`TimedState`]), applied by
//!   [`CharacterAnimation::update`];
//! - a condition arriving from outside through
//!   [`CharacterAnimation::handle_transition`], usually via a
//!   [`TransitionBinding`] that routes bus signals to the machine.
//!
//! # Built-in states and their signals
//!
//! - [`LoopState`] plays its tile forever; it only leaves through declared edges.
//! - [`LocomotionState`] `"walk"` with rest state `"idle"` declares
//!   `"walk_stop" -> "idle"`. The rest state opts in to the matching
//!   `"walk_start" -> "walk"` edge with [`LoopState::with_locomotion`].
//! - [`TimedState`] moves to its `next` state by itself after `duration_ms`.

use bevy_ecs::prelude::*;
use log::warn;
use rustc_hash::FxHashMap;

use crate::components::animatedtile::AnimatedTile;
use crate::components::signalsubscriptions::{SignalHandler, SignalSubscriptions};
use crate::components::sprite::Sprite;
use crate::resources::signalbus::{Signal, SignalBus};
use crate::resources::spritesheet::SpriteSheetStore;

/// Capability set every state offers to the machine.
pub trait AnimationState: Send + Sync {
    fn id(&self) -> &str;

    /// Condition name -> target state id.
    fn transition_targets(&self) -> &FxHashMap<String, String>;

    fn animated_tile(&self) -> &AnimatedTile;

    fn on_enter(&mut self) {}

    /// Advance by `delta` seconds. `Some(id)` requests a transition.
    fn on_update(&mut self, delta: f32) -> Option<String> {
        let _ = delta;
        None
    }

    fn on_exit(&mut self) {}
}

/// Condition that starts locomotion state `id`.
pub fn start_condition(id: &str) -> String {
    format!("{}_start", id)
}

/// Condition that stops locomotion state `id`.
pub fn stop_condition(id: &str) -> String {
    format!("{}_stop", id)
}

/// Shared bookkeeping of the built-in states.
#[derive(Debug, Clone)]
struct StateCore {
    id: String,
    targets: FxHashMap<String, String>,
    tile: AnimatedTile,
    /// Milliseconds since the last `on_enter`.
    elapsed_ms: f64,
}

impl StateCore {
    fn new(id: impl Into<String>, tile: AnimatedTile) -> Self {
        Self {
            id: id.into(),
            targets: FxHashMap::default(),
            tile,
            elapsed_ms: 0.0,
        }
    }

    fn enter(&mut self) {
        self.elapsed_ms = 0.0;
        self.tile.reset(0.0);
    }

    fn tick(&mut self, delta: f32) {
        self.elapsed_ms += delta.max(0.0) as f64 * 1000.0;
        self.tile.advance(self.elapsed_ms);
    }
}

/// Looping animation left only through declared transitions.
#[derive(Debug, Clone)]
pub struct LoopState {
    core: StateCore,
}

impl LoopState {
    pub fn new(id: impl Into<String>, tile: AnimatedTile) -> Self {
        Self {
            core: StateCore::new(id, tile),
        }
    }

    pub fn with_transition(
        mut self,
        condition: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.core.targets.insert(condition.into(), target.into());
        self
    }

    /// Declare the `"<id>_start"` edge into a locomotion state.
    pub fn with_locomotion(self, locomotion: &LocomotionState) -> Self {
        let id = locomotion.id().to_string();
        self.with_transition(start_condition(&id), id)
    }
}

impl AnimationState for LoopState {
    fn id(&self) -> &str {
        &self.core.id
    }
    fn transition_targets(&self) -> &FxHashMap<String, String> {
        &self.core.targets
    }
    fn animated_tile(&self) -> &AnimatedTile {
        &self.core.tile
    }
    fn on_enter(&mut self) {
        self.core.enter();
    }
    fn on_update(&mut self, delta: f32) -> Option<String> {
        self.core.tick(delta);
        None
    }
}

/// Movement animation with a `"<id>_stop"` edge back to its rest state.
#[derive(Debug, Clone)]
pub struct LocomotionState {
    core: StateCore,
    rest: String,
}

impl LocomotionState {
    pub fn new(id: impl Into<String>, rest: impl Into<String>, tile: AnimatedTile) -> Self {
        let id = id.into();
        let rest = rest.into();
        let mut core = StateCore::new(id.clone(), tile);
        core.targets.insert(stop_condition(&id), rest.clone());
        Self { core, rest }
    }

    pub fn rest_state(&self) -> &str {
        &self.rest
    }

    pub fn with_transition(
        mut self,
        condition: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.core.targets.insert(condition.into(), target.into());
        self
    }
}

impl AnimationState for LocomotionState {
    fn id(&self) -> &str {
        &self.core.id
    }
    fn transition_targets(&self) -> &FxHashMap<String, String> {
        &self.core.targets
    }
    fn animated_tile(&self) -> &AnimatedTile {
        &self.core.tile
    }
    fn on_enter(&mut self) {
        self.core.enter();
    }
    fn on_update(&mut self, delta: f32) -> Option<String> {
        self.core.tick(delta);
        None
    }
}

/// Plays for `duration_ms`, then asks to move to `next`.
#[derive(Debug, Clone)]
pub struct TimedState {
    core: StateCore,
    duration_ms: f64,
    next: String,
}

impl TimedState {
    pub fn new(
        id: impl Into<String>,
        tile: AnimatedTile,
        duration_ms: f64,
        next: impl Into<String>,
    ) -> Self {
        Self {
            core: StateCore::new(id, tile),
            duration_ms,
            next: next.into(),
        }
    }

    pub fn with_transition(
        mut self,
        condition: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.core.targets.insert(condition.into(), target.into());
        self
    }
}

impl AnimationState for TimedState {
    fn id(&self) -> &str {
        &self.core.id
    }
    fn transition_targets(&self) -> &FxHashMap<String, String> {
        &self.core.targets
    }
    fn animated_tile(&self) -> &AnimatedTile {
        &self.core.tile
    }
    fn on_enter(&mut self) {
        self.core.enter();
    }
    fn on_update(&mut self, delta: f32) -> Option<String> {
        self.core.tick(delta);
        (self.core.elapsed_ms >= self.duration_ms).then(|| self.next.clone())
    }
}

/// Finite-state animation controller for one entity.
///
/// The first state added becomes current and is entered immediately; from
/// then on exactly one state is current until the last one is removed.
#[derive(Component, Default)]
pub struct CharacterAnimation {
    states: FxHashMap<String, Box<dyn AnimationState>>,
    order: Vec<String>,
    current: Option<String>,
}

impl CharacterAnimation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(mut self, state: impl AnimationState + 'static) -> Self {
        self.add_state(state);
        self
    }

    pub fn add_state(&mut self, state: impl AnimationState + 'static) {
        self.add_boxed(Box::new(state));
    }

    /// Add (or replace) a state. A replaced current state is exited and its
    /// replacement entered.
    pub fn add_boxed(&mut self, mut state: Box<dyn AnimationState>) {
        let id = state.id().to_string();
        let replaces_current = self.current.as_deref() == Some(id.as_str());
        if replaces_current {
            if let Some(old) = self.states.get_mut(&id) {
                old.on_exit();
            }
        }
        if self.current.is_none() {
            self.current = Some(id.clone());
        }
        let enter = self.current.as_deref() == Some(id.as_str());
        if enter {
            state.on_enter();
        }
        if self.states.insert(id.clone(), state).is_none() {
            self.order.push(id);
        }
    }

    /// Remove a state. Removing the current one exits it first and falls
    /// back to the earliest remaining state, which is entered.
    pub fn remove_state(&mut self, id: &str) -> Option<Box<dyn AnimationState>> {
        let is_current = self.current.as_deref() == Some(id);
        let mut removed = self.states.remove(id)?;
        self.order.retain(|s| s != id);
        if is_current {
            removed.on_exit();
            self.current = self.order.first().cloned();
            if let Some(next) = self.current.clone() {
                if let Some(state) = self.states.get_mut(&next) {
                    state.on_enter();
                }
            }
        }
        Some(removed)
    }

    pub fn current_state_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current_state(&self) -> Option<&dyn AnimationState> {
        self.current
            .as_ref()
            .and_then(|id| self.states.get(id))
            .map(|s| s.as_ref())
    }

    pub fn state(&self, id: &str) -> Option<&dyn AnimationState> {
        self.states.get(id).map(|s| s.as_ref())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.states.contains_key(id)
    }

    /// State ids in the order they were added.
    pub fn state_ids(&self) -> &[String] {
        &self.order
    }

    /// Every condition declared by any state, deduplicated, in state order.
    pub fn declared_conditions(&self) -> Vec<String> {
        let mut conditions: Vec<String> = Vec::new();
        for id in &self.order {
            if let Some(state) = self.states.get(id) {
                let mut own: Vec<&String> = state.transition_targets().keys().collect();
                own.sort();
                for condition in own {
                    if !conditions.contains(condition) {
                        conditions.push(condition.clone());
                    }
                }
            }
        }
        conditions
    }

    /// Switch to `id`. No-op (returns `false`) if it is already current or unknown.
    pub fn transition_to(&mut self, id: &str) -> bool {
        if self.current.as_deref() == Some(id) {
            return false;
        }
        if !self.states.contains_key(id) {
            warn!("Animation transition to unknown state '{}' ignored", id);
            return false;
        }
        if let Some(old) = self.current.as_ref().and_then(|c| self.states.get_mut(c)) {
            old.on_exit();
        }
        self.current = Some(id.to_string());
        if let Some(new) = self.states.get_mut(id) {
            new.on_enter();
        }
        true
    }

    /// Follow the current state's edge for `condition`, if it declares one.
    pub fn handle_transition(&mut self, condition: &str) -> bool {
        let target = self
            .current_state()
            .and_then(|s| s.transition_targets().get(condition).cloned());
        match target {
            Some(target) => self.transition_to(&target),
            None => false,
        }
    }

    /// Run the current state's `on_update`, following the transition it requests.
    pub fn update(&mut self, delta: f32) -> bool {
        let requested = match self.current.as_ref().and_then(|c| self.states.get_mut(c)) {
            Some(state) => state.on_update(delta),
            None => return false,
        };
        match requested {
            Some(next) => self.transition_to(&next),
            None => false,
        }
    }

    /// Sprite-sheet index the current state shows.
    pub fn current_frame_id(&self) -> Option<u32> {
        self.current_state()
            .and_then(|s| s.animated_tile().current_frame_id())
    }

    /// Point `sprite` at the current frame. Logs and keeps the old frame when
    /// the sheet has no such region.
    pub fn sync_sprite(&self, sprite: &mut Sprite, sheets: &SpriteSheetStore) {
        let Some(frame) = self.current_frame_id() else {
            return;
        };
        match sheets.region(&sprite.tex_key, frame) {
            Some(region) => {
                if !sprite.shows_region(&region) {
                    sprite.set_region(&region);
                }
            }
            None => warn!(
                "Sprite sheet '{}' has no frame {}; keeping previous frame",
                sprite.tex_key, frame
            ),
        }
    }
}

impl std::fmt::Debug for CharacterAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharacterAnimation")
            .field("states", &self.order)
            .field("current", &self.current)
            .finish()
    }
}

/// Routes bus signals named after transition conditions to one entity's
/// [`CharacterAnimation`].
///
/// Signals carrying an [`Entity`](crate::resources::signalbus::SignalData::Entity)
/// payload only reach that entity; signals without one reach every bound
/// entity.
#[derive(Component, Debug)]
pub struct TransitionBinding {
    entity: Entity,
    conditions: Vec<String>,
    subscriptions: SignalSubscriptions,
}

impl TransitionBinding {
    pub fn new(entity: Entity, conditions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            entity,
            conditions: conditions.into_iter().map(Into::into).collect(),
            subscriptions: SignalSubscriptions::new(),
        }
    }

    /// Bind every condition any state of `machine` declares.
    pub fn for_machine(entity: Entity, machine: &CharacterAnimation) -> Self {
        Self::new(entity, machine.declared_conditions())
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn subscriptions(&self) -> &SignalSubscriptions {
        &self.subscriptions
    }
}

impl SignalHandler for TransitionBinding {
    fn initialize(&mut self, bus: &mut SignalBus) {
        for condition in &self.conditions {
            let entity = self.entity;
            self.subscriptions.subscribe(bus, condition, move |signal, world: &mut World| {
                apply_transition(entity, signal, world)
            });
        }
    }

    fn subscriptions_mut(&mut self) -> &mut SignalSubscriptions {
        &mut self.subscriptions
    }
}

/// Route `signal` to `entity`'s state machine unless it targets another entity.
fn apply_transition(entity: Entity, signal: &Signal, world: &mut World) -> Result<(), String> {
    if signal.entity().is_some_and(|target| target != entity) {
        return Ok(());
    }
    let Some(mut machine) = world.get_mut::<CharacterAnimation>(entity) else {
        return Err(format!("{:?} has no CharacterAnimation", entity));
    };
    if !machine.handle_transition(&signal.name) {
        return Ok(());
    }
    // Show the new state's first frame without waiting a frame.
    let frame = world
        .get::<CharacterAnimation>(entity)
        .and_then(|m| m.current_frame_id());
    let tex_key = world.get::<Sprite>(entity).map(|s| s.tex_key.clone());
    let (Some(frame), Some(key)) = (frame, tex_key) else {
        return Ok(());
    };
    let region = world
        .get_resource::<SpriteSheetStore>()
        .and_then(|sheets| sheets.region(&key, frame));
    if let (Some(region), Some(mut sprite)) = (region, world.get_mut::<Sprite>(entity)) {
        sprite.set_region(&region);
    }
    Ok(())
}

/// Bind `entity`'s state machine to the bus and store the binding on the entity.
///
/// Returns the number of conditions bound, or `None` when the entity has no
/// [`CharacterAnimation`] or there is no [`SignalBus`].
pub fn bind_transitions(world: &mut World, entity: Entity) -> Option<usize> {
    let machine = world.get::<CharacterAnimation>(entity)?;
    let mut binding = TransitionBinding::for_machine(entity, machine);
    {
        let mut bus = world.get_resource_mut::<SignalBus>()?;
        binding.initialize(&mut bus);
    }
    let bound = binding.conditions().len();
    if let Some(mut previous) = world.entity_mut(entity).take::<TransitionBinding>() {
        if let Some(mut bus) = world.get_resource_mut::<SignalBus>() {
            previous.destroy(&mut bus);
        }
    }
    world.entity_mut(entity).insert(binding);
    Some(bound)
}
