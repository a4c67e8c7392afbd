//! Pointer Interaction System.
//!
//! Once per frame, after the draw pass:
//! 1. the pointer's window position is mapped to world space with this
//!    frame's cover transform and parallax offset;
//! 2. every registered, active, `"clickable"` entity is hit tested against
//!    its box (its [`BoxCollider`] or a default 32×32 box centered on its
//!    position);
//! 3. callbacks fire in a fixed order: `on_leave` for entities hovered last
//!    frame but not now, `on_enter` for newly hovered ones, `on_hover` for
//!    every hovered one, and `on_click` for every hovered one on the rising
//!    edge of the button. Within a phase entities are visited in `Entity`
//!    order.
//!
//! Each callback is paired with an [`InteractionEvent`] trigger. Despawned
//! entities drop out of the registry without an `on_leave`.

use bevy_ecs::entity::Entities;
use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;
use rustc_hash::FxHashSet;

use crate::components::boxcollider::BoxCollider;
use crate::components::interactive::{InteractionCallback, Interactive};
use crate::components::mapposition::MapPosition;
use crate::events::interaction::{InteractionEvent, InteractionKind};
use crate::resources::parallax::Parallax;
use crate::resources::pointer::{PointerInteraction, PointerState};
use crate::resources::signalbus::SignalBus;
use crate::resources::viewport::Viewport;

type InteractiveQuery<'w, 's> =
    Query<'w, 's, (&'static Interactive, &'static MapPosition, Option<&'static BoxCollider>)>;

fn hit(query: &InteractiveQuery, entity: Entity, point: Vector2) -> bool {
    let Ok((interactive, position, collider)) = query.get(entity) else {
        return false;
    };
    interactive.is_clickable()
        && collider
            .copied()
            .unwrap_or_default()
            .contains_point(position.pos, point)
}

fn callback_of(
    query: &InteractiveQuery,
    entity: Entity,
    kind: InteractionKind,
) -> Option<InteractionCallback> {
    let (interactive, _, _) = query.get(entity).ok()?;
    let callbacks = &interactive.callbacks;
    match kind {
        InteractionKind::Enter => callbacks.on_enter.clone(),
        InteractionKind::Leave => callbacks.on_leave.clone(),
        InteractionKind::Hover => callbacks.on_hover.clone(),
        InteractionKind::Click => callbacks.on_click.clone(),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn pointer_interaction_system(
    mut interaction: ResMut<PointerInteraction>,
    mut pointer: ResMut<PointerState>,
    viewport: Res<Viewport>,
    parallax: Res<Parallax>,
    mut bus: ResMut<SignalBus>,
    query: InteractiveQuery,
    entities: &Entities,
    mut commands: Commands,
) {
    pointer.world = pointer
        .screen
        .map(|p| viewport.screen_to_world(p, parallax.current));

    for entity in interaction.registered() {
        if !entities.contains(entity) {
            interaction.unregister(entity);
        }
    }

    let mut now: FxHashSet<Entity> = FxHashSet::default();
    if let Some(point) = pointer.world {
        for entity in interaction.registered() {
            if hit(&query, entity, point) {
                now.insert(entity);
            }
        }
    }

    let mut hovered: Vec<Entity> = now.iter().copied().collect();
    hovered.sort();
    let previous = interaction.swap_hovered(now.clone());
    let mut left: Vec<Entity> = previous.difference(&now).copied().collect();
    left.sort();
    let entered: Vec<Entity> = hovered
        .iter()
        .copied()
        .filter(|e| !previous.contains(e))
        .collect();

    let mut fire = |entity: Entity, kind: InteractionKind| {
        if let Some(callback) = callback_of(&query, entity, kind) {
            callback(entity, &mut bus);
        }
        commands.trigger(InteractionEvent { entity, kind });
    };

    for entity in left {
        fire(entity, InteractionKind::Leave);
    }
    for entity in entered {
        fire(entity, InteractionKind::Enter);
    }
    for entity in &hovered {
        fire(*entity, InteractionKind::Hover);
    }
    if pointer.just_pressed() {
        for entity in &hovered {
            fire(*entity, InteractionKind::Click);
        }
    }
}
