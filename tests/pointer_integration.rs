//! Pointer Interaction System integration tests: callback ordering, rising
//! edge clicks, silent unregistration, cursor style and observer events.

use std::sync::{Arc, Mutex};

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

use gardenengine::components::boxcollider::BoxCollider;
use gardenengine::components::interactive::{CLICKABLE_TAG, Interactive};
use gardenengine::components::mapposition::MapPosition;
use gardenengine::events::interaction::{InteractionEvent, InteractionKind};
use gardenengine::resources::parallax::Parallax;
use gardenengine::resources::pointer::{CursorStyle, PointerInput, PointerInteraction, PointerState};
use gardenengine::resources::signalbus::{SignalBus, SignalData};
use gardenengine::resources::viewport::Viewport;
use gardenengine::systems::input::update_pointer_input;
use gardenengine::systems::pointer::pointer_interaction_system;

type Log = Arc<Mutex<Vec<(Entity, &'static str)>>>;

fn make_world(viewport: Viewport) -> World {
    let mut world = World::new();
    world.insert_resource(viewport);
    world.insert_resource(Parallax::default());
    world.insert_resource(SignalBus::new());
    world.insert_resource(PointerInput::default());
    world.insert_resource(PointerState::default());
    world.insert_resource(PointerInteraction::new());
    world
}

fn make_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((update_pointer_input, pointer_interaction_system).chain());
    schedule
}

/// One frame with the pointer at `at` (window space) and the button state.
fn frame(world: &mut World, schedule: &mut Schedule, at: Option<(f32, f32)>, down: bool) {
    *world.resource_mut::<PointerInput>() = PointerInput {
        screen: at.map(|(x, y)| Vector2::new(x, y)),
        down,
    };
    schedule.run(world);
}

fn tracked(log: &Log) -> Interactive {
    let (a, b, c, d) = (log.clone(), log.clone(), log.clone(), log.clone());
    Interactive::new()
        .on_enter(move |e, _: &mut SignalBus| a.lock().unwrap().push((e, "enter")))
        .on_leave(move |e, _: &mut SignalBus| b.lock().unwrap().push((e, "leave")))
        .on_hover(move |e, _: &mut SignalBus| c.lock().unwrap().push((e, "hover")))
        .on_click(move |e, _: &mut SignalBus| d.lock().unwrap().push((e, "click")))
}

fn spawn_flower(world: &mut World, log: &Log, x: f32, y: f32) -> Entity {
    let e = world
        .spawn((tracked(log), MapPosition::new(x, y), BoxCollider::new(20.0, 20.0)))
        .id();
    world.resource_mut::<PointerInteraction>().register(e);
    e
}

fn take(log: &Log) -> Vec<(Entity, &'static str)> {
    std::mem::take(&mut *log.lock().unwrap())
}

fn identity() -> Viewport {
    Viewport::new(320, 180, 320, 180)
}

#[test]
fn enter_hover_then_leave_without_hover() {
    let mut world = make_world(identity());
    let mut schedule = make_schedule();
    let log: Log = Arc::default();
    let flower = spawn_flower(&mut world, &log, 100.0, 100.0);

    frame(&mut world, &mut schedule, Some((105.0, 95.0)), false);
    assert_eq!(take(&log), vec![(flower, "enter"), (flower, "hover")]);
    assert_eq!(world.resource::<PointerInteraction>().cursor(), CursorStyle::Pointer);

    frame(&mut world, &mut schedule, Some((100.0, 100.0)), false);
    assert_eq!(take(&log), vec![(flower, "hover")]);

    frame(&mut world, &mut schedule, Some((200.0, 20.0)), false);
    assert_eq!(take(&log), vec![(flower, "leave")]);
    assert_eq!(world.resource::<PointerInteraction>().cursor(), CursorStyle::Default);

    frame(&mut world, &mut schedule, None, false);
    assert!(take(&log).is_empty());
}

#[test]
fn phases_run_leave_enter_hover_click_in_entity_order() {
    let mut world = make_world(identity());
    let mut schedule = make_schedule();
    let log: Log = Arc::default();
    let left = spawn_flower(&mut world, &log, 50.0, 50.0);
    let a = spawn_flower(&mut world, &log, 100.0, 100.0);
    let b = spawn_flower(&mut world, &log, 110.0, 100.0);

    frame(&mut world, &mut schedule, Some((50.0, 50.0)), false);
    take(&log);

    // Overlap of a and b, button pressed on arrival.
    frame(&mut world, &mut schedule, Some((105.0, 100.0)), true);
    assert_eq!(
        take(&log),
        vec![
            (left, "leave"),
            (a, "enter"),
            (b, "enter"),
            (a, "hover"),
            (b, "hover"),
            (a, "click"),
            (b, "click"),
        ]
    );
    assert_eq!(world.resource::<PointerInteraction>().hovered(), vec![a, b]);
}

#[test]
fn click_fires_on_the_rising_edge_only() {
    let mut world = make_world(identity());
    let mut schedule = make_schedule();
    let log: Log = Arc::default();
    let flower = spawn_flower(&mut world, &log, 100.0, 100.0);
    let clicks = |log: &Log| take(log).into_iter().filter(|(_, k)| *k == "click").count();

    frame(&mut world, &mut schedule, Some((100.0, 100.0)), true);
    assert_eq!(clicks(&log), 1);
    frame(&mut world, &mut schedule, Some((100.0, 100.0)), true);
    assert_eq!(clicks(&log), 0, "holding the button is not a click");
    frame(&mut world, &mut schedule, Some((100.0, 100.0)), false);
    assert_eq!(clicks(&log), 0);
    frame(&mut world, &mut schedule, Some((100.0, 100.0)), true);
    assert_eq!(clicks(&log), 1);

    // Pressed elsewhere, dragged on.
    frame(&mut world, &mut schedule, Some((10.0, 10.0)), false);
    frame(&mut world, &mut schedule, Some((10.0, 10.0)), true);
    frame(&mut world, &mut schedule, Some((100.0, 100.0)), true);
    assert_eq!(clicks(&log), 0);
    assert!(world.resource::<PointerInteraction>().is_hovered(flower));
}

#[test]
fn unregistering_a_hovered_entity_never_fires_leave() {
    let mut world = make_world(identity());
    let mut schedule = make_schedule();
    let log: Log = Arc::default();
    let flower = spawn_flower(&mut world, &log, 100.0, 100.0);

    frame(&mut world, &mut schedule, Some((100.0, 100.0)), false);
    take(&log);

    assert!(world.resource_mut::<PointerInteraction>().unregister(flower));
    assert!(!world.resource::<PointerInteraction>().is_hovered(flower));

    frame(&mut world, &mut schedule, Some((100.0, 100.0)), false);
    frame(&mut world, &mut schedule, Some((300.0, 10.0)), false);
    assert!(take(&log).is_empty());
}

#[test]
fn despawned_entities_are_pruned_silently() {
    let mut world = make_world(identity());
    let mut schedule = make_schedule();
    let log: Log = Arc::default();
    let flower = spawn_flower(&mut world, &log, 100.0, 100.0);

    frame(&mut world, &mut schedule, Some((100.0, 100.0)), false);
    take(&log);
    world.despawn(flower);

    frame(&mut world, &mut schedule, Some((100.0, 100.0)), false);
    assert!(take(&log).is_empty());
    let interaction = world.resource::<PointerInteraction>();
    assert!(!interaction.is_registered(flower));
    assert!(interaction.hovered().is_empty());
}

#[test]
fn unregistered_inactive_or_untagged_entities_are_ignored() {
    let mut world = make_world(identity());
    let mut schedule = make_schedule();
    let log: Log = Arc::default();

    // Not registered.
    world.spawn((tracked(&log), MapPosition::new(100.0, 100.0)));
    // Registered but without the clickable tag.
    let untagged = world
        .spawn((tracked(&log).without_tag(CLICKABLE_TAG), MapPosition::new(100.0, 100.0)))
        .id();
    world.resource_mut::<PointerInteraction>().register(untagged);
    // Registered, starts active.
    let sleepy = spawn_flower(&mut world, &log, 100.0, 100.0);

    frame(&mut world, &mut schedule, Some((100.0, 100.0)), false);
    assert_eq!(take(&log), vec![(sleepy, "enter"), (sleepy, "hover")]);

    world.get_mut::<Interactive>(sleepy).unwrap().active = false;
    frame(&mut world, &mut schedule, Some((100.0, 100.0)), false);
    assert_eq!(take(&log), vec![(sleepy, "leave")]);
}

#[test]
fn default_hit_box_is_32_square_centered() {
    let mut world = make_world(identity());
    let mut schedule = make_schedule();
    let log: Log = Arc::default();
    let e = world
        .spawn((tracked(&log), MapPosition::new(100.0, 100.0)))
        .id();
    world.resource_mut::<PointerInteraction>().register(e);

    frame(&mut world, &mut schedule, Some((116.0, 84.0)), false);
    assert!(world.resource::<PointerInteraction>().is_hovered(e));
    frame(&mut world, &mut schedule, Some((117.0, 100.0)), false);
    assert!(!world.resource::<PointerInteraction>().is_hovered(e));
}

#[test]
fn hit_testing_undoes_cover_scale_and_parallax() {
    // 2x cover scale, no cropping.
    let mut world = make_world(Viewport::new(640, 360, 320, 180));
    let mut schedule = make_schedule();
    let log: Log = Arc::default();
    world.resource_mut::<Parallax>().current = Vector2::new(10.0, 0.0);

    let shifted = world
        .spawn((tracked(&log), MapPosition::new(90.0, 100.0), BoxCollider::new(4.0, 4.0)))
        .id();
    let unshifted = world
        .spawn((tracked(&log), MapPosition::new(100.0, 100.0), BoxCollider::new(4.0, 4.0)))
        .id();
    {
        let mut interaction = world.resource_mut::<PointerInteraction>();
        interaction.register(shifted);
        interaction.register(unshifted);
    }

    frame(&mut world, &mut schedule, Some((200.0, 200.0)), false);
    let pointer = *world.resource::<PointerState>();
    assert_eq!(pointer.world, Some(Vector2::new(90.0, 100.0)));
    assert_eq!(world.resource::<PointerInteraction>().hovered(), vec![shifted]);
}

#[test]
fn observers_see_every_interaction() {
    let mut world = make_world(identity());
    let mut schedule = make_schedule();
    let log: Log = Arc::default();
    let seen: Arc<Mutex<Vec<InteractionKind>>> = Arc::default();
    {
        let seen = seen.clone();
        world.add_observer(move |trigger: On<InteractionEvent>| {
            seen.lock().unwrap().push(trigger.event().kind);
        });
    }
    // No callbacks at all; the events still fire.
    let bare = world
        .spawn((Interactive::new(), MapPosition::new(100.0, 100.0)))
        .id();
    world.resource_mut::<PointerInteraction>().register(bare);

    frame(&mut world, &mut schedule, Some((100.0, 100.0)), true);
    frame(&mut world, &mut schedule, None, false);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            InteractionKind::Enter,
            InteractionKind::Hover,
            InteractionKind::Click,
            InteractionKind::Leave,
        ]
    );
    assert!(take(&log).is_empty());
}

#[test]
fn callbacks_emit_onto_the_bus_for_the_next_drain() {
    let mut world = make_world(identity());
    let mut schedule = make_schedule();
    let flower = world
        .spawn((
            Interactive::new().on_click(|e, bus: &mut SignalBus| {
                bus.emit("picked", Some(SignalData::Entity(e)));
            }),
            MapPosition::new(100.0, 100.0),
        ))
        .id();
    world.resource_mut::<PointerInteraction>().register(flower);

    frame(&mut world, &mut schedule, Some((100.0, 100.0)), true);

    let bus = world.resource::<SignalBus>();
    let queued: Vec<_> = bus.pending().collect();
    assert_eq!(queued.len(), 1);
    assert_eq!(&*queued[0].name, "picked");
    assert_eq!(queued[0].entity(), Some(flower));
}
