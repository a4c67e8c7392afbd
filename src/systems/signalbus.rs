//! Signal Bus drain system.
//!
//! [`drain_signals`] runs last in the frame. It delivers the signals that were
//! queued before it started; anything emitted by a callback during the drain
//! is left for the next frame. A callback returning `Err` or panicking is
//! logged and skipped, and delivery continues with the next subscriber.

use std::panic::{AssertUnwindSafe, catch_unwind};

use bevy_ecs::prelude::*;
use log::{debug, error};

use crate::resources::signalbus::SignalBus;
use crate::resources::worldtime::WorldTime;

/// Deliver every signal queued before this call, exactly once.
///
/// Subscribers are looked up per signal at dispatch time, and a subscriber
/// cancelled by an earlier callback in the same drain is not called.
pub fn drain_signals(world: &mut World) {
    let now = world
        .get_resource::<WorldTime>()
        .map_or(0.0, |t| t.elapsed_ms);

    let batch = {
        let Some(mut bus) = world.get_resource_mut::<SignalBus>() else {
            return;
        };
        bus.set_clock(now);
        match bus.begin_drain() {
            Some(batch) => batch,
            None => {
                debug!("drain_signals called while already draining; ignored");
                return;
            }
        }
    };

    for signal in batch {
        let targets = match world.get_resource::<SignalBus>() {
            Some(bus) => bus.subscribers_of(&signal.name),
            None => break,
        };
        for (id, callback) in targets {
            let still_subscribed = world
                .get_resource::<SignalBus>()
                .is_some_and(|bus| bus.is_subscribed(id));
            if !still_subscribed {
                continue;
            }
            let mut guard = callback.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let outcome = catch_unwind(AssertUnwindSafe(|| (*guard)(&signal, world)));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(
                    "Subscriber {:?} failed on signal '{}': {}",
                    id, signal.name, e
                ),
                Err(panic) => {
                    let msg = panic
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    error!(
                        "Subscriber {:?} panicked on signal '{}': {}",
                        id, signal.name, msg
                    );
                }
            }
        }
    }

    if let Some(mut bus) = world.get_resource_mut::<SignalBus>() {
        bus.end_drain();
    }
}
