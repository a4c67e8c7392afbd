//! Per-frame camera state: parallax offset and day/night value.

use bevy_ecs::prelude::*;

use crate::resources::daynight::DayNightCycle;
use crate::resources::parallax::Parallax;
use crate::resources::pointer::PointerState;
use crate::resources::viewport::Viewport;
use crate::resources::worldtime::WorldTime;

/// Ease the parallax offset toward the pointer-driven target.
pub fn parallax_system(
    mut parallax: ResMut<Parallax>,
    pointer: Res<PointerState>,
    viewport: Res<Viewport>,
) {
    parallax.update(pointer.screen, &viewport);
}

pub fn daynight_system(mut cycle: ResMut<DayNightCycle>, time: Res<WorldTime>) {
    cycle.update(time.elapsed);
}
