//! Character animation system.
//!
//! Runs [`CharacterAnimation::update`] on every state machine with the frame
//! delta, then points the entity's [`Sprite`] (when it has one) at the current
//! state's frame. Transitions requested through the signal bus are applied
//! during the drain and picked up here on the next frame.

use bevy_ecs::prelude::*;

use crate::components::animation::CharacterAnimation;
use crate::components::sprite::Sprite;
use crate::resources::spritesheet::SpriteSheetStore;
use crate::resources::worldtime::WorldTime;

pub fn character_animation_system(
    mut query: Query<(&mut CharacterAnimation, Option<&mut Sprite>)>,
    sheets: Res<SpriteSheetStore>,
    time: Res<WorldTime>,
) {
    for (mut machine, sprite) in query.iter_mut() {
        machine.update(time.delta);
        if let Some(mut sprite) = sprite {
            machine.sync_sprite(&mut sprite, &sheets);
        }
    }
}
