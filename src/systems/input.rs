//! Pointer input stage.
//!
//! With a raylib window present, the mouse is read into [`PointerInput`];
//! headless, `PointerInput` keeps whatever the host set. Either way the frame's
//! [`PointerState`] is fed from it exactly once.
use bevy_ecs::prelude::*;
use raylib::prelude::MouseButton;

use crate::resources::pointer::{PointerInput, PointerState};
use crate::resources::viewport::Viewport;

pub fn update_pointer_input(
    mut input: ResMut<PointerInput>,
    mut pointer: ResMut<PointerState>,
    viewport: Res<Viewport>,
    rl: Option<NonSend<raylib::RaylibHandle>>,
) {
    if let Some(rl) = rl {
        let pos = rl.get_mouse_position();
        input.screen = rl.is_cursor_on_screen().then_some(pos);
        input.down = rl.is_mouse_button_down(MouseButton::MOUSE_BUTTON_LEFT);
    }
    let screen = input.screen.filter(|p| viewport.contains_screen(*p));
    pointer.feed(screen, input.down);
}
