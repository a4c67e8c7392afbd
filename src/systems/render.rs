//! Scene Renderer draw pass.
//!
//! Each frame the world is drawn into the fixed-size [`RenderTarget`] through
//! a `Camera2D` whose offset is the current parallax, then that surface is
//! blitted onto the window with the [`Viewport`] cover transform, through the
//! post-process shader when one is selected. Headless worlds (no
//! `RaylibHandle`) skip the whole stage.

use bevy_ecs::prelude::*;
use log::warn;
use raylib::prelude::*;

use crate::components::boxcollider::BoxCollider;
use crate::components::interactive::Interactive;
use crate::components::mapposition::MapPosition;
use crate::components::sprite::Sprite;
use crate::components::zindex::ZIndex;
use crate::resources::daynight::DayNightCycle;
use crate::resources::debugmode::DebugMode;
use crate::resources::parallax::Parallax;
use crate::resources::pointer::{CursorStyle, PointerInteraction, PointerState};
use crate::resources::postprocessshader::{PostProcessShader, UniformValue};
use crate::resources::rendertarget::RenderTarget;
use crate::resources::shaderstore::ShaderStore;
use crate::resources::texturestore::TextureStore;
use crate::resources::viewport::Viewport;
use crate::resources::worldtime::WorldTime;

/// Draw sprites back to front (ascending [`ZIndex`]) in world space.
pub fn render_pass<D: RaylibDraw>(world: &mut World, d: &mut D) {
    let mut to_draw: Vec<(Entity, Sprite, MapPosition, ZIndex)> = {
        let mut q = world.query::<(Entity, &Sprite, &MapPosition, &ZIndex)>();
        q.iter(world)
            .map(|(e, s, p, z)| (e, s.clone(), *p, *z))
            .collect()
    };
    to_draw.sort_by_key(|(e, _, _, z)| (*z, *e));

    if let Some(textures) = world.get_non_send_resource::<TextureStore>() {
        for (_, sprite, pos, _) in to_draw.iter() {
            let Some(tex) = textures.get(&sprite.tex_key) else {
                continue;
            };
            let mut src = Rectangle {
                x: sprite.offset.x,
                y: sprite.offset.y,
                width: sprite.width,
                height: sprite.height,
            };
            // A negative source extent mirrors the region in place.
            if sprite.flip_h {
                src.width = -src.width;
            }
            if sprite.flip_v {
                src.height = -src.height;
            }
            let dest = Rectangle {
                x: pos.pos.x,
                y: pos.pos.y,
                width: sprite.width,
                height: sprite.height,
            };
            d.draw_texture_pro(tex, src, dest, sprite.origin, 0.0, Color::WHITE);
        }
    }

    if world.contains_resource::<DebugMode>() {
        let mut boxes = world.query::<(&Interactive, &MapPosition, Option<&BoxCollider>)>();
        for (interactive, position, collider) in boxes.iter(world) {
            let (x, y, w, h) = collider.copied().unwrap_or_default().get_aabb(position.pos);
            let color = if interactive.is_clickable() {
                Color::RED
            } else {
                Color::GRAY
            };
            d.draw_rectangle_lines(x as i32, y as i32, w as i32, h as i32, color);
        }
    }
}

fn set_uniform(shader: &mut Shader, loc: i32, value: UniformValue) {
    match value {
        UniformValue::Float(v) => shader.set_shader_value(loc, v),
        UniformValue::Int(v) => shader.set_shader_value(loc, v),
        UniformValue::Vec2 { x, y } => shader.set_shader_value(loc, Vector2::new(x, y)),
    }
}

/// Sample the offscreen surface onto the window.
fn blit(
    world: &World,
    d: &mut RaylibDrawHandle,
    target: &RenderTarget,
    shaders: Option<&mut ShaderStore>,
) {
    let viewport = *world.resource::<Viewport>();
    let src = target.source_rect();
    let dest = viewport.dest_rect();

    let selected = world
        .get_resource::<PostProcessShader>()
        .and_then(|pp| pp.key.clone().map(|key| (key, pp)));
    let entry = match (selected, shaders) {
        (Some((key, pp)), Some(store)) => match store.get_mut(&key) {
            Some(entry) => {
                let time = world.resource::<WorldTime>().elapsed;
                let day_night = world.resource::<DayNightCycle>().value;
                for (name, value) in pp.frame_uniforms(time, day_night, target.size()) {
                    if let Some(loc) = entry.location(&name) {
                        set_uniform(&mut entry.shader, loc, value);
                    }
                }
                Some(entry)
            }
            None => {
                warn!("Post-process shader '{}' is not loaded", key);
                None
            }
        },
        _ => None,
    };

    match entry {
        Some(entry) => {
            let mut s = d.begin_shader_mode(&mut entry.shader);
            s.draw_texture_pro(&target.texture, src, dest, Vector2::zero(), 0.0, Color::WHITE);
        }
        None => d.draw_texture_pro(&target.texture, src, dest, Vector2::zero(), 0.0, Color::WHITE),
    }
}

fn render_debug_ui(world: &World, d: &mut RaylibDrawHandle) {
    if !world.contains_resource::<DebugMode>() {
        return;
    }
    let parallax = world.resource::<Parallax>();
    let pointer = world.resource::<PointerState>();
    let hovered = world.resource::<PointerInteraction>().hovered().len();
    let text = format!("FPS: {} | hovered: {}", d.get_fps(), hovered);
    d.draw_text(&text, 10, 10, 10, Color::WHITE);
    let text = format!(
        "Parallax: ({:.2}, {:.2}) | Pointer world: {}",
        parallax.current.x,
        parallax.current.y,
        match pointer.world {
            Some(p) => format!("({:.1}, {:.1})", p.x, p.y),
            None => "-".to_string(),
        }
    );
    d.draw_text(&text, 10, 24, 10, Color::WHITE);
}

/// Exclusive render stage.
pub fn render_system(world: &mut World) {
    let Some(mut rl) = world.remove_non_send_resource::<RaylibHandle>() else {
        return;
    };
    let (Some(thread), Some(mut target)) = (
        world.remove_non_send_resource::<RaylibThread>(),
        world.remove_non_send_resource::<RenderTarget>(),
    ) else {
        warn!("Render stage skipped: window resources missing");
        world.insert_non_send_resource(rl);
        return;
    };
    let mut shaders = world.remove_non_send_resource::<ShaderStore>();

    let camera = Camera2D {
        offset: world.resource::<Parallax>().current,
        target: Vector2::zero(),
        rotation: 0.0,
        zoom: 1.0,
    };
    {
        let mut t = rl.begin_texture_mode(&thread, &mut target.texture);
        t.clear_background(Color::BLACK);
        let mut d2 = t.begin_mode2D(camera);
        render_pass(world, &mut d2);
    }

    match world.resource::<PointerInteraction>().cursor() {
        CursorStyle::Pointer => rl.set_mouse_cursor(MouseCursor::MOUSE_CURSOR_POINTING_HAND),
        CursorStyle::Default => rl.set_mouse_cursor(MouseCursor::MOUSE_CURSOR_DEFAULT),
    }

    {
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);
        blit(world, &mut d, &target, shaders.as_mut());
        render_debug_ui(world, &mut d);
    }

    if let Some(shaders) = shaders {
        world.insert_non_send_resource(shaders);
    }
    world.insert_non_send_resource(target);
    world.insert_non_send_resource(thread);
    world.insert_non_send_resource(rl);
}
