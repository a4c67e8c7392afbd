//! Garden Engine library.
//!
//! A small 2D scene engine: tile layers cut from a sprite sheet, animated
//! water, a pointer-driven parallax camera drawn through a fixed-size
//! offscreen surface, a deferred signal bus, per-entity animation state
//! machines and pointer hit testing. Built on bevy_ecs with raylib as the
//! rendering host; everything except the draw pass runs headless.

pub mod components;
pub mod engine;
pub mod events;
pub mod resources;
pub mod systems;
