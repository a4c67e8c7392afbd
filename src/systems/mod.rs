//! Engine systems.
//!
//! One module per frame-pipeline stage, plus the mounting helpers they share.
//!
//! Submodules overview
//! - [`animatedtile`] – advance water and other animated tiles, patch sprites
//! - [`animation`] – run character state machines and sync their sprites
//! - [`assets`] – background level loader and the system mounting its results
//! - [`input`] – read the pointer into [`crate::resources::pointer::PointerState`]
//! - [`pointer`] – hit testing and enter/leave/hover/click dispatch
//! - [`render`] – offscreen draw, cover blit and post-process
//! - [`scene`] – parallax offset and day/night value
//! - [`signalbus`] – drain the signal bus
//! - [`tilemap`] – mount/unmount a tilemap in the world
//! - [`time`] – advance [`crate::resources::worldtime::WorldTime`]

pub mod animatedtile;
pub mod animation;
pub mod assets;
pub mod input;
pub mod pointer;
pub mod render;
pub mod scene;
pub mod signalbus;
pub mod tilemap;
pub mod time;
