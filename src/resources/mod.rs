//! ECS resources made available to systems.
//!
//! Overview
//! - `assets` – bridge and channels for the background asset thread
//! - `daynight` – day/night cycle value for the post-process stage
//! - `debugmode` – presence enables hit-box outlines and the debug readout
//! - `engineconfig` – INI-backed engine settings
//! - `level` – level description format, load errors, resolved levels
//! - `parallax` – pointer-driven camera offset
//! - `pointer` – pointer input/state and hovered-set bookkeeping
//! - `postprocessshader` – selected post-process shader and its uniforms
//! - `rendertarget` – offscreen surface at the authored world size
//! - `scene` – scene lifecycle status
//! - `shaderstore` – loaded shaders (non-send)
//! - `signalbus` – deferred publish/subscribe bus
//! - `spritesheet` – sliced sprite sheets keyed by texture key
//! - `texturestore` – GPU textures keyed like sprite sheets (non-send)
//! - `tilemap` – tilemap construction and the mounted tilemap
//! - `viewport` – window/world sizes and the cover transform
//! - `worldtime` – simulation time and delta
pub mod assets;
pub mod daynight;
pub mod debugmode;
pub mod engineconfig;
pub mod level;
pub mod parallax;
pub mod pointer;
pub mod postprocessshader;
pub mod rendertarget;
pub mod scene;
pub mod shaderstore;
pub mod signalbus;
pub mod spritesheet;
pub mod texturestore;
pub mod tilemap;
pub mod viewport;
pub mod worldtime;
