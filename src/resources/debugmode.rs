//! Debug toggle resource.
//!
//! When present, the render pass outlines every interactive hit box and
//! prints the pointer/camera readout.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct DebugMode;
