//! Scene lifecycle status.

use bevy_ecs::prelude::Resource;

/// The engine exists before any asset resolves. Informational: systems that
/// need level data are gated on a mounted [`Tilemap`](crate::resources::tilemap::Tilemap),
/// so a failed reload keeps the previous scene running.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub enum SceneStatus {
    #[default]
    Idle,
    Loading { path: String },
    Ready,
    Failed(String),
}

impl SceneStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, SceneStatus::Ready)
    }
}
