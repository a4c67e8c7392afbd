//! Messages exchanged with the asset loader thread.

use std::path::PathBuf;

use crate::resources::level::LoadedLevel;

/// Commands sent *to* the asset thread.
#[derive(Debug, Clone)]
pub enum AssetCmd {
    LoadLevel { path: PathBuf },
    Shutdown,
}

/// Replies sent *back* from the asset thread.
#[derive(Debug)]
pub enum AssetMessage {
    LevelLoaded(Box<LoadedLevel>),
    LevelFailed { path: PathBuf, error: String },
}
