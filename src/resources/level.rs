//! Level description format and load errors.
//!
//! Levels are JSON documents:
//!
//! ```json
//! {
//!   "tileSize": 16,
//!   "mapWidth": 40,
//!   "mapHeight": 23,
//!   "spritesheet": { "source": "garden.png", "tileWidth": 16, "tileHeight": 16 },
//!   "layers": [
//!     { "name": "flowers", "tiles": [{ "id": "12", "x": 3, "y": 4, "scaleX": -1 }] },
//!     { "name": "ground", "collider": true, "tiles": [] }
//!   ]
//! }
//! ```
//!
//! `spritesheet` may also be a path (relative to the level file) to a JSON
//! file holding the same `{source, tileWidth, tileHeight}` object. Image
//! sources are resolved relative to the file that names them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::resources::spritesheet::SpriteSheet;

/// Fatal load errors: nothing is mounted when one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid level data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to decode sprite sheet image: {0}")]
    Image(#[from] image::ImageError),
    #[error("level has no layers")]
    MissingLayers,
    #[error("tileSize must be positive")]
    ZeroTileSize,
    #[error("invalid sprite sheet: {0}")]
    InvalidSpriteSheet(String),
    #[error("failed to upload texture: {0}")]
    Texture(String),
    #[error("failed to create render surface: {0}")]
    Surface(String),
    #[error("engine has been destroyed")]
    Disposed,
}

/// Per-tile failure; the tile is skipped and loading continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TileError {
    #[error("layer '{layer}': tile id '{id}' is not a base-10 integer")]
    NonNumericId { layer: String, id: String },
    #[error("layer '{layer}': tile id {id} is outside the sprite sheet ({len} tiles)")]
    OutOfBounds { layer: String, id: i64, len: usize },
}

/// Tile ids are strings in the format but plain numbers are accepted too.
///
/// Anything else (fractions, booleans, `null`) still parses, into `Other`, so
/// the tile is skipped on its own instead of failing the whole level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TileId {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl TileId {
    /// Resolve as a base-10 integer.
    pub fn resolve(&self) -> Option<i64> {
        match self {
            TileId::Number(n) => Some(*n),
            TileId::Text(s) => s.trim().parse::<i64>().ok(),
            TileId::Other(_) => None,
        }
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileId::Number(n) => write!(f, "{}", n),
            TileId::Text(s) => f.write_str(s),
            TileId::Other(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileDesc {
    pub id: TileId,
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_scale_x")]
    pub scale_x: f32,
}

fn default_scale_x() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDesc {
    pub name: String,
    #[serde(default)]
    pub collider: bool,
    #[serde(default)]
    pub tiles: Vec<TileDesc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteSheetDef {
    /// Image path.
    pub source: String,
    pub tile_width: u32,
    pub tile_height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpriteSheetRef {
    Path(String),
    Inline(SpriteSheetDef),
}

/// Override for an animated tile family, e.g. a level with its own water frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimatedFamilyDesc {
    pub family: String,
    pub frames: Vec<u32>,
    pub frame_duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDescription {
    /// When present, tile `x`/`y` are grid cells of this size; otherwise pixels.
    #[serde(default)]
    pub tile_size: Option<u32>,
    #[serde(default)]
    pub map_width: Option<u32>,
    #[serde(default)]
    pub map_height: Option<u32>,
    pub spritesheet: SpriteSheetRef,
    /// Optional so that a missing list is reported as [`LoadError::MissingLayers`].
    #[serde(default)]
    pub layers: Option<Vec<LayerDesc>>,
    #[serde(default)]
    pub animated_tiles: Vec<AnimatedFamilyDesc>,
}

impl LevelDescription {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let level: LevelDescription = serde_json::from_str(json)?;
        if level.layers.is_none() {
            return Err(LoadError::MissingLayers);
        }
        if level.tile_size == Some(0) {
            return Err(LoadError::ZeroTileSize);
        }
        Ok(level)
    }

    pub fn layers(&self) -> &[LayerDesc] {
        self.layers.as_deref().unwrap_or(&[])
    }

    /// Resolve the sprite sheet definition, reading it from disk when referenced by path.
    pub fn resolve_spritesheet(
        &self,
        base_dir: &Path,
    ) -> Result<(SpriteSheetDef, PathBuf), LoadError> {
        match &self.spritesheet {
            SpriteSheetRef::Inline(def) => Ok((def.clone(), base_dir.to_path_buf())),
            SpriteSheetRef::Path(path) => {
                let full = base_dir.join(path);
                let json = read_to_string(&full)?;
                let def: SpriteSheetDef = serde_json::from_str(&json)?;
                let dir = full
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| base_dir.to_path_buf());
                Ok((def, dir))
            }
        }
    }
}

/// A level with its sprite sheet resolved and sliced, ready to mount.
///
/// Building one touches only the filesystem and the image header, so it can
/// happen on the asset thread. Uploading the texture and spawning tiles is
/// left to the main thread.
#[derive(Debug, Clone)]
pub struct LoadedLevel {
    /// Level file, or the directory passed to [`LoadedLevel::parse`].
    pub source: PathBuf,
    pub level: LevelDescription,
    /// Key under which the sheet and its texture are stored.
    pub sheet_key: String,
    pub image_path: PathBuf,
    pub sheet: SpriteSheet,
}

impl LoadedLevel {
    /// Read and resolve a level file. Relative paths inside it are relative
    /// to the file's directory.
    pub fn read(path: &Path) -> Result<Self, LoadError> {
        let json = read_to_string(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut loaded = Self::parse(&json, base_dir)?;
        loaded.source = path.to_path_buf();
        Ok(loaded)
    }

    /// Resolve level JSON whose relative paths start at `base_dir`.
    pub fn parse(json: &str, base_dir: &Path) -> Result<Self, LoadError> {
        let level = LevelDescription::from_json(json)?;
        let (def, sheet_dir) = level.resolve_spritesheet(base_dir)?;
        let image_path = sheet_dir.join(&def.source);
        let sheet = SpriteSheet::from_image_file(&image_path, def.tile_width, def.tile_height)?;
        Ok(Self {
            source: base_dir.to_path_buf(),
            level,
            sheet_key: image_path.to_string_lossy().into_owned(),
            image_path,
            sheet,
        })
    }
}

pub(crate) fn read_to_string(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
