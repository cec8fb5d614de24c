mod atlas;
mod atomic_io;
mod keys;
mod manifest;
mod registry;

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::app::{Graphics, Rect};

pub use atlas::Atlas;
pub use atomic_io::write_text_atomic;
pub use keys::AssetIdError;
pub use manifest::{AssetManifest, SoundEntry, ASSET_MANIFEST_FILE};
pub use registry::AtlasAssets;

/// Drawable handle: a sub-rectangle of the texture atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Image {
    id: u32,
    source: Rect,
}

impl Image {
    pub fn new(id: u32, source: Rect) -> Self {
        Self { id, source }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn source(&self) -> Rect {
        self.source
    }

    pub fn size(&self) -> (i32, i32) {
        (self.source.w, self.source.h)
    }

    /// `x`, `y` are screen coordinates; the camera offset is already applied.
    pub fn draw_at(&self, graphics: &mut dyn Graphics, x: i32, y: i32) {
        graphics.draw_image(*self, x, y);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sound {
    id: u32,
    length: Duration,
}

impl Sound {
    pub fn new(id: u32, length: Duration) -> Self {
        Self { id, length }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn length(&self) -> Duration {
        self.length
    }
}

/// Resolves string ids into typed handles once, at startup. Loading the same id
/// twice yields the same handle.
pub trait AssetLoader {
    fn load_image(&mut self, id: &str) -> Result<Image, AssetError>;
    fn load_sound(&mut self, id: &str) -> Result<Sound, AssetError>;
    fn load_rectangle(&mut self, id: &str) -> Result<Rect, AssetError>;
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read asset manifest {path}: {source}")]
    ReadManifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse asset manifest {path}: {source}")]
    ParseManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid asset id {id:?}: {source}")]
    InvalidId {
        id: String,
        #[source]
        source: AssetIdError,
    },
    #[error("failed to decode texture atlas {path}: {source}")]
    DecodeAtlas {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("image {id:?} rectangle {rect:?} lies outside the {atlas_width}x{atlas_height} atlas")]
    ImageOutsideAtlas {
        id: String,
        rect: Rect,
        atlas_width: u32,
        atlas_height: u32,
    },
    #[error("unknown image resource: {0}")]
    UnknownImage(String),
    #[error("unknown sound resource: {0}")]
    UnknownSound(String),
    #[error("unknown rectangle resource: {0}")]
    UnknownRectangle(String),
}
