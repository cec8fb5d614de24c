use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use tracing::info;

use crate::app::Rect;

use super::atlas::Atlas;
use super::manifest::{AssetManifest, ASSET_MANIFEST_FILE};
use super::{AssetError, AssetLoader, Image, Sound};

/// Asset loader backed by `manifest.json` and a single decoded atlas.
#[derive(Debug)]
pub struct AtlasAssets {
    manifest: AssetManifest,
    atlas: Atlas,
    images: HashMap<String, Image>,
    sounds: HashMap<String, Sound>,
}

impl AtlasAssets {
    pub fn open(assets_dir: &Path) -> Result<Self, AssetError> {
        let manifest = AssetManifest::read(&assets_dir.join(ASSET_MANIFEST_FILE))?;
        let atlas = Atlas::load(&assets_dir.join(&manifest.atlas))?;
        info!(
            assets_dir = %assets_dir.display(),
            atlas_width = atlas.width(),
            atlas_height = atlas.height(),
            image_count = manifest.images.len(),
            sound_count = manifest.sounds.len(),
            rectangle_count = manifest.rectangles.len(),
            "asset_manifest_loaded"
        );
        Self::from_parts(manifest, atlas)
    }

    pub fn from_parts(manifest: AssetManifest, atlas: Atlas) -> Result<Self, AssetError> {
        for (id, rect) in &manifest.images {
            if !atlas.contains(rect) {
                return Err(AssetError::ImageOutsideAtlas {
                    id: id.clone(),
                    rect: *rect,
                    atlas_width: atlas.width(),
                    atlas_height: atlas.height(),
                });
            }
        }
        Ok(Self {
            manifest,
            atlas,
            images: HashMap::new(),
            sounds: HashMap::new(),
        })
    }

    pub fn loaded_image_count(&self) -> usize {
        self.images.len()
    }

    pub fn into_atlas(self) -> Atlas {
        self.atlas
    }
}

impl AssetLoader for AtlasAssets {
    fn load_image(&mut self, id: &str) -> Result<Image, AssetError> {
        if let Some(image) = self.images.get(id) {
            return Ok(*image);
        }
        let source = self
            .manifest
            .images
            .get(id)
            .copied()
            .ok_or_else(|| AssetError::UnknownImage(id.to_string()))?;
        let image = Image::new(self.images.len() as u32, source);
        self.images.insert(id.to_string(), image);
        Ok(image)
    }

    fn load_sound(&mut self, id: &str) -> Result<Sound, AssetError> {
        if let Some(sound) = self.sounds.get(id) {
            return Ok(*sound);
        }
        let entry = self
            .manifest
            .sounds
            .get(id)
            .copied()
            .ok_or_else(|| AssetError::UnknownSound(id.to_string()))?;
        let sound = Sound::new(
            self.sounds.len() as u32,
            Duration::from_millis(entry.length_ms),
        );
        self.sounds.insert(id.to_string(), sound);
        Ok(sound)
    }

    fn load_rectangle(&mut self, id: &str) -> Result<Rect, AssetError> {
        self.manifest
            .rectangles
            .get(id)
            .copied()
            .ok_or_else(|| AssetError::UnknownRectangle(id.to_string()))
    }
}
