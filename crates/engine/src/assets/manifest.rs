use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::Rect;

use super::keys::validate_asset_id;
use super::AssetError;

pub const ASSET_MANIFEST_FILE: &str = "manifest.json";

/// Describes the asset directory: one texture atlas plus named image,
/// sound and rectangle resources.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AssetManifest {
    /// Atlas image file, relative to the manifest's directory.
    pub atlas: String,
    #[serde(default)]
    pub images: BTreeMap<String, Rect>,
    #[serde(default)]
    pub sounds: BTreeMap<String, SoundEntry>,
    #[serde(default)]
    pub rectangles: BTreeMap<String, Rect>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct SoundEntry {
    pub length_ms: u64,
}

impl AssetManifest {
    pub fn read(path: &Path) -> Result<Self, AssetError> {
        let raw = fs::read_to_string(path).map_err(|source| AssetError::ReadManifest {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = serde_json::from_str::<AssetManifest>(&raw).map_err(|source| {
            AssetError::ParseManifest {
                path: path.to_path_buf(),
                source,
            }
        })?;
        manifest.validate_ids()?;
        Ok(manifest)
    }

    fn validate_ids(&self) -> Result<(), AssetError> {
        let ids = self
            .images
            .keys()
            .chain(self.sounds.keys())
            .chain(self.rectangles.keys());
        for id in ids {
            validate_asset_id(id).map_err(|source| AssetError::InvalidId {
                id: id.clone(),
                source,
            })?;
        }
        Ok(())
    }
}
