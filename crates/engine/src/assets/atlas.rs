use std::path::Path;

use image::ImageReader;

use crate::app::Rect;

use super::AssetError;

/// Decoded RGBA8 texture atlas every `Image` handle points into.
#[derive(Debug, Clone)]
pub struct Atlas {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Atlas {
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        debug_assert_eq!(rgba.len(), width as usize * height as usize * 4);
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let decode_error = |source| AssetError::DecodeAtlas {
            path: path.to_path_buf(),
            source,
        };
        let reader = ImageReader::open(path)
            .map_err(|error| decode_error(image::ImageError::IoError(error)))?;
        let decoded = reader.decode().map_err(decode_error)?;
        let image = decoded.to_rgba8();
        Ok(Self {
            width: image.width(),
            height: image.height(),
            rgba: image.into_raw(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    pub fn contains(&self, rect: &Rect) -> bool {
        rect.w > 0 && rect.h > 0 && rect.intersection(&self.bounds()) == Some(*rect)
    }

    /// RGBA of the texel at `(x, y)`; callers stay inside the atlas.
    pub fn texel(&self, x: i32, y: i32) -> [u8; 4] {
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.rgba[offset],
            self.rgba[offset + 1],
            self.rgba[offset + 2],
            self.rgba[offset + 3],
        ]
    }
}
