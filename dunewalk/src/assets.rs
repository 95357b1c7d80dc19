use std::collections::HashMap;
use std::path::Path;

use image::GenericImageView;

use crate::error::{DuneError, DuneResult};

/// Images the desert fort level expects to find in its asset directory.
pub const DESERT_FORT_IMAGES: &[&str] = &[
    "desert-block.png",
    "locked-desert-block.png",
    "ground-gunk.png",
    "desert-tile-1.png",
    "desert-tile-2.png",
    "desert-tile-3.png",
    "desert-tile-4.png",
    "fish-sheet.png",
    "bandit.png",
    "key.png",
    "cursor.png",
];

/// Size metadata for a loaded image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

/// Caches image metadata by key.
///
/// Loading happens entirely before a session starts; a failure here is fatal
/// for the caller and is never retried.
#[derive(Debug, Default)]
pub struct AssetCatalog {
    images: HashMap<String, ImageInfo>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read an image's dimensions from disk, caching by `key`.
    pub fn load_image(&mut self, key: &str, path: &Path) -> DuneResult<ImageInfo> {
        if let Some(info) = self.images.get(key) {
            log::debug!("asset cache hit for `{key}`");
            return Ok(*info);
        }

        let (width, height) = image::image_dimensions(path).map_err(|source| DuneError::AssetLoad {
            path: path.display().to_string(),
            source,
        })?;
        let info = ImageInfo { width, height };
        self.images.insert(key.to_string(), info);
        Ok(info)
    }

    /// Decode an in-memory image, caching by `key`.
    pub fn load_image_from_bytes(&mut self, key: &str, bytes: &[u8]) -> DuneResult<ImageInfo> {
        if let Some(info) = self.images.get(key) {
            return Ok(*info);
        }

        let image = image::load_from_memory(bytes).map_err(|source| DuneError::AssetLoad {
            path: key.to_string(),
            source,
        })?;
        let (width, height) = image.dimensions();
        let info = ImageInfo { width, height };
        self.images.insert(key.to_string(), info);
        Ok(info)
    }

    /// Load every named image from `dir`, stopping at the first failure.
    pub fn load_all(&mut self, dir: &Path, names: &[&str]) -> DuneResult<()> {
        for name in names {
            self.load_image(name, &dir.join(name))?;
        }
        log::info!("loaded {} images from {}", names.len(), dir.display());
        Ok(())
    }

    /// Record metadata obtained elsewhere, e.g. from a packed atlas manifest.
    pub fn insert(&mut self, key: impl Into<String>, info: ImageInfo) {
        self.images.insert(key.into(), info);
    }

    pub fn get(&self, key: &str) -> Option<ImageInfo> {
        self.images.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::png::PngEncoder;
    use image::{ColorType, ImageEncoder};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let pixels = vec![255u8; (width * height * 4) as usize];
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(&pixels, width, height, ColorType::Rgba8)
            .expect("encode png");
        out
    }

    #[test]
    fn bytes_are_decoded_and_cached() {
        let mut assets = AssetCatalog::new();
        let info = assets
            .load_image_from_bytes("fish-sheet.png", &png_bytes(216, 24))
            .expect("valid png");
        assert_eq!(info, ImageInfo { width: 216, height: 24 });

        // Cached: garbage bytes under the same key are not decoded again.
        let again = assets
            .load_image_from_bytes("fish-sheet.png", b"not a png")
            .expect("cached");
        assert_eq!(again, info);
        assert_eq!(assets.len(), 1);
    }

    #[test]
    fn undecodable_bytes_are_an_asset_error() {
        let mut assets = AssetCatalog::new();
        let err = assets
            .load_image_from_bytes("key.png", b"not a png")
            .expect_err("should fail");
        assert!(matches!(err, DuneError::AssetLoad { ref path, .. } if path == "key.png"));
    }

    #[test]
    fn missing_directory_fails_fast() {
        let mut assets = AssetCatalog::new();
        let err = assets
            .load_all(Path::new("/no/such/assets"), DESERT_FORT_IMAGES)
            .expect_err("missing files");
        assert!(err.to_string().contains("desert-block.png"));
        assert!(assets.is_empty());
    }

    #[test]
    fn files_on_disk_are_measured() {
        let dir = std::env::temp_dir().join(format!("dunewalk_assets_{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        std::fs::write(dir.join("key.png"), png_bytes(16, 8)).expect("write png");

        let mut assets = AssetCatalog::new();
        assets.load_all(&dir, &["key.png"]).expect("load");
        assert_eq!(assets.get("key.png"), Some(ImageInfo { width: 16, height: 8 }));
        let _ = std::fs::remove_dir_all(dir);
    }
}
