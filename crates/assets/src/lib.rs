//! Texture assets: content-addressed registry, decoding and placeholders.
//!
//! Textures are identified by a hash of their pixels. The scene and the
//! renderer refer to textures by [`TextureId`], never by file path.
//!
//! Loading through [`TextureSource`] never fails: a texture that cannot be
//! read is replaced by a checkerboard placeholder and a warning is logged.

mod media;
mod texture;

pub use media::MediaKind;
pub use texture::{AnimatedFrame, Animation, DEFAULT_FRAME_DELAY, MAX_TEXTURE_SIZE, TextureAsset};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

/// Content-addressed texture handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureId(pub u64);

impl std::fmt::Display for TextureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Errors from texture loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("animation has no frames")]
    Empty,
    #[error("frame {index} is {got:?}, expected {expected:?}")]
    FrameSize {
        index: usize,
        expected: (u32, u32),
        got: (u32, u32),
    },
    #[error("texture not found: {0}")]
    NotFound(TextureId),
}

/// Anything that can turn a path into a texture handle.
///
/// Implementations must always return a usable handle; load failures are
/// handled (and reported) by the source itself.
pub trait TextureSource {
    /// Load a still image.
    fn load_texture(&mut self, path: &Path) -> TextureId;
    /// Load a looping, silent moving texture.
    fn load_video(&mut self, path: &Path) -> TextureId;
}

/// Content-addressed texture registry.
#[derive(Debug, Clone, Default)]
pub struct TextureStore {
    textures: BTreeMap<TextureId, TextureAsset>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register decoded pixels and return their id. Identical pixels share an id.
    pub fn insert(&mut self, asset: TextureAsset) -> TextureId {
        let id = content_hash(&asset);
        self.textures.entry(id).or_insert(asset);
        id
    }

    pub fn get(&self, id: TextureId) -> Option<&TextureAsset> {
        self.textures.get(&id)
    }

    /// Drop a texture nothing refers to any more.
    pub fn remove(&mut self, id: TextureId) -> Option<TextureAsset> {
        let removed = self.textures.remove(&id);
        if removed.is_some() {
            tracing::debug!("released texture {id}");
        }
        removed
    }

    /// Keep only the textures for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(TextureId) -> bool) {
        self.textures.retain(|id, _| keep(*id));
    }

    pub fn require(&self, id: TextureId) -> Result<&TextureAsset, AssetError> {
        self.get(id).ok_or(AssetError::NotFound(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (TextureId, &TextureAsset)> {
        self.textures.iter().map(|(id, asset)| (*id, asset))
    }

    /// Number of registered textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Decode and register a still image.
    pub fn load_still(&mut self, path: impl AsRef<Path>) -> Result<TextureId, AssetError> {
        let asset = TextureAsset::decode_still(path.as_ref())?;
        Ok(self.insert(asset))
    }

    /// Decode and register an animated image.
    pub fn load_animated(&mut self, path: impl AsRef<Path>) -> Result<TextureId, AssetError> {
        let asset = TextureAsset::decode_animated(path.as_ref())?;
        Ok(self.insert(asset))
    }

    /// Register a checkerboard whose colours are derived from `label`, so
    /// different missing textures stay distinguishable.
    pub fn placeholder(&mut self, label: &str) -> TextureId {
        let digest = Sha256::digest(label.as_bytes());
        let a = [digest[0], digest[1], digest[2], 255];
        let b = [digest[0] / 3, digest[1] / 3, digest[2] / 3, 255];
        self.insert(TextureAsset::checkerboard(64, 8, a, b))
    }

    fn load_or_placeholder(&mut self, path: &Path, animated: bool) -> TextureId {
        let loaded = if animated {
            self.load_animated(path)
        } else {
            self.load_still(path)
        };
        match loaded {
            Ok(id) => {
                tracing::debug!("loaded texture {id} from {}", path.display());
                id
            }
            Err(e) => {
                tracing::warn!("failed to load {}: {e}; using placeholder", path.display());
                self.placeholder(&path.to_string_lossy())
            }
        }
    }
}

impl TextureSource for TextureStore {
    fn load_texture(&mut self, path: &Path) -> TextureId {
        self.load_or_placeholder(path, false)
    }

    fn load_video(&mut self, path: &Path) -> TextureId {
        self.load_or_placeholder(path, true)
    }
}

fn content_hash(asset: &TextureAsset) -> TextureId {
    let mut hasher = Sha256::new();
    let (w, h) = asset.dimensions();
    hasher.update(w.to_le_bytes());
    hasher.update(h.to_le_bytes());
    match asset {
        TextureAsset::Still(image) => hasher.update(image.as_raw()),
        TextureAsset::Animated(animation) => {
            for frame in animation.frames() {
                hasher.update((frame.delay.as_millis() as u64).to_le_bytes());
                hasher.update(frame.image.as_raw());
            }
        }
    }
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[..8]);
    TextureId(u64::from_le_bytes(bytes))
}

pub fn crate_info() -> &'static str {
    "walkroom-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn solid(c: [u8; 4]) -> TextureAsset {
        TextureAsset::Still(RgbaImage::from_pixel(4, 4, Rgba(c)))
    }

    #[test]
    fn insert_and_get() {
        let mut store = TextureStore::new();
        let id = store.insert(solid([1, 2, 3, 255]));
        assert!(store.get(id).is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn content_addressed_dedup() {
        let mut store = TextureStore::new();
        let a = store.insert(solid([9, 9, 9, 255]));
        let b = store.insert(solid([9, 9, 9, 255]));
        let c = store.insert(solid([9, 9, 8, 255]));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn remove_and_retain_release_textures() {
        let mut store = TextureStore::new();
        let a = store.insert(solid([1, 1, 1, 255]));
        let b = store.insert(solid([2, 2, 2, 255]));
        let c = store.insert(solid([3, 3, 3, 255]));

        assert!(store.remove(a).is_some());
        assert!(store.remove(a).is_none());
        assert!(store.get(a).is_none());

        store.retain(|id| id == c);
        assert!(store.get(b).is_none());
        assert!(store.get(c).is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn require_reports_missing_id() {
        let store = TextureStore::new();
        assert!(matches!(
            store.require(TextureId(42)),
            Err(AssetError::NotFound(TextureId(42)))
        ));
    }

    #[test]
    fn missing_file_falls_back_to_placeholder() {
        let mut store = TextureStore::new();
        let id = store.load_texture(Path::new("/no/such/floor.jpg"));
        let asset = store.get(id).unwrap();
        assert_eq!(asset.dimensions(), (64, 64));

        let video = store.load_video(Path::new("/no/such/clip.gif"));
        assert_ne!(id, video, "placeholders differ per path");
    }

    #[test]
    fn placeholder_is_stable_per_label() {
        let mut store = TextureStore::new();
        assert_eq!(store.placeholder("wall"), store.placeholder("wall"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.png");
        RgbaImage::from_pixel(3, 2, Rgba([0, 128, 255, 255]))
            .save(&path)
            .unwrap();

        let mut store = TextureStore::new();
        let id = store.load_texture(&path);
        assert_eq!(store.get(id).unwrap().dimensions(), (3, 2));
    }
}
