use crate::{AssetError, TextureAsset};
use std::path::Path;

/// Which kind of media a plane shows; decides the picker filter and decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Label for the file picker filter.
    pub fn filter_name(&self) -> &'static str {
        match self {
            MediaKind::Image => "Images",
            MediaKind::Video => "Animated images",
        }
    }

    /// File extensions offered by the picker.
    pub fn accept_extensions(&self) -> &'static [&'static str] {
        match self {
            MediaKind::Image => &["png", "jpg", "jpeg", "gif", "bmp", "webp"],
            MediaKind::Video => &["gif", "png", "apng", "webp"],
        }
    }

    /// Whether the path carries one of the accepted extensions.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .is_some_and(|e| self.accept_extensions().contains(&e.as_str()))
    }

    pub fn decode(&self, path: &Path) -> Result<TextureAsset, AssetError> {
        match self {
            MediaKind::Image => TextureAsset::decode_still(path),
            MediaKind::Video => TextureAsset::decode_animated(path),
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}
