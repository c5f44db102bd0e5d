//! Alt-text resolution for post images.
//!
//! Every image embedded in a post carries alt text. It can come from three
//! independent sources, first non-empty wins:
//!
//! 1. **Explicit text** supplied by the caller (the orchestrator already
//!    knows what the image shows, e.g. "mapa de Itapevi, SP").
//! 2. **Sidecar file**: a `.txt` with the same stem as the image
//!    (`photo_1.txt` alongside `photo_1.png`). The user wrote it on
//!    purpose, so it beats anything derived mechanically.
//! 3. **Filename fallback**: the stem with dashes/underscores turned into
//!    spaces. Weak, but better than posting media with no description.

use std::path::Path;

/// Resolve the alt text for one image.
pub fn resolve(explicit: Option<&str>, image_path: &Path) -> String {
    let explicit = explicit.map(str::trim).filter(|s| !s.is_empty());
    explicit
        .map(String::from)
        .or_else(|| read_sidecar(image_path))
        .or_else(|| humanized_stem(image_path))
        .unwrap_or_else(|| "image".to_string())
}

/// Read a sidecar `.txt` file for an image.
///
/// Given `assets/photo_1.png`, looks for `assets/photo_1.txt` and returns
/// its trimmed contents. `None` if the file doesn't exist or is empty.
fn read_sidecar(image_path: &Path) -> Option<String> {
    let sidecar = image_path.with_extension("txt");
    std::fs::read_to_string(sidecar)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Filename stem with separators replaced by spaces: `city-map_12` →
/// `city map 12`.
fn humanized_stem(image_path: &Path) -> Option<String> {
    image_path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.replace(['-', '_'], " ").trim().to_string())
        .filter(|s| !s.is_empty())
}
