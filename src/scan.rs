//! Candidate discovery: expand CLI inputs into an ordered source list.
//!
//! Inputs can mix explicit files and directories. Directories are walked
//! recursively and image files collected in sorted order so batches are
//! deterministic. Explicit file arguments pass through untouched, even
//! nonexistent ones. Unreadable sources must reach the pipeline and
//! surface there as per-image drops; filtering them here would silently
//! change the batch the caller asked for.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions with decoders compiled into the codec.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

pub fn collect_sources(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut sources = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|path| has_image_extension(path))
                .collect();
            found.sort();
            sources.extend(found);
        } else {
            sources.push(input.clone());
        }
    }
    sources
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
