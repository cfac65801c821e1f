//! Asset inventory: letter images and word/phrase animations indexed by label.
//!
//! A *label* is the upper-cased file stem of an asset: `a.png` → `"A"`,
//! `thank you.gif` → `"THANK YOU"`.  The inventory is built once at startup
//! and shared read-only (`Arc<AssetInventory>`) for the rest of the session.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// File extensions accepted as static letter images (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// File extensions accepted as word/phrase animations.
pub const ANIMATION_EXTENSIONS: &[&str] = &["gif"];

// ---------------------------------------------------------------------------
// ResourceLoadError
// ---------------------------------------------------------------------------

/// An asset directory could not be read.
#[derive(Debug, Error)]
#[error("cannot read asset directory {}: {source}", path.display())]
pub struct ResourceLoadError {
    /// Directory that failed to load.
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

// ---------------------------------------------------------------------------
// AssetInventory
// ---------------------------------------------------------------------------

/// Two label → path mappings: letter images and animations.
///
/// Both mappings iterate in label order, which keeps fuzzy-match tie-breaking
/// stable across runs.
#[derive(Debug, Clone, Default)]
pub struct AssetInventory {
    letters: BTreeMap<String, PathBuf>,
    animations: BTreeMap<String, PathBuf>,
}

impl AssetInventory {
    /// Scan `image_dir` for letter images and `gif_dir` for animations.
    ///
    /// Both directories are read non-recursively.  Files with any other
    /// extension are skipped.
    ///
    /// # Errors
    ///
    /// [`ResourceLoadError`] when either directory is missing or unreadable.
    pub fn build(
        image_dir: impl AsRef<Path>,
        gif_dir: impl AsRef<Path>,
    ) -> Result<Self, ResourceLoadError> {
        let letters = scan_dir(image_dir.as_ref(), IMAGE_EXTENSIONS)?;
        let animations = scan_dir(gif_dir.as_ref(), ANIMATION_EXTENSIONS)?;

        log::info!(
            "inventory: {} letter images, {} animations",
            letters.len(),
            animations.len()
        );

        Ok(Self {
            letters,
            animations,
        })
    }

    /// Build an inventory from already-labelled mappings.
    pub fn from_maps(
        letters: BTreeMap<String, PathBuf>,
        animations: BTreeMap<String, PathBuf>,
    ) -> Self {
        Self {
            letters,
            animations,
        }
    }

    /// Image path for a letter label, if one exists.
    pub fn letter(&self, label: &str) -> Option<&Path> {
        self.letters.get(label).map(PathBuf::as_path)
    }

    /// Animation path for a word/phrase label, if one exists.
    pub fn animation(&self, label: &str) -> Option<&Path> {
        self.animations.get(label).map(PathBuf::as_path)
    }

    pub fn letters(&self) -> &BTreeMap<String, PathBuf> {
        &self.letters
    }

    pub fn animations(&self) -> &BTreeMap<String, PathBuf> {
        &self.animations
    }

    /// `true` when neither mapping holds any asset.
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty() && self.animations.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Directory scanning
// ---------------------------------------------------------------------------

/// Derive the label for `path` if its extension is one of `extensions`.
///
/// ```
/// use std::path::Path;
/// use speech_to_sign::sign::inventory::{label_for, IMAGE_EXTENSIONS};
///
/// assert_eq!(label_for(Path::new("b.JPG"), IMAGE_EXTENSIONS).as_deref(), Some("B"));
/// assert_eq!(label_for(Path::new("readme.txt"), IMAGE_EXTENSIONS), None);
/// ```
pub fn label_for(path: &Path, extensions: &[&str]) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if !extensions.contains(&ext.as_str()) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    Some(stem.to_uppercase())
}

fn scan_dir(dir: &Path, extensions: &[&str]) -> Result<BTreeMap<String, PathBuf>, ResourceLoadError> {
    let load_err = |source| ResourceLoadError {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(load_err)? {
        let entry = entry.map_err(load_err)?;
        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut map = BTreeMap::new();
    for path in paths {
        let Some(label) = label_for(&path, extensions) else {
            log::trace!("inventory: skipping {}", path.display());
            continue;
        };
        if let Some(previous) = map.insert(label.clone(), path) {
            log::debug!(
                "inventory: label {label:?} defined twice, replacing {}",
                previous.display()
            );
        }
    }

    Ok(map)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").expect("write fixture");
    }

    #[test]
    fn build_indexes_by_uppercase_stem() {
        let images = tempdir().expect("temp dir");
        let gifs = tempdir().expect("temp dir");
        touch(images.path(), "A.png");
        touch(images.path(), "b.JPG");
        touch(images.path(), "readme.txt");
        touch(gifs.path(), "cat.gif");
        touch(gifs.path(), "readme.txt");

        let inv = AssetInventory::build(images.path(), gifs.path()).expect("build");

        let letters: Vec<&str> = inv.letters().keys().map(String::as_str).collect();
        let animations: Vec<&str> = inv.animations().keys().map(String::as_str).collect();
        assert_eq!(letters, vec!["A", "B"]);
        assert_eq!(animations, vec!["CAT"]);
        assert_eq!(inv.letter("B"), Some(images.path().join("b.JPG").as_path()));
    }

    #[test]
    fn gif_in_image_dir_is_not_a_letter() {
        let images = tempdir().expect("temp dir");
        let gifs = tempdir().expect("temp dir");
        touch(images.path(), "hello.gif");
        touch(gifs.path(), "x.png");

        let inv = AssetInventory::build(images.path(), gifs.path()).expect("build");
        assert!(inv.is_empty());
    }

    #[test]
    fn multi_word_labels_keep_spaces() {
        let images = tempdir().expect("temp dir");
        let gifs = tempdir().expect("temp dir");
        touch(gifs.path(), "thank you.gif");

        let inv = AssetInventory::build(images.path(), gifs.path()).expect("build");
        assert!(inv.animation("THANK YOU").is_some());
    }

    #[test]
    fn subdirectories_are_not_scanned() {
        let images = tempdir().expect("temp dir");
        let gifs = tempdir().expect("temp dir");
        std::fs::create_dir(images.path().join("nested.png")).expect("mkdir");
        std::fs::create_dir(images.path().join("deep")).expect("mkdir");
        touch(&images.path().join("deep"), "Z.png");

        let inv = AssetInventory::build(images.path(), gifs.path()).expect("build");
        assert!(inv.letters().is_empty());
    }

    #[test]
    fn missing_directory_is_a_resource_load_error() {
        let gifs = tempdir().expect("temp dir");
        let err = AssetInventory::build("/nonexistent/images", gifs.path()).unwrap_err();
        assert_eq!(err.path, PathBuf::from("/nonexistent/images"));
        assert!(err.to_string().contains("/nonexistent/images"));
    }

    #[test]
    fn duplicate_labels_keep_the_last_name_in_order() {
        let images = tempdir().expect("temp dir");
        let gifs = tempdir().expect("temp dir");
        touch(images.path(), "A.jpg");
        touch(images.path(), "a.png");

        let inv = AssetInventory::build(images.path(), gifs.path()).expect("build");
        assert_eq!(inv.letters().len(), 1);
        assert_eq!(inv.letter("A"), Some(images.path().join("a.png").as_path()));
    }

    #[test]
    fn lookups_tolerate_absence() {
        let inv = AssetInventory::default();
        assert!(inv.letter("A").is_none());
        assert!(inv.animation("HELLO").is_none());
    }

    #[test]
    fn label_for_handles_dotted_stems() {
        assert_eq!(
            label_for(Path::new("good.night.gif"), ANIMATION_EXTENSIONS).as_deref(),
            Some("GOOD.NIGHT")
        );
        assert_eq!(label_for(Path::new(".png"), IMAGE_EXTENSIONS), None);
        assert_eq!(label_for(Path::new("noext"), IMAGE_EXTENSIONS), None);
    }
}
