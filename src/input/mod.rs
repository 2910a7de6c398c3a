use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

pub mod benchmark;
pub mod manifest;

pub const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff", "webp"];

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// A dataset loaded for scoring: the image files found under `root`, sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCollection {
    pub name: String,
    pub root: PathBuf,
    pub images: Vec<PathBuf>,
}

impl ImageCollection {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Where evaluation datasets come from. Generated sets are addressed by folder,
/// reference sets by key.
pub trait DatasetSource {
    fn open_folder(&self, path: &Path) -> Result<ImageCollection, InputError>;
    fn open_reference(&self, key: &str) -> Result<ImageCollection, InputError>;
}

#[derive(Debug, Clone)]
pub struct FsDatasetSource {
    reference_root: PathBuf,
}

impl FsDatasetSource {
    pub fn new(reference_root: impl Into<PathBuf>) -> Self {
        Self {
            reference_root: reference_root.into(),
        }
    }
}

impl DatasetSource for FsDatasetSource {
    fn open_folder(&self, path: &Path) -> Result<ImageCollection, InputError> {
        let images = list_images(path)?;
        Ok(ImageCollection {
            name: path.display().to_string(),
            root: path.to_path_buf(),
            images,
        })
    }

    fn open_reference(&self, key: &str) -> Result<ImageCollection, InputError> {
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err(InputError::InvalidInput(format!(
                "reference key {key:?} is not a plain name"
            )));
        }
        let root = self.reference_root.join(key);
        let images = list_images(&root)?;
        Ok(ImageCollection {
            name: key.to_string(),
            root,
            images,
        })
    }
}

/// Recursively collects image files under `root`, sorted by path.
pub fn list_images(root: &Path) -> Result<Vec<PathBuf>, InputError> {
    if !root.is_dir() {
        return Err(InputError::MissingInput(format!(
            "dataset directory {} not found",
            root.display()
        )));
    }
    let mut images = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && is_image_path(entry.path()) {
            images.push(entry.into_path());
        }
    }
    images.sort();
    Ok(images)
}

pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
