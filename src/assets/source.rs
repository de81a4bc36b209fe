use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::error::{SeqError, SeqResult};

/// Side length of the checkerboard substituted for missing sources.
pub const PLACEHOLDER_SIZE: u32 = 8;

/// Supplier of externally sourced, immutable frames.
pub trait SourceProvider {
    /// Load the image identified by `id`.
    fn load(&self, id: &str) -> SeqResult<image::DynamicImage>;
}

/// Loads source frames from files below a root directory.
///
/// Ids are relative paths; they are normalized with [`normalize_rel_path`] before use.
#[derive(Clone, Debug)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Create a provider rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceProvider for DirectorySource {
    fn load(&self, id: &str) -> SeqResult<image::DynamicImage> {
        let rel = normalize_rel_path(id)?;
        let path = self.root.join(&rel);
        if !path.is_file() {
            return Err(SeqError::source(format!(
                "source frame '{}' not found",
                path.display()
            )));
        }
        let img = image::open(&path).with_context(|| format!("decode '{}'", path.display()))?;
        Ok(img)
    }
}

/// In-memory source frames keyed by id.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    images: HashMap<String, Arc<image::DynamicImage>>,
}

impl MemorySource {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an image.
    pub fn insert(&mut self, id: impl Into<String>, image: image::DynamicImage) {
        self.images.insert(id.into(), Arc::new(image));
    }

    /// Builder-style [`MemorySource::insert`].
    pub fn with(mut self, id: impl Into<String>, image: image::DynamicImage) -> Self {
        self.insert(id, image);
        self
    }

    /// Remove an image, returning whether it existed.
    pub fn remove(&mut self, id: &str) -> bool {
        self.images.remove(id).is_some()
    }
}

impl SourceProvider for MemorySource {
    fn load(&self, id: &str) -> SeqResult<image::DynamicImage> {
        self.images
            .get(id)
            .map(|img| img.as_ref().clone())
            .ok_or_else(|| SeqError::source(format!("source frame '{id}' not found")))
    }
}

/// Fixed magenta/black checkerboard substituted for sources that fail to load.
pub fn placeholder_image() -> image::Rgba32FImage {
    image::Rgba32FImage::from_fn(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, |x, y| {
        if (x / 2 + y / 2) % 2 == 0 {
            image::Rgba([1.0, 0.0, 1.0, 1.0])
        } else {
            image::Rgba([0.0, 0.0, 0.0, 1.0])
        }
    })
}

/// Normalize and validate root-relative source paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> SeqResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(SeqError::validation("source paths must be relative"));
    }
    if s.is_empty() {
        return Err(SeqError::validation("source path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(SeqError::validation("source paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(SeqError::validation("source path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
