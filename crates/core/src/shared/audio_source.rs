use std::path::{Path, PathBuf};

use super::constants::TARGET_EXTENSION;

/// A local audio file handed to the converter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioSource {
    path: PathBuf,
}

impl AudioSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Lowercased extension without the leading dot.
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }

    /// True unless the file already carries the recognizer's lossless codec.
    pub fn needs_transcode(&self) -> bool {
        self.extension().as_deref() != Some(TARGET_EXTENSION)
    }
}
