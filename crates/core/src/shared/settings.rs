use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::{
    DEFAULT_BUCKET, DEFAULT_FFMPEG_PATH, DEFAULT_MIN_UPLOAD_BYTES, DEFAULT_POLL_INTERVAL_SECS,
    GOOGLE_SCOPE, SPEECH_BASE_URL, STORAGE_BASE_URL,
};
use crate::storage::domain::blob_ref::BlobNaming;

pub const ENV_KEY_FILE: &str = "GOOGLE_APPLICATION_CREDENTIALS";
pub const ENV_ACCESS_TOKEN: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";
pub const ENV_BUCKET: &str = "CONVERT2TEXT_BUCKET";
pub const ENV_FFMPEG: &str = "CONVERT2TEXT_FFMPEG";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Runtime configuration for the converter.
///
/// Resolution order, later wins:
/// 1. Built-in defaults
/// 2. `settings.json` in the user config directory (if present)
/// 3. Environment variables
/// 4. CLI flags (applied by the binary)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Service-account key file (JSON).
    pub key_file: Option<PathBuf>,
    /// Pre-minted bearer token; bypasses the key file when set.
    #[serde(skip)]
    pub access_token: Option<String>,
    pub scope: String,
    pub bucket: String,
    pub ffmpeg_path: PathBuf,
    pub poll_interval_secs: u64,
    pub min_upload_bytes: u64,
    pub blob_naming: BlobNaming,
    pub speech_base_url: String,
    pub storage_base_url: String,
    /// Overrides the key file's `token_uri`.
    pub token_uri: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            key_file: None,
            access_token: None,
            scope: GOOGLE_SCOPE.to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
            ffmpeg_path: PathBuf::from(DEFAULT_FFMPEG_PATH),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            min_upload_bytes: DEFAULT_MIN_UPLOAD_BYTES,
            blob_naming: BlobNaming::default(),
            speech_base_url: SPEECH_BASE_URL.to_string(),
            storage_base_url: STORAGE_BASE_URL.to_string(),
            token_uri: None,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("convert2text").join("settings.json"))
    }

    /// Load from the user config file and the process environment.
    pub fn load() -> Result<Self, SettingsError> {
        let mut settings = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|e| SettingsError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Override fields from environment variables. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get(ENV_KEY_FILE) {
            self.key_file = Some(PathBuf::from(v));
        }
        if let Some(v) = get(ENV_ACCESS_TOKEN) {
            self.access_token = Some(v);
        }
        if let Some(v) = get(ENV_BUCKET) {
            self.bucket = v;
        }
        if let Some(v) = get(ENV_FFMPEG) {
            self.ffmpeg_path = PathBuf::from(v);
        }
    }
}
