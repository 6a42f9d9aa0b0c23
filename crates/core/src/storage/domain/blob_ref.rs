use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const GS_SCHEME: &str = "gs://";

/// How uploaded objects are named inside the bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlobNaming {
    /// The local file's base name, as is. Two uploads of `talk.flac`
    /// overwrite each other.
    BaseName,
    /// Base name prefixed with a random UUID.
    #[default]
    Unique,
}

impl BlobNaming {
    /// Derive the object name for a local file, or `None` if the path has
    /// no usable file name.
    pub fn object_name(self, local_path: &Path) -> Option<String> {
        let base = local_path.file_name()?.to_str()?;
        match self {
            BlobNaming::BaseName => Some(base.to_string()),
            BlobNaming::Unique => Some(format!("{}-{base}", Uuid::new_v4().simple())),
        }
    }
}

/// Reference to an object in a remote bucket, rendered as `gs://bucket/name`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RemoteBlobRef {
    bucket: String,
    name: String,
}

impl RemoteBlobRef {
    pub fn new(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            name: name.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uri(&self) -> String {
        format!("{GS_SCHEME}{}/{}", self.bucket, self.name)
    }
}

impl fmt::Display for RemoteBlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{GS_SCHEME}{}/{}", self.bucket, self.name)
    }
}
