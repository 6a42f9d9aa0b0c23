use std::path::{Path, PathBuf};

use thiserror::Error;

use super::blob_ref::RemoteBlobRef;
use crate::credentials::domain::token_provider::CredentialError;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("cannot derive an object name from {0}")]
    InvalidName(PathBuf),
    #[error("failed to open {path} for upload: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid storage URL: {0}")]
    Url(String),
    #[error("request for {blob} failed: {source}")]
    Request {
        blob: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("storage returned {status} for {blob}: {body}")]
    Rejected {
        blob: String,
        status: u16,
        body: String,
    },
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// Domain interface for a bucket-style staging area.
pub trait ObjectStore: Send {
    /// Upload a local file. The local file is left in place.
    fn put(&self, local_path: &Path) -> Result<RemoteBlobRef, StorageError>;

    fn delete(&self, blob: &RemoteBlobRef) -> Result<(), StorageError>;
}
