use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::credentials::domain::token_provider::CredentialError;
use crate::recognition::domain::recognition_client::RecognitionError;
use crate::recognition::domain::recognition_job::RecognitionJob;
use crate::storage::domain::object_store::StorageError;
use crate::transcoding::domain::transcoder::TranscodeError;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("{}: file not found.", .0.display())]
    InputNotFound(PathBuf),
    #[error(transparent)]
    Transcode(#[from] TranscodeError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Recognition(#[from] RecognitionError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The job may still finish remotely; only the local wait gave up.
    #[error("operation {job} not completed after waiting {}s", .waited.as_secs())]
    Timeout {
        job: RecognitionJob,
        waited: Duration,
    },
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}
