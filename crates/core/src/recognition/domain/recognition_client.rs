use thiserror::Error;

use super::recognition_config::{RecognitionAudio, RecognitionConfig};
use super::recognition_job::{JobStatus, RecognitionJob};
use super::transcript::RecognitionResult;
use crate::credentials::domain::token_provider::CredentialError;

#[derive(Error, Debug)]
pub enum RecognitionError {
    #[error("invalid speech API URL: {0}")]
    Url(String),
    #[error("speech API request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("speech API returned {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("unexpected speech API response: {0}")]
    Decode(String),
    #[error("operation {job} failed with code {code}: {message}")]
    Operation {
        job: String,
        code: i32,
        message: String,
    },
    #[error("operation {0} has not completed yet")]
    NotReady(String),
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// Domain interface for the remote long-running speech recognizer.
pub trait RecognitionClient: Send {
    fn submit(
        &self,
        config: &RecognitionConfig,
        audio: &RecognitionAudio,
    ) -> Result<RecognitionJob, RecognitionError>;

    fn poll(&self, job: &RecognitionJob) -> Result<JobStatus, RecognitionError>;

    /// Result of a completed job. Fails with `NotReady` if it is still running.
    fn fetch_result(&self, job: &RecognitionJob) -> Result<RecognitionResult, RecognitionError>;
}
