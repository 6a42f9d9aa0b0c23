use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("failed to read key file {path}: {source}")]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid service account key in {path}: {source}")]
    KeyParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid private key: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),
    #[error("failed to sign token request: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),
    #[error("token request to {uri} failed: {source}")]
    Request {
        uri: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("token endpoint returned {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("no credentials configured (set a key file or an access token)")]
    Missing,
}

/// Domain interface for obtaining OAuth2 bearer tokens.
///
/// One provider is built per process and shared by every adapter that
/// talks to the cloud APIs.
pub trait TokenProvider: Send + Sync {
    fn access_token(&self) -> Result<String, CredentialError>;
}
