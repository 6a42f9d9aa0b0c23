use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use reqwest::blocking::{Body, Client};
use reqwest::Url;

use crate::credentials::domain::token_provider::TokenProvider;
use crate::shared::constants::{STORAGE_BASE_URL, TARGET_CONTENT_TYPE};
use crate::storage::domain::blob_ref::{BlobNaming, RemoteBlobRef};
use crate::storage::domain::object_store::{ObjectStore, StorageError};

/// Google Cloud Storage adapter using the JSON API's simple media upload.
pub struct GcsObjectStore {
    http: Client,
    tokens: Arc<dyn TokenProvider>,
    bucket: String,
    base_url: String,
    naming: BlobNaming,
}

impl GcsObjectStore {
    pub fn new(tokens: Arc<dyn TokenProvider>, bucket: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            tokens,
            bucket: bucket.into(),
            base_url: STORAGE_BASE_URL.to_string(),
            naming: BlobNaming::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_naming(mut self, naming: BlobNaming) -> Self {
        self.naming = naming;
        self
    }

    fn url_with_segments(&self, segments: &[&str]) -> Result<Url, StorageError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| StorageError::Url(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| StorageError::Url(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn upload_url(&self, name: &str) -> Result<Url, StorageError> {
        let mut url =
            self.url_with_segments(&["upload", "storage", "v1", "b", &self.bucket, "o"])?;
        url.query_pairs_mut()
            .append_pair("uploadType", "media")
            .append_pair("name", name);
        Ok(url)
    }

    /// Object names may contain `/`; each is percent-encoded as one segment.
    fn object_url(&self, blob: &RemoteBlobRef) -> Result<Url, StorageError> {
        self.url_with_segments(&["storage", "v1", "b", blob.bucket(), "o", blob.name()])
    }

    fn check(
        blob: &RemoteBlobRef,
        response: reqwest::blocking::Response,
    ) -> Result<(), StorageError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(StorageError::Rejected {
            blob: blob.uri(),
            status: status.as_u16(),
            body: response.text().unwrap_or_default(),
        })
    }
}

impl ObjectStore for GcsObjectStore {
    fn put(&self, local_path: &Path) -> Result<RemoteBlobRef, StorageError> {
        let name = self
            .naming
            .object_name(local_path)
            .ok_or_else(|| StorageError::InvalidName(local_path.to_path_buf()))?;
        let blob = RemoteBlobRef::new(&self.bucket, name);

        let read_err = |e| StorageError::Read {
            path: local_path.to_path_buf(),
            source: e,
        };
        let file = File::open(local_path).map_err(read_err)?;
        let len = file.metadata().map_err(read_err)?.len();

        let url = self.upload_url(blob.name())?;
        let token = self.tokens.access_token()?;
        log::info!("Uploading {} ({len} bytes) to {blob}", local_path.display());

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, TARGET_CONTENT_TYPE)
            .body(Body::sized(file, len))
            .send()
            .map_err(|e| StorageError::Request {
                blob: blob.uri(),
                source: e,
            })?;
        Self::check(&blob, response)?;
        Ok(blob)
    }

    fn delete(&self, blob: &RemoteBlobRef) -> Result<(), StorageError> {
        let url = self.object_url(blob)?;
        let token = self.tokens.access_token()?;
        log::info!("Deleting {blob}");

        let response = self
            .http
            .delete(url)
            .bearer_auth(token)
            .send()
            .map_err(|e| StorageError::Request {
                blob: blob.uri(),
                source: e,
            })?;
        Self::check(blob, response)
    }
}
