use crate::credentials::domain::token_provider::{CredentialError, TokenProvider};

/// Hands out a fixed bearer token (e.g. from `gcloud auth print-access-token`).
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl TokenProvider for StaticTokenProvider {
    fn access_token(&self) -> Result<String, CredentialError> {
        Ok(self.token.clone())
    }
}
