use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::credentials::domain::token_provider::{CredentialError, TokenProvider};
use crate::shared::constants::{GOOGLE_TOKEN_URI, TOKEN_EXPIRY_MARGIN_SECS, TOKEN_LIFETIME_SECS};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// The fields of a Google service-account key file that token minting needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self, CredentialError> {
        let json = fs::read_to_string(path).map_err(|e| CredentialError::KeyFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| CredentialError::KeyParse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    TOKEN_LIFETIME_SECS
}

struct CachedToken {
    token: String,
    refresh_at: Instant,
}

/// Mints OAuth2 access tokens from a service-account key using the
/// JWT-bearer grant. Tokens are reused until shortly before they expire.
pub struct ServiceAccountTokenProvider {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    scope: String,
    token_uri: String,
    http: reqwest::blocking::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenProvider {
    pub fn new(key: ServiceAccountKey, scope: &str) -> Result<Self, CredentialError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(CredentialError::InvalidKey)?;
        let token_uri = key
            .token_uri
            .clone()
            .unwrap_or_else(|| GOOGLE_TOKEN_URI.to_string());
        Ok(Self {
            key,
            encoding_key,
            scope: scope.to_string(),
            token_uri,
            http: reqwest::blocking::Client::new(),
            cached: Mutex::new(None),
        })
    }

    pub fn from_file(path: &Path, scope: &str) -> Result<Self, CredentialError> {
        let key = ServiceAccountKey::from_file(path)?;
        log::debug!("Loaded service account {}", key.client_email);
        Self::new(key, scope)
    }

    /// Point token requests somewhere other than the key file's `token_uri`.
    pub fn with_token_uri(mut self, token_uri: impl Into<String>) -> Self {
        self.token_uri = token_uri.into();
        self
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Signed RS256 assertion for the token endpoint, valid from `now_secs`.
    fn assertion(&self, now_secs: u64) -> Result<String, CredentialError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: &self.scope,
            aud: &self.token_uri,
            iat: now_secs,
            exp: now_secs + TOKEN_LIFETIME_SECS,
        };
        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(CredentialError::Sign)
    }

    fn fetch_token(&self) -> Result<CachedToken, CredentialError> {
        let now_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let assertion = self.assertion(now_secs)?;

        let response = self
            .http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .map_err(|e| CredentialError::Request {
                uri: self.token_uri.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CredentialError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response.json().map_err(|e| CredentialError::Request {
            uri: self.token_uri.clone(),
            source: e,
        })?;
        let lifetime = token.expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS);
        Ok(CachedToken {
            token: token.access_token,
            refresh_at: Instant::now() + Duration::from_secs(lifetime),
        })
    }
}

impl TokenProvider for ServiceAccountTokenProvider {
    fn access_token(&self) -> Result<String, CredentialError> {
        let mut cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(ref c) = *cached {
            if Instant::now() < c.refresh_at {
                return Ok(c.token.clone());
            }
        }
        log::debug!("Requesting access token for {}", self.key.client_email);
        let fresh = self.fetch_token()?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }
}
