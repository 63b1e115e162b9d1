//! OAuth2 client-credentials token acquisition.
//!
//! ## Security
//!
//! Access tokens and the client secret are never logged.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;

use crate::config::{ClientCredentials, GraphConfig};
use crate::error::{DirectoryError, DirectoryResult};

/// Tokens are refreshed this long before the server-reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Successful token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Token endpoint error response (RFC 6749 section 5.2).
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

/// Acquires and caches application access tokens.
pub struct TokenProvider {
    http: reqwest::Client,
    token_url: String,
    scope: String,
    credentials: ClientCredentials,
    cached: Mutex<Option<CachedToken>>,
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("token_url", &self.token_url)
            .field("scope", &self.scope)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl TokenProvider {
    /// Creates a token provider for the configured tenant.
    #[must_use]
    pub fn new(http: reqwest::Client, config: &GraphConfig) -> Self {
        Self {
            http,
            token_url: config.token_url(),
            scope: config.scope.clone(),
            credentials: config.credentials.clone(),
            cached: Mutex::new(None),
        }
    }

    /// Returns a valid access token, requesting a new one when the cached
    /// token is missing or about to expire.
    ///
    /// ## Errors
    ///
    /// Returns `DirectoryError::Authentication` if the token endpoint is
    /// unreachable or rejects the credentials.
    pub async fn access_token(&self) -> DirectoryResult<String> {
        let mut guard = self.cached.lock().await;
        if let Some(token) = guard.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.request_token().await?;
        let access_token = token.access_token.clone();
        *guard = Some(token);
        Ok(access_token)
    }

    /// Drops the cached token so the next call requests a fresh one.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    async fn request_token(&self) -> DirectoryResult<CachedToken> {
        tracing::debug!(token_url = %self.token_url, "Requesting access token");

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("scope", self.scope.as_str()),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| DirectoryError::auth(format!("token endpoint unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) => match err.error_description {
                    Some(description) => format!("{}: {}", err.error, description),
                    None => err.error,
                },
                Err(_) => format!("token endpoint returned {}", status.as_u16()),
            };
            return Err(DirectoryError::auth(reason));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| DirectoryError::auth(format!("invalid token response: {e}")))?;

        if let Some(token_type) = &token.token_type {
            if !token_type.eq_ignore_ascii_case("bearer") {
                return Err(DirectoryError::auth(format!(
                    "unsupported token type: {token_type}"
                )));
            }
        }

        let lifetime = Duration::from_secs(token.expires_in.unwrap_or(3600));
        tracing::debug!(expires_in = lifetime.as_secs(), "Access token acquired");

        Ok(CachedToken {
            access_token: token.access_token,
            refresh_at: Instant::now() + lifetime.saturating_sub(EXPIRY_MARGIN),
        })
    }
}
