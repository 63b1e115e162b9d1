//! Microsoft Graph client configuration.
//!
//! ## Security Requirements
//!
//! - Graph and authority URLs MUST use `https://`. Plain `http://` is only
//!   accepted for loopback hosts so tests can run against a local mock.
//! - The client secret is never serialized and is redacted from `Debug`.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::{DirectoryError, DirectoryResult};
use crate::retry::RetryPolicy;

/// Default Microsoft Graph API root.
pub const DEFAULT_GRAPH_URL: &str = "https://graph.microsoft.com/v1.0";

/// Default Microsoft identity platform authority.
pub const DEFAULT_AUTHORITY_URL: &str = "https://login.microsoftonline.com";

/// Default OAuth2 scope for application permissions on Graph.
pub const DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

// ============================================================================
// Client Credentials
// ============================================================================

/// OAuth2 client-credentials for an application registration.
#[derive(Clone)]
pub struct ClientCredentials {
    /// Directory (tenant) ID.
    pub tenant_id: String,
    /// Application (client) ID.
    pub client_id: String,
    /// Client secret.
    pub client_secret: String,
}

impl ClientCredentials {
    /// Creates a credential set, rejecting blank fields.
    ///
    /// ## Errors
    ///
    /// Returns `DirectoryError::MissingCredential` naming the first blank field.
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> DirectoryResult<Self> {
        let credentials = Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    fn validate(&self) -> DirectoryResult<()> {
        if self.tenant_id.trim().is_empty() {
            return Err(DirectoryError::MissingCredential("tenant_id"));
        }
        if self.client_id.trim().is_empty() {
            return Err(DirectoryError::MissingCredential("client_id"));
        }
        if self.client_secret.is_empty() {
            return Err(DirectoryError::MissingCredential("client_secret"));
        }
        Ok(())
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Graph Configuration
// ============================================================================

/// Configuration for [`GraphDirectory`](crate::GraphDirectory).
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Graph API root, without trailing slash.
    pub graph_url: String,

    /// Identity platform authority, without trailing slash.
    pub authority_url: String,

    /// OAuth2 scope requested with the client-credentials grant.
    pub scope: String,

    /// Application credentials.
    pub credentials: ClientCredentials,

    /// Timeout applied to every HTTP request.
    pub request_timeout: Duration,

    /// Retry policy for transient Graph failures.
    pub retry: RetryPolicy,
}

impl GraphConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> GraphConfigBuilder {
        GraphConfigBuilder::new()
    }

    /// Returns the OAuth2 token endpoint for the configured tenant.
    #[must_use]
    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_url,
            urlencoding::encode(&self.credentials.tenant_id)
        )
    }

    /// Validates the configuration.
    ///
    /// ## Errors
    ///
    /// Returns an error if a URL is malformed or insecure, the scope is
    /// empty, or a credential is missing.
    pub fn validate(&self) -> DirectoryResult<()> {
        validate_endpoint("graph_url", &self.graph_url)?;
        validate_endpoint("authority_url", &self.authority_url)?;

        if self.scope.trim().is_empty() {
            return Err(DirectoryError::config("scope cannot be empty"));
        }
        if self.request_timeout.is_zero() {
            return Err(DirectoryError::config("request_timeout must be positive"));
        }

        self.credentials.validate()
    }
}

/// Checks that an endpoint parses and uses HTTPS (or HTTP on loopback).
fn validate_endpoint(name: &str, value: &str) -> DirectoryResult<()> {
    let url = Url::parse(value)
        .map_err(|e| DirectoryError::config(format!("{name} is not a valid URL: {e}")))?;

    match url.scheme() {
        "https" => Ok(()),
        "http" if is_loopback(&url) => Ok(()),
        other => Err(DirectoryError::config(format!(
            "{name} must use https (got {other}://)"
        ))),
    }
}

fn is_loopback(url: &Url) -> bool {
    matches!(
        url.host_str(),
        Some("localhost" | "127.0.0.1" | "[::1]")
    )
}

// ============================================================================
// Configuration Builder
// ============================================================================

/// Builder for Graph configuration.
#[derive(Debug, Default)]
pub struct GraphConfigBuilder {
    graph_url: Option<String>,
    authority_url: Option<String>,
    scope: Option<String>,
    tenant_id: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    request_timeout: Option<Duration>,
    retry: RetryPolicy,
}

impl GraphConfigBuilder {
    /// Creates a new builder with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Graph API root.
    #[must_use]
    pub fn graph_url(mut self, url: impl Into<String>) -> Self {
        self.graph_url = Some(url.into());
        self
    }

    /// Sets the identity platform authority.
    #[must_use]
    pub fn authority_url(mut self, url: impl Into<String>) -> Self {
        self.authority_url = Some(url.into());
        self
    }

    /// Sets the OAuth2 scope.
    #[must_use]
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Sets the tenant ID.
    #[must_use]
    pub fn tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Sets the client ID.
    #[must_use]
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the client secret.
    #[must_use]
    pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub const fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - A credential is missing
    /// - A URL is malformed or not HTTPS
    pub fn build(self) -> DirectoryResult<GraphConfig> {
        let credentials = ClientCredentials::new(
            self.tenant_id
                .ok_or(DirectoryError::MissingCredential("tenant_id"))?,
            self.client_id
                .ok_or(DirectoryError::MissingCredential("client_id"))?,
            self.client_secret
                .ok_or(DirectoryError::MissingCredential("client_secret"))?,
        )?;

        let config = GraphConfig {
            graph_url: trim_url(self.graph_url.as_deref().unwrap_or(DEFAULT_GRAPH_URL)),
            authority_url: trim_url(
                self.authority_url
                    .as_deref()
                    .unwrap_or(DEFAULT_AUTHORITY_URL),
            ),
            scope: self.scope.unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            credentials,
            request_timeout: self.request_timeout.unwrap_or(Duration::from_secs(30)),
            retry: self.retry,
        };

        config.validate()?;

        Ok(config)
    }
}

fn trim_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
