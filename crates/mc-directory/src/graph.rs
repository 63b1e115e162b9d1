//! Microsoft Graph directory client.
//!
//! Reads group membership and direct reports through the Graph v1.0 REST
//! API. Only the first page of each collection is read; when Graph signals
//! more pages via `@odata.nextLink` the truncation is logged.

use async_trait::async_trait;
use mc_model::{GroupId, Identity, MembershipSet};
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::auth::TokenProvider;
use crate::client::DirectoryClient;
use crate::config::GraphConfig;
use crate::error::{DirectoryError, DirectoryResult};

/// Properties requested for every directory object.
const SELECT: &str = "$select=id,mail,userPrincipalName";

// ============================================================================
// Response Mapping
// ============================================================================

/// One page of a Graph directory-object collection.
#[derive(Debug, Deserialize)]
struct DirectoryPage {
    #[serde(default)]
    value: Vec<DirectoryObject>,
    #[serde(rename = "@odata.nextLink", default)]
    next_link: Option<String>,
}

/// A directory object as returned by collection endpoints.
///
/// Group membership and direct reports may contain users, nested groups,
/// devices, org contacts or service principals. Only users are tracked.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "@odata.type")]
pub enum DirectoryObject {
    /// A user account.
    #[serde(rename = "#microsoft.graph.user")]
    User(GraphUser),

    /// Any other object type.
    #[serde(other)]
    Other,
}

/// The user properties we select.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphUser {
    /// Object ID.
    #[serde(default)]
    pub id: Option<String>,
    /// Primary SMTP address.
    #[serde(default)]
    pub mail: Option<String>,
    /// User principal name.
    #[serde(default)]
    pub user_principal_name: Option<String>,
}

impl DirectoryObject {
    /// Returns the user's mail address as an identity.
    ///
    /// Non-user objects and users without a mail address yield `None`.
    #[must_use]
    pub fn into_identity(self) -> Option<Identity> {
        match self {
            Self::User(user) => {
                let identity = user.mail.as_deref().and_then(|m| Identity::new(m).ok());
                if identity.is_none() {
                    tracing::debug!(
                        id = user.id.as_deref().unwrap_or("-"),
                        upn = user.user_principal_name.as_deref().unwrap_or("-"),
                        "Skipping user without mail address"
                    );
                }
                identity
            }
            Self::Other => None,
        }
    }
}

// ============================================================================
// Graph Directory
// ============================================================================

/// Directory client backed by Microsoft Graph.
#[derive(Debug)]
pub struct GraphDirectory {
    config: GraphConfig,
    http: reqwest::Client,
    tokens: TokenProvider,
}

impl GraphDirectory {
    /// Creates a Graph client.
    ///
    /// ## Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: GraphConfig) -> DirectoryResult<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let tokens = TokenProvider::new(http.clone(), &config);

        Ok(Self {
            config,
            http,
            tokens,
        })
    }

    /// Acquires an access token without querying the directory.
    ///
    /// Lets callers report credential problems before any traversal starts.
    ///
    /// ## Errors
    ///
    /// Returns `DirectoryError::Authentication` if no token can be obtained.
    pub async fn authenticate(&self) -> DirectoryResult<()> {
        self.tokens.access_token().await.map(|_| ())
    }

    /// Fetches the first page of a collection, retrying transient failures.
    async fn fetch_collection(&self, path: &str, subject: &str) -> DirectoryResult<Vec<Identity>> {
        let url = format!("{}{}?{}", self.config.graph_url, path, SELECT);
        let url = url.as_str();
        let page = self
            .config
            .retry
            .run(path, move || self.get_page(url, subject))
            .await?;

        if page.next_link.is_some() {
            tracing::warn!(
                subject = %subject,
                returned = page.value.len(),
                "Directory returned more results than one page; only the first page is used"
            );
        }

        Ok(page
            .value
            .into_iter()
            .filter_map(DirectoryObject::into_identity)
            .collect())
    }

    async fn get_page(&self, url: &str, subject: &str) -> DirectoryResult<DirectoryPage> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    DirectoryError::unavailable(e.to_string())
                } else {
                    DirectoryError::Http(e)
                }
            })?;

        let status = response.status();
        match status {
            s if s.is_success() => {
                let body = response.bytes().await?;
                serde_json::from_slice(&body).map_err(|e| DirectoryError::decode(e.to_string()))
            }
            StatusCode::NOT_FOUND => Err(DirectoryError::not_found(subject)),
            StatusCode::UNAUTHORIZED => {
                self.tokens.invalidate().await;
                Err(DirectoryError::auth(format!(
                    "token rejected while reading {subject}"
                )))
            }
            StatusCode::FORBIDDEN => Err(DirectoryError::auth(format!(
                "insufficient privileges to read {subject}"
            ))),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .map(std::time::Duration::from_secs);
                Err(DirectoryError::Throttled { retry_after })
            }
            s if s.is_server_error() => Err(DirectoryError::unavailable(format!(
                "{} returned {}",
                subject,
                s.as_u16()
            ))),
            s => {
                let message = response.text().await.unwrap_or_default();
                Err(DirectoryError::Api {
                    status: s.as_u16(),
                    message: format!("{subject}: {message}"),
                })
            }
        }
    }
}

#[async_trait]
impl DirectoryClient for GraphDirectory {
    async fn list_group_members(&self, group: &GroupId) -> DirectoryResult<MembershipSet> {
        let path = format!("/groups/{}/members", urlencoding::encode(group.as_str()));
        let members = self
            .fetch_collection(&path, &format!("group {group}"))
            .await?;

        tracing::debug!(group = %group, members = members.len(), "Fetched group members");
        Ok(members.into_iter().collect())
    }

    async fn list_direct_reports(&self, manager: &Identity) -> DirectoryResult<Vec<Identity>> {
        let path = format!(
            "/users/{}/directReports",
            urlencoding::encode(manager.as_str())
        );
        let reports = self
            .fetch_collection(&path, &format!("user {manager}"))
            .await?;

        tracing::debug!(manager = %manager, reports = reports.len(), "Fetched direct reports");
        Ok(reports)
    }
}
