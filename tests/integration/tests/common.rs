//! Mock Microsoft Graph and token endpoint.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use mc_directory::{GraphConfig, GraphDirectory, RetryPolicy};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::oneshot;

pub const TENANT: &str = "contoso";
pub const CLIENT_ID: &str = "mgmtchain-app";
pub const CLIENT_SECRET: &str = "s3cret";
const ACCESS_TOKEN: &str = "mock-access-token";

/// A user object as Graph returns it.
pub fn user(mail: &str) -> Value {
    json!({
        "@odata.type": "#microsoft.graph.user",
        "id": format!("id-{mail}"),
        "mail": mail,
        "userPrincipalName": mail,
    })
}

/// A user object without a mail attribute.
pub fn user_without_mail(upn: &str) -> Value {
    json!({
        "@odata.type": "#microsoft.graph.user",
        "id": format!("id-{upn}"),
        "mail": null,
        "userPrincipalName": upn,
    })
}

/// A non-user directory object.
pub fn contact(mail: &str) -> Value {
    json!({
        "@odata.type": "#microsoft.graph.orgContact",
        "id": format!("id-{mail}"),
        "mail": mail,
    })
}

#[derive(Default)]
struct Fixture {
    groups: HashMap<String, Vec<Value>>,
    reports: HashMap<String, Vec<Value>>,
    next_links: Vec<String>,
    failures: HashMap<String, VecDeque<StatusCode>>,
    token_requests: usize,
    report_requests: Vec<String>,
}

type Shared = Arc<Mutex<Fixture>>;

/// A running mock server. Dropping it shuts the server down.
pub struct MockGraph {
    state: Shared,
    /// Base URL of the running server.
    pub base_url: String,
    _shutdown_tx: oneshot::Sender<()>,
}

impl MockGraph {
    /// Starts the mock on an ephemeral loopback port.
    pub async fn start() -> anyhow::Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("mc_directory=debug,mc_hierarchy=debug")
            .with_test_writer()
            .try_init();

        let state = Shared::default();
        let app = Router::new()
            .route("/:tenant/oauth2/v2.0/token", post(token))
            .route("/v1.0/groups/:id/members", get(group_members))
            .route("/v1.0/users/:id/directReports", get(direct_reports))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);

        let (_shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = server.await {
                eprintln!("mock graph error: {e}");
            }
        });

        Ok(Self {
            state,
            base_url,
            _shutdown_tx,
        })
    }

    /// Declares a group's member objects.
    pub fn group(&self, id: &str, members: Vec<Value>) -> &Self {
        self.state.lock().groups.insert(id.to_string(), members);
        self
    }

    /// Declares a user's direct-report objects.
    pub fn reports(&self, manager: &str, reports: Vec<Value>) -> &Self {
        self.state
            .lock()
            .reports
            .insert(manager.to_lowercase(), reports);
        self
    }

    /// Makes responses for `key` carry an `@odata.nextLink`.
    pub fn paged(&self, key: &str) -> &Self {
        self.state.lock().next_links.push(key.to_lowercase());
        self
    }

    /// Queues error statuses returned before the real response for `key`.
    pub fn fail(&self, key: &str, statuses: &[StatusCode]) -> &Self {
        self.state
            .lock()
            .failures
            .entry(key.to_lowercase())
            .or_default()
            .extend(statuses.iter().copied());
        self
    }

    /// Number of token requests served.
    pub fn token_requests(&self) -> usize {
        self.state.lock().token_requests
    }

    /// Direct-reports requests served, in order, lowercased.
    pub fn report_requests(&self) -> Vec<String> {
        self.state.lock().report_requests.clone()
    }

    /// Builds a Graph client against this mock.
    pub fn directory(&self) -> anyhow::Result<GraphDirectory> {
        self.directory_with_secret(CLIENT_SECRET)
    }

    /// Builds a Graph client with the given client secret.
    pub fn directory_with_secret(&self, secret: &str) -> anyhow::Result<GraphDirectory> {
        let config = GraphConfig::builder()
            .graph_url(format!("{}/v1.0", self.base_url))
            .authority_url(self.base_url.as_str())
            .tenant_id(TENANT)
            .client_id(CLIENT_ID)
            .client_secret(secret)
            .request_timeout(Duration::from_secs(5))
            .retry(RetryPolicy {
                max_retries: 2,
                initial_backoff: Duration::from_millis(10),
                max_backoff: Duration::from_millis(50),
            })
            .build()?;
        Ok(GraphDirectory::new(config)?)
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {ACCESS_TOKEN}"))
}

fn page(state: &Fixture, key: &str, value: &[Value]) -> Response {
    let mut body = json!({
        "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#directoryObjects",
        "value": value,
    });
    if state.next_links.iter().any(|k| k == key) {
        body["@odata.nextLink"] = json!(format!("https://graph.microsoft.com/v1.0/next/{key}"));
    }
    Json(body).into_response()
}

fn graph_error(status: StatusCode, code: &str) -> Response {
    let mut response = (
        status,
        Json(json!({ "error": { "code": code, "message": code } })),
    )
        .into_response();
    if status == StatusCode::TOO_MANY_REQUESTS {
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, header::HeaderValue::from_static("0"));
    }
    response
}

fn injected_failure(state: &mut Fixture, key: &str) -> Option<Response> {
    let status = state.failures.get_mut(key)?.pop_front()?;
    Some(graph_error(status, "injected"))
}

async fn token(
    State(state): State<Shared>,
    Path(tenant): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.lock().token_requests += 1;

    let valid = tenant == TENANT
        && form.get("grant_type").map(String::as_str) == Some("client_credentials")
        && form.get("client_id").map(String::as_str) == Some(CLIENT_ID)
        && form.get("client_secret").map(String::as_str) == Some(CLIENT_SECRET)
        && form.get("scope").is_some_and(|s| s.ends_with("/.default"));

    if !valid {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "invalid_client",
                "error_description": "AADSTS7000215: Invalid client secret provided.",
            })),
        )
            .into_response();
    }

    Json(json!({
        "token_type": "Bearer",
        "expires_in": 3599,
        "access_token": ACCESS_TOKEN,
    }))
    .into_response()
}

async fn group_members(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return graph_error(StatusCode::UNAUTHORIZED, "InvalidAuthenticationToken");
    }
    let mut state = state.lock();
    if let Some(response) = injected_failure(&mut state, &id) {
        return response;
    }
    match state.groups.get(&id) {
        Some(members) => page(&state, &id, members),
        None => graph_error(StatusCode::NOT_FOUND, "Request_ResourceNotFound"),
    }
}

async fn direct_reports(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return graph_error(StatusCode::UNAUTHORIZED, "InvalidAuthenticationToken");
    }
    let key = id.to_lowercase();
    let mut state = state.lock();
    state.report_requests.push(key.clone());
    if let Some(response) = injected_failure(&mut state, &key) {
        return response;
    }
    match state.reports.get(&key) {
        Some(reports) => page(&state, &key, reports),
        None => graph_error(StatusCode::NOT_FOUND, "Request_ResourceNotFound"),
    }
}
