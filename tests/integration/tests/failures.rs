//! Failure handling against the mock Graph.

use axum::http::StatusCode;
use mc_cli::commands::resolve_report;
use mc_cli::CliError;
use mc_hierarchy::Resolver;
use mc_model::{GroupId, Identity};

use crate::common::{user, MockGraph};

fn id(value: &str) -> Identity {
    Identity::new(value).unwrap()
}

fn group() -> GroupId {
    GroupId::new("g1").unwrap()
}

async fn org() -> MockGraph {
    let mock = MockGraph::start().await.unwrap();
    mock.group(
        "g1",
        vec![user("alice@x.com"), user("bob@x.com"), user("carol@x.com")],
    )
    .reports("root@x.com", vec![user("alice@x.com")])
    .reports("alice@x.com", vec![user("bob@x.com")])
    .reports("bob@x.com", vec![user("carol@x.com")])
    .reports("carol@x.com", vec![]);
    mock
}

#[tokio::test]
async fn transient_errors_are_retried() {
    let mock = org().await;
    mock.fail("alice@x.com", &[StatusCode::TOO_MANY_REQUESTS])
        .fail("bob@x.com", &[StatusCode::SERVICE_UNAVAILABLE]);
    let directory = mock.directory().unwrap();

    let resolution = Resolver::new(&directory)
        .resolve_group(&group(), &id("root@x.com"))
        .await
        .unwrap()
        .resolution;

    assert!(resolution.is_complete());
    assert_eq!(resolution.hierarchy.len(), 3);
    assert_eq!(
        mock.report_requests(),
        [
            "root@x.com",
            "alice@x.com",
            "alice@x.com",
            "bob@x.com",
            "bob@x.com",
            "carol@x.com"
        ]
    );
}

#[tokio::test]
async fn exhausted_retries_skip_the_branch() {
    let mock = org().await;
    mock.fail("bob@x.com", &[StatusCode::BAD_GATEWAY; 3]);
    let directory = mock.directory().unwrap();

    let resolution = Resolver::new(&directory)
        .resolve_group(&group(), &id("root@x.com"))
        .await
        .unwrap()
        .resolution;

    assert_eq!(
        resolution.hierarchy.manager_of(&id("bob@x.com")),
        Some(&id("alice@x.com"))
    );
    assert!(!resolution.hierarchy.contains(&id("carol@x.com")));
    assert_eq!(resolution.failures.len(), 1);
    assert_eq!(resolution.failures[0].manager, id("bob@x.com"));
    assert!(resolution.failures[0].error.is_transient());
}

#[tokio::test]
async fn missing_user_is_not_retried() {
    let mock = MockGraph::start().await.unwrap();
    mock.group("g1", vec![user("alice@x.com"), user("erin@x.com")])
        .reports("root@x.com", vec![user("alice@x.com"), user("erin@x.com")])
        .reports("erin@x.com", vec![]);
    let directory = mock.directory().unwrap();

    let resolved = resolve_report(&directory, &group(), &id("root@x.com"), None)
        .await
        .unwrap();

    assert_eq!(resolved.report.len(), 2);
    assert_eq!(resolved.failures.len(), 1);
    assert!(resolved.failures[0].error.is_not_found());
    assert_eq!(
        mock.report_requests(),
        ["root@x.com", "alice@x.com", "erin@x.com"]
    );
}

#[tokio::test]
async fn rejected_secret_is_an_authentication_failure() {
    let mock = org().await;
    let directory = mock.directory_with_secret("wrong").unwrap();

    let err = directory.authenticate().await.unwrap_err();
    assert!(err.is_authentication());
    assert!(err.to_string().contains("invalid_client"));
    assert!(!err.to_string().contains("wrong"));

    let err = resolve_report(&directory, &group(), &id("root@x.com"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::Auth(_)));
    assert_eq!(err.exit_code(), 3);
    assert!(mock.report_requests().is_empty());
}

#[tokio::test]
async fn missing_group_is_a_group_fetch_failure() {
    let mock = org().await;
    let directory = mock.directory().unwrap();

    let err = resolve_report(
        &directory,
        &GroupId::new("does-not-exist").unwrap(),
        &id("root@x.com"),
        None,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CliError::GroupFetch(_)));
    assert_eq!(err.exit_code(), 4);
    assert!(mock.report_requests().is_empty());
}

#[tokio::test]
async fn forbidden_group_is_an_authentication_failure() {
    let mock = org().await;
    mock.fail("g1", &[StatusCode::FORBIDDEN]);
    let directory = mock.directory().unwrap();

    let err = resolve_report(&directory, &group(), &id("root@x.com"), None)
        .await
        .unwrap_err();

    assert_eq!(err.exit_code(), 3);
}
