//! Full resolution pipeline against the mock Graph.

use mc_cli::commands::resolve_report;
use mc_cli::config::OutputFormat;
use mc_cli::output::write_report;
use mc_hierarchy::{resolve_group, Report};
use mc_model::{GroupId, Identity};

use crate::common::{contact, user, user_without_mail, MockGraph};

fn text(report: &Report) -> String {
    let mut out = Vec::new();
    report.write_text(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

async fn org() -> MockGraph {
    let mock = MockGraph::start().await.unwrap();
    mock.group(
        "g1",
        vec![
            user("alice@x.com"),
            user("Bob@X.com"),
            user("carol@x.com"),
            contact("vendor@partner.example"),
            user_without_mail("svc-backup@x.onmicrosoft.com"),
        ],
    )
    .reports("root@x.com", vec![user("alice@x.com"), user("dave@x.com")])
    .reports("alice@x.com", vec![user("bob@x.com")])
    .reports("bob@x.com", vec![user("carol@x.com")])
    .reports("carol@x.com", vec![])
    .reports("dave@x.com", vec![user("erin@x.com")]);
    mock
}

#[tokio::test]
async fn resolves_group_through_graph() {
    let mock = org().await;
    let directory = mock.directory().unwrap();

    let outcome = resolve_group(
        &directory,
        &GroupId::new("g1").unwrap(),
        &Identity::new("root@x.com").unwrap(),
    )
    .await
    .unwrap();

    // Only the three mail-enabled users count as members.
    assert_eq!(outcome.members.len(), 3);
    assert!(outcome.resolution.is_complete());
    assert_eq!(
        text(&outcome.report().unwrap()),
        "EmailAddress, ManagerEmailAddress\n\
         alice@x.com, root@x.com\n\
         bob@x.com, alice@x.com\n\
         carol@x.com, bob@x.com\n"
    );

    // dave is not a member and is never expanded.
    assert_eq!(
        mock.report_requests(),
        ["root@x.com", "alice@x.com", "bob@x.com", "carol@x.com"]
    );
    assert_eq!(mock.token_requests(), 1);
}

#[tokio::test]
async fn manager_spelling_does_not_matter() {
    let mock = org().await;
    let directory = mock.directory().unwrap();

    let resolved = resolve_report(
        &directory,
        &GroupId::new("g1").unwrap(),
        &Identity::new("ROOT@X.COM").unwrap(),
        None,
    )
    .await
    .unwrap();

    assert_eq!(resolved.report.len(), 3);
    assert_eq!(resolved.queries, 4);
}

#[tokio::test]
async fn json_output_from_graph() {
    let mock = org().await;
    let directory = mock.directory().unwrap();

    let resolved = resolve_report(
        &directory,
        &GroupId::new("g1").unwrap(),
        &Identity::new("root@x.com").unwrap(),
        Some(1),
    )
    .await
    .unwrap();

    let mut out = Vec::new();
    write_report(&resolved.report, OutputFormat::Json, &mut out).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            { "email_address": "alice@x.com", "manager_email_address": "root@x.com" },
        ])
    );
}

#[tokio::test]
async fn truncated_page_uses_first_page() {
    let mock = org().await;
    mock.paged("root@x.com");
    let directory = mock.directory().unwrap();

    let outcome = resolve_group(
        &directory,
        &GroupId::new("g1").unwrap(),
        &Identity::new("root@x.com").unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.resolution.hierarchy.len(), 3);
}

#[tokio::test]
async fn group_without_user_members_yields_header_only() {
    let mock = org().await;
    mock.group("empty", vec![contact("vendor@partner.example")]);
    let directory = mock.directory().unwrap();

    let outcome = resolve_group(
        &directory,
        &GroupId::new("empty").unwrap(),
        &Identity::new("root@x.com").unwrap(),
    )
    .await
    .unwrap();

    assert!(outcome.members.is_empty());
    assert_eq!(
        text(&outcome.report().unwrap()),
        "EmailAddress, ManagerEmailAddress\n"
    );
}
