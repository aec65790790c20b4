//! GitLab client tests against a mock HTTP server.

use gitlab2github::{GitlabClient, GitlabError, RepoPath};
use mockito::Matcher;
use serde_json::json;

fn repo() -> RepoPath {
    "acme/widgets".parse().unwrap()
}

fn issue_json(iid: u64, title: &str, state: &str) -> serde_json::Value {
    json!({
        "iid": iid,
        "title": title,
        "description": "body",
        "state": state,
        "labels": [],
        "author": {"username": "alice", "web_url": "https://gitlab.com/alice"},
        "created_at": "2021-03-01T10:15:00.000Z",
        "confidential": false,
        "web_url": format!("https://gitlab.com/acme/widgets/-/issues/{iid}")
    })
}

fn note_json(id: u64, body: &str, created_at: &str) -> serde_json::Value {
    json!({
        "id": id,
        "body": body,
        "author": {"username": "bob", "web_url": "https://gitlab.com/bob"},
        "created_at": created_at,
        "system": false,
        "internal": false
    })
}

#[tokio::test]
async fn lists_issues_across_pages_sorted_by_iid() {
    let mut server = mockito::Server::new_async().await;

    let _page1 = server
        .mock("GET", Matcher::Regex(r"^/api/v4/projects/[^/]+/issues$".to_string()))
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([issue_json(2, "Second", "opened"), issue_json(1, "First", "opened")])
                .to_string(),
        )
        .create_async()
        .await;

    let _page2 = server
        .mock("GET", Matcher::Regex(r"^/api/v4/projects/[^/]+/issues$".to_string()))
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([issue_json(3, "Third", "closed")]).to_string())
        .create_async()
        .await;

    let client = GitlabClient::new(&server.url(), "token", &repo()).with_page_size(2);
    let issues = client.list_issues().await.unwrap();

    let iids: Vec<u64> = issues.iter().map(|issue| issue.iid).collect();
    assert_eq!(iids, vec![1, 2, 3]);
}

#[tokio::test]
async fn short_page_stops_pagination() {
    let mut server = mockito::Server::new_async().await;

    let page1 = server
        .mock("GET", Matcher::Regex(r"^/api/v4/projects/[^/]+/issues$".to_string()))
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([issue_json(1, "Only", "opened")]).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = GitlabClient::new(&server.url(), "token", &repo()).with_page_size(2);
    let issues = client.list_issues().await.unwrap();

    assert_eq!(issues.len(), 1);
    page1.assert_async().await;
}

#[tokio::test]
async fn rejected_token_maps_to_auth_error() {
    let mut server = mockito::Server::new_async().await;

    let _project = server
        .mock("GET", Matcher::Regex(r"^/api/v4/projects/[^/]+$".to_string()))
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "401 Unauthorized"}"#)
        .create_async()
        .await;

    let client = GitlabClient::new(&server.url(), "bad-token", &repo());
    let result = client.project().await;

    assert!(matches!(result, Err(GitlabError::Auth)));
}

#[tokio::test]
async fn api_error_carries_status_and_message() {
    let mut server = mockito::Server::new_async().await;

    let _project = server
        .mock("GET", Matcher::Regex(r"^/api/v4/projects/[^/]+$".to_string()))
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "404 Project Not Found"}"#)
        .create_async()
        .await;

    let client = GitlabClient::new(&server.url(), "token", &repo());
    let result = client.project().await;

    match result {
        Err(GitlabError::Api { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "404 Project Not Found");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn sends_private_token_header() {
    let mut server = mockito::Server::new_async().await;

    let project = server
        .mock("GET", Matcher::Regex(r"^/api/v4/projects/[^/]+$".to_string()))
        .match_header("PRIVATE-TOKEN", "sekrit")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": 42,
                "path_with_namespace": "acme/widgets",
                "web_url": "https://gitlab.com/acme/widgets"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = GitlabClient::new(&server.url(), "sekrit", &repo());
    let fetched = client.project().await.unwrap();

    assert_eq!(fetched.id, 42);
    project.assert_async().await;
}

#[tokio::test]
async fn notes_are_sorted_by_creation_time() {
    let mut server = mockito::Server::new_async().await;

    let _notes = server
        .mock(
            "GET",
            Matcher::Regex(r"^/api/v4/projects/[^/]+/issues/7/notes$".to_string()),
        )
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                note_json(2, "later", "2021-03-02T09:00:00.000Z"),
                note_json(1, "earlier", "2021-03-02T08:00:00.000Z")
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let client = GitlabClient::new(&server.url(), "token", &repo());
    let notes = client.list_notes(7).await.unwrap();

    let bodies: Vec<&str> = notes.iter().map(|note| note.body.as_str()).collect();
    assert_eq!(bodies, vec!["earlier", "later"]);
}
