//! Wire-level behavior of the live fetcher against a local mock server.

use prdigest::{FetchError, GitHub, PageSource, PullState, Repo, SortKey};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

fn repo() -> Repo {
    Repo::new("m3db", "m3").expect("valid repo")
}

fn page_body() -> serde_json::Value {
    serde_json::json!([
        {
            "number": 42,
            "title": "Fix flaky bootstrap test",
            "html_url": "https://github.com/m3db/m3/pull/42",
            "created_at": "2024-05-14T09:00:00Z",
            "updated_at": "2024-05-14T10:30:00Z",
            "closed_at": null,
            // Fields the digest does not consume; must be tolerated.
            "state": "open",
            "user": { "login": "octocat" },
            "draft": false
        }
    ])
}

#[tokio::test]
async fn sends_expected_query_parameters_and_auth_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/m3db/m3/pulls"))
        .and(query_param("state", "open"))
        .and(query_param("sort", "created"))
        .and(query_param("direction", "desc"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "20"))
        .and(header("authorization", "token sekrit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body()))
        .expect(1)
        .mount(&server)
        .await;

    let github =
        GitHub::with_base_url(&repo(), "sekrit".to_string(), &server.uri()).expect("client");

    let page = github
        .fetch_page(PullState::Open, SortKey::Created, 1, 20)
        .await
        .expect("page");

    assert_eq!(page.len(), 1);
    assert_eq!(page[0].number, 42);
    assert_eq!(page[0].title, "Fix flaky bootstrap test");
    assert!(page[0].closed_at.is_none());
}

#[tokio::test]
async fn non_success_status_maps_to_a_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/m3db/m3/pulls"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let github =
        GitHub::with_base_url(&repo(), "sekrit".to_string(), &server.uri()).expect("client");

    let err = github
        .fetch_page(PullState::Open, SortKey::Created, 1, 20)
        .await
        .expect_err("should fail");

    match err {
        FetchError::Status { status, .. } => assert_eq!(status.as_u16(), 403),
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn unparsable_body_maps_to_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/m3db/m3/pulls"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not a page"))
        .mount(&server)
        .await;

    let github =
        GitHub::with_base_url(&repo(), "sekrit".to_string(), &server.uri()).expect("client");

    let err = github
        .fetch_page(PullState::Closed, SortKey::Updated, 1, 20)
        .await
        .expect_err("should fail");

    assert!(matches!(err, FetchError::Decode { .. }));
}
