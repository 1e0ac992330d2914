use org_stats::api::{Error, Sort};
use org_stats_app::collect_org_stats;
use org_stats_app::Args;
use secrecy::SecretString;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ORG: &str = "acme";

#[tokio::test]
async fn happy_path_report() {
    let server = MockServer::start().await;

    let listing = format!("[{},{}]", widget_repo_body(), bare_repo_body());
    mock_org_repos(&server, listing).await;
    mock_get(&server, format!("/repos/{}/widget/traffic/clones", ORG), traffic_body(12, 4)).await;
    mock_get(&server, format!("/repos/{}/widget/traffic/views", ORG), traffic_body(100, 40)).await;
    mock_get(
        &server,
        format!("/repos/{}/widget/releases", ORG),
        r#"[
            { "assets": [ { "download_count": 5 }, { "download_count": 10 } ] },
            { "assets": [ { "download_count": 1 } ] }
        ]"#
        .to_string(),
    )
    .await;
    mock_get(
        &server,
        format!("/repos/{}/widget/contributors", ORG),
        r#"[
            { "login": "alice", "contributions": 40 },
            { "login": "bob", "contributions": 2 }
        ]"#
        .to_string(),
    )
    .await;
    mock_get(&server, format!("/repos/{}/bare/traffic/clones", ORG), traffic_body(0, 0)).await;
    mock_get(&server, format!("/repos/{}/bare/traffic/views", ORG), traffic_body(0, 0)).await;
    mock_get(&server, format!("/repos/{}/bare/releases", ORG), "[]".to_string()).await;
    mock_get(&server, format!("/repos/{}/bare/contributors", ORG), "[]".to_string()).await;

    let mut receiver = collect_org_stats(args(&server, Some("test-token"))).await.unwrap();

    let mut rows = Vec::new();
    while let Some(row) = receiver.recv().await {
        rows.push(row.to_string());
    }
    assert_eq!(
        rows,
        vec![
            "widget,42,7,42,3,2,2048,2019-06-01,2024-03-15,12,4,100,40,16,Rust,mit,true,false,false,main,\"cli;stats\"",
            "bare,0,0,0,0,0,10,2020-01-02,2020-01-02,0,0,0,0,0,,,false,false,false,main,\"\"",
        ]
    );
}

#[tokio::test]
async fn failed_view_traffic_degrades_only_the_view_fields() {
    let server = MockServer::start().await;

    mock_org_repos(&server, format!("[{}]", widget_repo_body())).await;
    mock_get(&server, format!("/repos/{}/widget/traffic/clones", ORG), traffic_body(12, 4)).await;
    Mock::given(method("GET"))
        .and(path(format!("/repos/{}/widget/traffic/views", ORG)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mock_get(
        &server,
        format!("/repos/{}/widget/releases", ORG),
        r#"[ { "assets": [ { "download_count": 16 } ] } ]"#.to_string(),
    )
    .await;
    mock_get(
        &server,
        format!("/repos/{}/widget/contributors", ORG),
        r#"[ { "login": "alice", "contributions": 40 } ]"#.to_string(),
    )
    .await;

    let mut receiver = collect_org_stats(args(&server, Some("test-token"))).await.unwrap();

    let row = receiver.recv().await.unwrap();
    assert_eq!(row.views_14d, 0);
    assert_eq!(row.unique_views_14d, 0);
    assert_eq!(row.clones_14d, 12);
    assert_eq!(row.unique_clones_14d, 4);
    assert_eq!(row.total_downloads, 16);
    assert_eq!(row.contributors_estimate, "1");
    assert!(receiver.recv().await.is_none());
}

#[tokio::test]
async fn full_contributor_page_is_reported_as_30_plus() {
    let server = MockServer::start().await;

    mock_org_repos(&server, format!("[{}]", widget_repo_body())).await;
    mock_get(&server, format!("/repos/{}/widget/traffic/clones", ORG), traffic_body(0, 0)).await;
    mock_get(&server, format!("/repos/{}/widget/traffic/views", ORG), traffic_body(0, 0)).await;
    mock_get(&server, format!("/repos/{}/widget/releases", ORG), "[]".to_string()).await;
    mock_get(
        &server,
        format!("/repos/{}/widget/contributors", ORG),
        contributors_body(30),
    )
    .await;

    let mut receiver = collect_org_stats(args(&server, Some("test-token"))).await.unwrap();

    let row = receiver.recv().await.unwrap();
    assert_eq!(row.contributors_estimate, "30+");
}

#[tokio::test]
async fn failed_listing_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/orgs/{}/repos", ORG)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = collect_org_stats(args(&server, Some("test-token"))).await;

    assert!(matches!(result, Err(Error::RequestError(_))));
}

#[tokio::test]
async fn missing_token_makes_no_request() {
    let server = MockServer::start().await;

    let result = collect_org_stats(args(&server, None)).await;

    assert!(matches!(result, Err(Error::Error(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

fn args(server: &MockServer, token: Option<&str>) -> Args {
    Args {
        org: ORG.to_string(),
        sort: Sort::Updated,
        api_token: token.map(|token| SecretString::new(token.to_string())),
        api_url: server.uri(),
        delay_ms: 0,
        output: None,
    }
}

async fn mock_org_repos(server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/orgs/{}/repos", ORG)))
        .and(query_param("sort", "updated"))
        .and(query_param("per_page", "100"))
        .and(header("Accept", "application/vnd.github.v3+json"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(server)
        .await;
}

async fn mock_get(server: &MockServer, request_path: String, body: String) {
    Mock::given(method("GET"))
        .and(path(request_path))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(server)
        .await;
}

fn widget_repo_body() -> String {
    r#"{
        "name": "widget",
        "stargazers_count": 42,
        "forks_count": 7,
        "watchers_count": 42,
        "open_issues_count": 3,
        "size": 2048,
        "created_at": "2019-06-01T10:00:00Z",
        "updated_at": "2024-03-15T08:30:00Z",
        "language": "Rust",
        "license": { "key": "mit" },
        "has_wiki": true,
        "has_pages": false,
        "archived": false,
        "default_branch": "main",
        "topics": ["cli", "stats"]
    }"#
    .to_string()
}

fn bare_repo_body() -> String {
    r#"{
        "name": "bare",
        "size": 10,
        "created_at": "2020-01-02T00:00:00Z",
        "updated_at": "2020-01-02T00:00:00Z",
        "language": null,
        "license": null,
        "default_branch": "main"
    }"#
    .to_string()
}

fn traffic_body(count: u32, uniques: u32) -> String {
    format!(r#"{{ "count": {}, "uniques": {} }}"#, count, uniques)
}

fn contributors_body(count: u32) -> String {
    let mut body = String::from("[");
    for index in 0..count {
        if index > 0 {
            body.push(',');
        }
        body.push_str(&format!(
            r#"{{ "login": "login_{}", "contributions": {} }}"#,
            index,
            100 + count - index
        ));
    }
    body.push(']');
    body
}
