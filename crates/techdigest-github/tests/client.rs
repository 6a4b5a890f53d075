//! Integration tests for `GithubClient` and `fetch_trending` using wiremock HTTP mocks.

use chrono::{Duration, TimeZone, Utc};
use techdigest_core::GithubSettings;
use techdigest_github::{fetch_trending, GithubClient, GithubError, SearchParams};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str, token: Option<&str>) -> GithubClient {
    GithubClient::with_base_url(token, 30, base_url).expect("client construction should not fail")
}

fn repo(name: &str, stars: u64, created_at: &str) -> serde_json::Value {
    serde_json::json!({
        "full_name": name,
        "description": null,
        "stargazers_count": stars,
        "forks_count": 3,
        "language": "Rust",
        "html_url": format!("https://github.com/{name}"),
        "created_at": created_at,
        "topics": ["llm"]
    })
}

#[tokio::test]
async fn search_repositories_returns_items() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "total_count": 1,
        "incomplete_results": false,
        "items": [repo("acme/rocket", 420, "2026-01-08T00:00:00Z")]
    });

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "stars:>50"))
        .and(query_param("sort", "stars"))
        .and(query_param("order", "desc"))
        .and(query_param("per_page", "30"))
        .and(header("accept", "application/vnd.github.v3+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), None);
    let params = SearchParams {
        q: "stars:>50".to_string(),
        sort: "stars".to_string(),
        order: "desc".to_string(),
        per_page: 30,
    };
    let items = client
        .search_repositories(&params)
        .await
        .expect("should parse search results");

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].full_name, "acme/rocket");
    assert_eq!(items[0].stargazers_count, 420);
    assert!(items[0].description.is_none());
    assert_eq!(items[0].topics, ["llm"]);
}

#[tokio::test]
async fn token_is_sent_as_bearer_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(header("authorization", "Bearer gh-secret"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "items": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), Some("gh-secret"));
    let settings = GithubSettings::default();
    let ranked = fetch_trending(&client, &settings, Utc::now())
        .await
        .expect("empty search should succeed");
    assert!(ranked.is_empty());
}

#[tokio::test]
async fn fetch_trending_reranks_and_truncates() {
    let server = MockServer::start().await;
    let now = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
    let iso = |d: chrono::DateTime<Utc>| d.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    // API order is by raw stars; velocity order is different.
    let body = serde_json::json!({
        "total_count": 3,
        "items": [
            repo("old/giant", 5000, &iso(now - Duration::days(7))),
            repo("new/rocket", 900, &iso(now - Duration::days(1))),
            repo("mid/climber", 1500, &iso(now - Duration::days(3))),
        ]
    });

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "created:>2026-01-03 stars:>50"))
        .and(query_param("per_page", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), None);
    let settings = GithubSettings {
        top_n: 2,
        ..GithubSettings::default()
    };
    let ranked = fetch_trending(&client, &settings, now)
        .await
        .expect("should rank results");

    let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["new/rocket", "old/giant"]);
    assert!((ranked[0].star_velocity - 900.0).abs() < 1e-9);
    assert!((ranked[1].star_velocity - 714.3).abs() < 1e-9);
    assert_eq!(ranked[0].description, "");
}

#[tokio::test]
async fn non_2xx_status_is_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(403).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), None);
    let err = fetch_trending(&client, &GithubSettings::default(), Utc::now())
        .await
        .expect_err("403 must fail the stage");
    assert!(matches!(err, GithubError::Http(_)), "got: {err:?}");
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), None);
    let err = fetch_trending(&client, &GithubSettings::default(), Utc::now())
        .await
        .expect_err("non-JSON body must fail");
    assert!(
        matches!(err, GithubError::Deserialize { ref context, .. } if context.contains("search/repositories")),
        "got: {err:?}"
    );
}
