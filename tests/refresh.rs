//! End-to-end refresh workflow tests against a real SQLite cache and a
//! mocked upstream host

use chrono::Duration;
use mockito::Server;
use tempfile::TempDir;

use provider_registry::provider::cache::Cache;
use provider_registry::provider::error::RefreshError;
use provider_registry::provider::github::GitHubHost;
use provider_registry::provider::refresh::{RefreshEvent, Refreshed, refresh_provider};
use provider_registry::provider::store::VersionStore;

fn test_cache() -> (TempDir, Cache) {
    let temp_dir = TempDir::new().unwrap();
    let cache = Cache::new(&temp_dir.path().join("test.db")).unwrap();
    (temp_dir, cache)
}

const RELEASES: &str = r#"[
    {"tag_name": "v2.0.0", "assets": [
        {"name": "terraform-provider-aws_2.0.0_linux_amd64.zip",
         "browser_download_url": "https://example.com/2.0.0/linux_amd64.zip"}
    ]},
    {"tag_name": "v1.0.0", "assets": []}
]"#;

#[tokio::test]
async fn refresh_populates_empty_cache_from_upstream() {
    let (_temp_dir, cache) = test_cache();
    let mut server = Server::new_async().await;

    let exists_mock = server
        .mock("GET", "/repos/opentofu/terraform-provider-aws")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    let releases_mock = server
        .mock("GET", "/repos/opentofu/terraform-provider-aws/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(RELEASES)
        .create_async()
        .await;

    let upstream = GitHubHost::new(&server.url());
    let event = RefreshEvent::new("opentofu", "aws");

    let outcome = refresh_provider(&cache, &upstream, &event, Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(outcome, Refreshed::Stored);

    exists_mock.assert_async().await;
    releases_mock.assert_async().await;

    let document = cache.get_document("opentofu/aws").unwrap().unwrap();
    let versions: Vec<&str> = document.versions.iter().map(|v| v.version.as_str()).collect();
    assert_eq!(versions, vec!["2.0.0", "1.0.0"]);

    let platform = &document.versions[0].platforms[0];
    assert_eq!(platform.os, "linux");
    assert_eq!(platform.arch, "amd64");
}

#[tokio::test]
async fn second_refresh_within_allowed_age_is_a_no_op() {
    let (_temp_dir, cache) = test_cache();
    let mut server = Server::new_async().await;

    // Upstream expects exactly one existence check and one listing fetch
    let exists_mock = server
        .mock("GET", "/repos/opentofu/terraform-provider-aws")
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;
    let releases_mock = server
        .mock("GET", "/repos/opentofu/terraform-provider-aws/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(RELEASES)
        .expect(1)
        .create_async()
        .await;

    let upstream = GitHubHost::new(&server.url());
    let event = RefreshEvent::new("opentofu", "aws");

    let first = refresh_provider(&cache, &upstream, &event, Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(first, Refreshed::Stored);

    let second = refresh_provider(&cache, &upstream, &event, Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(second, Refreshed::Fresh);

    exists_mock.assert_async().await;
    releases_mock.assert_async().await;
}

#[tokio::test]
async fn missing_repository_fails_and_stores_nothing() {
    let (_temp_dir, cache) = test_cache();
    let mut server = Server::new_async().await;

    let exists_mock = server
        .mock("GET", "/repos/opentofu/terraform-provider-nope")
        .with_status(404)
        .with_body(r#"{"message": "Not Found"}"#)
        .create_async()
        .await;

    let upstream = GitHubHost::new(&server.url());
    let event = RefreshEvent::new("opentofu", "nope");

    let result = refresh_provider(&cache, &upstream, &event, Duration::hours(1)).await;
    assert!(matches!(result, Err(RefreshError::NotFound { .. })));

    exists_mock.assert_async().await;
    assert!(cache.get_document("opentofu/nope").unwrap().is_none());
}

#[tokio::test]
async fn failed_fetch_leaves_previous_listing_intact() {
    let (_temp_dir, cache) = test_cache();
    let mut server = Server::new_async().await;

    // Pre-populate, then force staleness with a zero allowed age
    let exists_ok = server
        .mock("GET", "/repos/opentofu/terraform-provider-aws")
        .with_status(200)
        .with_body("{}")
        .expect(2)
        .create_async()
        .await;
    let releases_ok = server
        .mock("GET", "/repos/opentofu/terraform-provider-aws/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(RELEASES)
        .expect(1)
        .create_async()
        .await;

    let upstream = GitHubHost::new(&server.url());
    let event = RefreshEvent::new("opentofu", "aws");

    refresh_provider(&cache, &upstream, &event, Duration::zero())
        .await
        .unwrap();
    let stored = cache.get_document("opentofu/aws").unwrap().unwrap();

    releases_ok.assert_async().await;
    releases_ok.remove_async().await;
    let releases_broken = server
        .mock("GET", "/repos/opentofu/terraform-provider-aws/releases")
        .with_status(502)
        .expect(1)
        .create_async()
        .await;

    let result = refresh_provider(&cache, &upstream, &event, Duration::zero()).await;
    assert!(matches!(result, Err(RefreshError::Upstream(_))));

    exists_ok.assert_async().await;
    releases_broken.assert_async().await;

    let after = cache.get_document("opentofu/aws").unwrap().unwrap();
    assert_eq!(after.versions, stored.versions);
    assert_eq!(after.last_updated, stored.last_updated);
}

#[tokio::test]
async fn empty_release_list_is_stored_as_empty_listing() {
    let (_temp_dir, cache) = test_cache();
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/repos/opentofu/terraform-provider-new")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    server
        .mock("GET", "/repos/opentofu/terraform-provider-new/releases")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let upstream = GitHubHost::new(&server.url());
    let event = RefreshEvent::new("opentofu", "new");

    let outcome = refresh_provider(&cache, &upstream, &event, Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(outcome, Refreshed::Stored);

    let document = cache.get_document("opentofu/new").unwrap().unwrap();
    assert!(document.versions.is_empty());
}

#[tokio::test]
async fn validation_failure_never_reaches_upstream() {
    let (_temp_dir, cache) = test_cache();
    let mut server = Server::new_async().await;

    // Any request to the mock server would fail the expect(0) assertions
    let any_mock = server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let upstream = GitHubHost::new(&server.url());
    let event = RefreshEvent::new("", "aws");

    let result = refresh_provider(&cache, &upstream, &event, Duration::hours(1)).await;
    assert!(matches!(result, Err(RefreshError::Validation(_))));

    any_mock.assert_async().await;
}
