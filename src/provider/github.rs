//! GitHub REST API implementation of the upstream host

use serde::Deserialize;
use tracing::warn;

use crate::provider::error::UpstreamError;
use crate::provider::types::{Platform, ProviderVersion};
use crate::provider::upstream::UpstreamHost;

/// Default base URL for GitHub API
const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Release asset as returned by the GitHub Releases API
#[derive(Debug, Deserialize)]
struct Asset {
    name: String,
    browser_download_url: Option<String>,
}

/// Response entry from the GitHub Releases API
#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    #[serde(default)]
    assets: Vec<Asset>,
}

/// Upstream host implementation for the GitHub REST API
pub struct GitHubHost {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubHost {
    /// Creates a new GitHubHost with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("provider-registry")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.to_string(),
            token: None,
        }
    }

    /// Attaches an API token sent as a bearer credential on every request
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, UpstreamError> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        Ok(request.send().await?)
    }
}

impl Default for GitHubHost {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl UpstreamHost for GitHubHost {
    async fn repository_exists(
        &self,
        namespace: &str,
        repo_name: &str,
    ) -> Result<bool, UpstreamError> {
        let url = format!("{}/repos/{}/{}", self.base_url, namespace, repo_name);

        let response = self.get(&url).await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }

        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(UpstreamError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        Ok(true)
    }

    async fn list_versions(
        &self,
        namespace: &str,
        repo_name: &str,
    ) -> Result<Vec<ProviderVersion>, UpstreamError> {
        let url = format!("{}/repos/{}/{}/releases", self.base_url, namespace, repo_name);

        let response = self.get(&url).await?;
        let status = response.status();

        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(UpstreamError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let releases: Vec<Release> = response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub releases response: {}", e);
            UpstreamError::InvalidResponse(e.to_string())
        })?;

        let mut versions: Vec<(semver::Version, ProviderVersion)> = releases
            .into_iter()
            .filter_map(|release| {
                let Some(parsed) = parse_release_tag(&release.tag_name) else {
                    warn!("Skipping release with non-semver tag: {}", release.tag_name);
                    return None;
                };

                let platforms = release
                    .assets
                    .into_iter()
                    .filter_map(|asset| platform_from_asset(asset.name, asset.browser_download_url))
                    .collect();

                let version = ProviderVersion {
                    version: parsed.to_string(),
                    platforms,
                };
                Some((parsed, version))
            })
            .collect();

        // Newest first
        versions.sort_by(|(a, _), (b, _)| b.cmp(a));

        Ok(versions.into_iter().map(|(_, v)| v).collect())
    }
}

/// Parses a release tag into a semver version, tolerating a leading `v`
fn parse_release_tag(tag: &str) -> Option<semver::Version> {
    let tag = tag.strip_prefix('v').unwrap_or(tag);
    semver::Version::parse(tag).ok()
}

/// Derives platform metadata from a release asset named
/// `<repo>_<version>_<os>_<arch>.zip`
fn platform_from_asset(name: String, download_url: Option<String>) -> Option<Platform> {
    let stem = name.strip_suffix(".zip")?;
    let mut parts = stem.rsplitn(3, '_');
    let arch = parts.next()?;
    let os = parts.next()?;
    parts.next()?;

    if os.is_empty() || arch.is_empty() {
        return None;
    }

    Some(Platform {
        os: os.to_string(),
        arch: arch.to_string(),
        filename: Some(name.clone()),
        download_url,
    })
}
