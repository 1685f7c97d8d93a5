use crate::ports::outbound::SourceForge;
use crate::release_tracking::domain::{Commit, Release, RepositoryId};
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default GitHub REST API endpoint
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// GitHub caps `per_page` at 100
const MAX_PER_PAGE: usize = 100;

#[derive(Debug, Deserialize)]
struct GitHubRelease {
    tag_name: String,
    #[serde(default)]
    target_commitish: String,
    #[serde(default)]
    prerelease: bool,
}

#[derive(Debug, Deserialize)]
struct GitHubCommit {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GitHubObject {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GitHubRef {
    object: GitHubObject,
}

#[derive(Debug, Deserialize)]
struct GitHubTagObject {
    sha: String,
}

#[derive(Debug, Serialize)]
struct CreateTagRequest<'a> {
    tag: &'a str,
    message: &'a str,
    object: &'a str,
    #[serde(rename = "type")]
    object_type: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateRefRequest<'a> {
    #[serde(rename = "ref")]
    ref_name: &'a str,
    sha: &'a str,
}

/// GitHubClient adapter for the GitHub REST API
///
/// Implements the SourceForge port. Sends a bearer token when one is
/// configured; read-only calls against public repositories work without.
/// There are no retries here: a failed call fails the one task that made it.
pub struct GitHubClient {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(api_url: &str, token: Option<String>) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("rc-tracker/{}", version);

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// Builds `<api>/repos/<owner>/<name><suffix>` from a validated repository id
    fn repo_url(&self, repository: &str, suffix: &str) -> Result<String> {
        let id = RepositoryId::parse(repository)?;
        Ok(format!(
            "{}/repos/{}/{}{}",
            self.api_url,
            urlencoding::encode(id.owner()),
            urlencoding::encode(id.name()),
            suffix
        ))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder, what: &str) -> Result<reqwest::Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .with_context(|| format!("GitHub request failed: {}", what))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "GitHub API returned status code {} for {}: {}",
                status,
                what,
                truncate(&body, 200)
            );
        }
        Ok(response)
    }
}

/// Encodes each `/`-separated piece of a tag name, keeping the separators
fn encode_tag_path(tag: &str) -> String {
    tag.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[async_trait]
impl SourceForge for GitHubClient {
    async fn list_releases(&self, repository: &str, limit: usize) -> Result<Vec<Release>> {
        let url = self.repo_url(
            repository,
            &format!("/releases?per_page={}", limit.clamp(1, MAX_PER_PAGE)),
        )?;
        let releases: Vec<GitHubRelease> = self
            .send(self.client.get(&url), &format!("releases of {}", repository))
            .await?
            .json()
            .await?;

        Ok(releases
            .into_iter()
            .take(limit)
            .map(|r| Release::new(r.tag_name, r.target_commitish, r.prerelease))
            .collect())
    }

    async fn list_commits(&self, repository: &str, limit: usize) -> Result<Vec<Commit>> {
        let url = self.repo_url(
            repository,
            &format!("/commits?per_page={}", limit.clamp(1, MAX_PER_PAGE)),
        )?;
        let commits: Vec<GitHubCommit> = self
            .send(self.client.get(&url), &format!("commits of {}", repository))
            .await?
            .json()
            .await?;

        Ok(commits
            .into_iter()
            .take(limit)
            .map(|c| Commit::new(c.sha))
            .collect())
    }

    async fn get_tag_ref(&self, repository: &str, tag: &str) -> Result<String> {
        let url = self.repo_url(repository, &format!("/git/ref/tags/{}", encode_tag_path(tag)))?;
        let git_ref: GitHubRef = self
            .send(
                self.client.get(&url),
                &format!("tag ref {} of {}", tag, repository),
            )
            .await?
            .json()
            .await?;
        Ok(git_ref.object.sha)
    }

    async fn create_tag_object(
        &self,
        repository: &str,
        tag: &str,
        message: &str,
        sha: &str,
    ) -> Result<String> {
        let url = self.repo_url(repository, "/git/tags")?;
        let body = CreateTagRequest {
            tag,
            message,
            object: sha,
            object_type: "commit",
        };
        let created: GitHubTagObject = self
            .send(
                self.client.post(&url).json(&body),
                &format!("create tag {} on {}", tag, repository),
            )
            .await?
            .json()
            .await?;
        Ok(created.sha)
    }

    async fn create_ref(&self, repository: &str, ref_name: &str, sha: &str) -> Result<()> {
        let url = self.repo_url(repository, "/git/refs")?;
        let body = CreateRefRequest { ref_name, sha };
        self.send(
            self.client.post(&url).json(&body),
            &format!("create ref {} on {}", ref_name, repository),
        )
        .await?;
        Ok(())
    }
}
