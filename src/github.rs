use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use url::Url;

use crate::{
    error::FetchError,
    types::{PageSource, PullRequest, PullState, Repo, SortKey},
};

const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Reads the GitHub API token from the environment.
///
/// The token is sourced from `GITHUB_OAUTH_TOKEN` only; there is
/// deliberately no flag for it.
pub fn github_token() -> Result<String> {
    std::env::var("GITHUB_OAUTH_TOKEN")
        .context("GITHUB_OAUTH_TOKEN must be set to query the GitHub API")
}

/// Live GitHub client serving pages from the pull-request list endpoint.
///
/// Each [`fetch_page`](PageSource::fetch_page) call issues exactly one
/// authenticated GET. There is no retry or backoff; a transport failure
/// propagates to the caller and ends the run.
pub struct GitHub {
    client: reqwest::Client,
    pulls_url: Url,
    token: String,
}

impl GitHub {
    pub fn new(repo: &Repo, token: String) -> Result<Self> {
        Self::with_base_url(repo, token, DEFAULT_API_BASE)
    }

    /// Like [`GitHub::new`] but against an alternate API base URL, which is
    /// how tests point the client at a local mock server.
    pub fn with_base_url(repo: &Repo, token: String, base: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("prdigest/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        let pulls_url = Url::parse(base)
            .with_context(|| format!("Invalid API base URL: '{base}'"))?
            .join(&format!("repos/{}/{}/pulls", repo.owner(), repo.name()))
            .with_context(|| format!("Cannot build list endpoint for {repo}"))?;

        Ok(Self {
            client,
            pulls_url,
            token,
        })
    }
}

#[async_trait]
impl PageSource for GitHub {
    async fn fetch_page(
        &self,
        state: PullState,
        sort: SortKey,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<PullRequest>, FetchError> {
        let mut url = self.pulls_url.clone();
        url.query_pairs_mut()
            .append_pair("state", state.as_str())
            .append_pair("sort", sort.as_str())
            .append_pair("direction", "desc")
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());

        let response = self
            .client
            .get(url.clone())
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
