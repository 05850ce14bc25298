pub mod link;
pub mod mock;
pub mod types;

pub use link::{parse_link_header, PageDescriptor, PageTarget};
pub use types::{ContributorSummary, Page, RepoRef, RepositorySummary};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT, LINK, USER_AGENT};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use types::SearchResponse;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitHub API returned {status} for {endpoint}")]
    Status { status: u16, endpoint: String },
}

/// The two GitHub calls the explorer needs.
/// Implementations must be Send + Sync so requests can run on spawned tasks.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Repositories whose name matches `query`, one page at a time.
    async fn search_repositories(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Page<RepositorySummary>, GitHubError>;

    /// Contributors of `repo`, one page at a time.
    async fn list_contributors(
        &self,
        repo: &RepoRef,
        page: u32,
    ) -> Result<Page<ContributorSummary>, GitHubError>;
}

/// GitHub REST client backed by reqwest.
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    user_agent: String,
    token: Option<String>,
    per_page: u32,
    sort: String,
}

impl GitHubClient {
    pub fn new(config: &Config) -> Self {
        let token = config.github_token();
        if token.is_none() {
            warn!("no GitHub token configured; using unauthenticated rate limits");
        }

        Self {
            http: reqwest::Client::new(),
            api_url: config.api_url().to_string(),
            user_agent: config.user_agent().to_string(),
            token,
            per_page: config.per_page(),
            sort: config.search.sort.clone(),
        }
    }

    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<reqwest::Response>, GitHubError> {
        let url = format!("{}{}", self.api_url, path);
        let mut request = self
            .http
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "application/vnd.github+json")
            .query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "response received");

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(GitHubError::Status {
                status: status.as_u16(),
                endpoint: path.to_string(),
            });
        }
        Ok(Some(response))
    }
}

fn link_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(LINK)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Search qualifier restricting matches to repository names.
pub fn name_query(query: &str) -> String {
    format!("{} in:name", query.trim())
}

#[async_trait]
impl GitHubApi for GitHubClient {
    #[instrument(skip(self), fields(per_page = self.per_page))]
    async fn search_repositories(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Page<RepositorySummary>, GitHubError> {
        let params = [
            ("q", name_query(query)),
            ("sort", self.sort.clone()),
            ("per_page", self.per_page.to_string()),
            ("page", page.to_string()),
        ];

        let Some(response) = self.get("/search/repositories", &params).await? else {
            return Ok(Page::empty());
        };
        let link = link_header(response.headers());
        let body = response.json::<SearchResponse>().await?;
        debug!(
            items = body.items.len(),
            total = body.total_count,
            incomplete = body.incomplete_results,
            "decoded search page"
        );

        Ok(Page::new(body.items, link))
    }

    #[instrument(skip(self), fields(repo = %repo, per_page = self.per_page))]
    async fn list_contributors(
        &self,
        repo: &RepoRef,
        page: u32,
    ) -> Result<Page<ContributorSummary>, GitHubError> {
        let path = format!("/repos/{}/{}/contributors", repo.owner, repo.name);
        let params = [
            ("per_page", self.per_page.to_string()),
            ("page", page.to_string()),
        ];

        // 204 means the repository has no commits yet.
        let Some(response) = self.get(&path, &params).await? else {
            debug!("repository has no contributors");
            return Ok(Page::empty());
        };
        let link = link_header(response.headers());
        let items = response.json::<Vec<ContributorSummary>>().await?;
        debug!(items = items.len(), "decoded contributor page");

        Ok(Page::new(items, link))
    }
}
