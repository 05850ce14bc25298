//! Offline stand-in for the GitHub API.
//!
//! Serves deterministic synthetic repositories and contributors, with `Link`
//! headers shaped like GitHub's, so the whole explorer can run without a
//! network connection or token.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::types::{ContributorSummary, Owner, Page, RepoRef, RepositorySummary};
use super::{name_query, GitHubApi, GitHubError};

const MOCK_API_URL: &str = "https://api.github.com";

/// Queries containing this word fail with a 503, to exercise the error path.
pub const FAILING_QUERY: &str = "unavailable";

pub struct MockGitHub {
    per_page: u32,
    search_calls: AtomicUsize,
    contributor_calls: AtomicUsize,
}

impl MockGitHub {
    pub fn new(per_page: u32) -> Self {
        Self {
            per_page: per_page.clamp(1, 100),
            search_calls: AtomicUsize::new(0),
            contributor_calls: AtomicUsize::new(0),
        }
    }

    #[cfg(test)]
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    pub fn contributor_calls(&self) -> usize {
        self.contributor_calls.load(Ordering::SeqCst)
    }

    /// Total matches for a query; stable so paging is reproducible.
    pub fn total_repositories(query: &str) -> u32 {
        let query = query.trim();
        if query.is_empty() {
            return 0;
        }
        let seed: u32 = query.bytes().map(u32::from).sum();
        seed % 90 + query.len() as u32 * 3
    }

    /// Total contributors for a repository; some repositories have none.
    pub fn total_contributors(repo: &RepoRef) -> u32 {
        let seed: u64 = repo.to_string().bytes().map(u64::from).sum();
        (seed % 37) as u32
    }

    fn page_window(&self, total: u32, page: u32) -> (std::ops::Range<u32>, u32) {
        let last_page = total.div_ceil(self.per_page).max(1);
        let start = (page.saturating_sub(1)).saturating_mul(self.per_page).min(total);
        let end = start.saturating_add(self.per_page).min(total);
        (start..end, last_page)
    }

    fn repository(query: &str, index: u32) -> RepositorySummary {
        let seed: u64 = query.bytes().map(u64::from).sum();
        let owner = format!("{}-org{}", query, index % 4);
        let name = format!("{}-{}", query, index + 1);
        RepositorySummary {
            id: seed * 1000 + u64::from(index) + 1,
            full_name: format!("{}/{}", owner, name),
            html_url: format!("https://github.com/{}/{}", owner, name),
            name,
            owner: Owner { login: owner },
            description: Some(format!("Synthetic result #{} for \"{}\"", index + 1, query)),
            stargazers_count: u64::from(10_000 / (index + 1)),
        }
    }

    fn contributor(repo: &RepoRef, index: u32) -> ContributorSummary {
        let login = format!("{}-dev{}", repo.name, index + 1);
        ContributorSummary {
            id: 500_000 + u64::from(index),
            html_url: format!("https://github.com/{}", login),
            login,
            contributions: u64::from(500 / (index + 1)),
        }
    }
}

/// Build a GitHub-style `Link` header for `page` of `last_page`.
fn link_header(base: &str, page: u32, last_page: u32) -> Option<String> {
    let mut entries = Vec::new();
    let entry = |target: u32, rel: &str| format!("<{}&page={}>; rel=\"{}\"", base, target, rel);

    if page > 1 {
        entries.push(entry(page - 1, "prev"));
    }
    if page < last_page {
        entries.push(entry(page + 1, "next"));
        entries.push(entry(last_page, "last"));
    }
    if page > 1 {
        entries.push(entry(1, "first"));
    }

    if entries.is_empty() {
        None
    } else {
        Some(entries.join(", "))
    }
}

#[async_trait]
impl GitHubApi for MockGitHub {
    async fn search_repositories(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Page<RepositorySummary>, GitHubError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if query.contains(FAILING_QUERY) {
            return Err(GitHubError::Status {
                status: 503,
                endpoint: "/search/repositories".to_string(),
            });
        }

        let query = query.trim();
        let (window, last_page) = self.page_window(Self::total_repositories(query), page);
        let items = window.map(|index| Self::repository(query, index)).collect();
        let base = format!(
            "{}/search/repositories?q={}&sort=stars&per_page={}",
            MOCK_API_URL,
            name_query(query).replace(' ', "+"),
            self.per_page
        );

        Ok(Page::new(items, link_header(&base, page, last_page)))
    }

    async fn list_contributors(
        &self,
        repo: &RepoRef,
        page: u32,
    ) -> Result<Page<ContributorSummary>, GitHubError> {
        self.contributor_calls.fetch_add(1, Ordering::SeqCst);

        let total = Self::total_contributors(repo);
        if total == 0 {
            return Ok(Page::empty());
        }

        let (window, last_page) = self.page_window(total, page);
        let items = window.map(|index| Self::contributor(repo, index)).collect();
        let base = format!(
            "{}/repos/{}/contributors?per_page={}",
            MOCK_API_URL, repo, self.per_page
        );

        Ok(Page::new(items, link_header(&base, page, last_page)))
    }
}
