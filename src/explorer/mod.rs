pub mod flow;
pub mod selection;

pub use flow::{FlowStatus, Outcome, PagedFlow, Ticket};
pub use selection::Selection;

use tracing::{debug, info, info_span, Instrument};

use crate::github::{
    ContributorSummary, GitHubApi, GitHubError, Page, PageDescriptor, PageTarget, RepoRef,
    RepositorySummary,
};

pub type SearchFlow = PagedFlow<String, RepositorySummary>;
pub type ContributorFlow = PagedFlow<RepoRef, ContributorSummary>;

/// A fetch the driver has to perform on behalf of the explorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Search {
        ticket: Ticket,
        query: String,
        page: u32,
    },
    Contributors {
        ticket: Ticket,
        repo: RepoRef,
        page: u32,
    },
}

/// The result of a [`Request`], to be fed back through [`Explorer::complete`].
#[derive(Debug)]
pub enum Completion {
    Search {
        ticket: Ticket,
        result: Result<Page<RepositorySummary>, GitHubError>,
    },
    Contributors {
        ticket: Ticket,
        result: Result<Page<ContributorSummary>, GitHubError>,
    },
}

/// View state of one browsing session: the repository search, the selected
/// repository, and that repository's contributors.
///
/// Every user action is a synchronous method returning the request to issue,
/// if any. Network I/O happens elsewhere and its result comes back through
/// [`Explorer::complete`].
#[derive(Debug)]
pub struct Explorer {
    search: SearchFlow,
    contributors: ContributorFlow,
    selection: Selection,
}

impl Explorer {
    pub fn new(discard_stale: bool) -> Self {
        Self {
            search: PagedFlow::new(discard_stale),
            contributors: PagedFlow::new(discard_stale),
            selection: Selection::default(),
        }
    }

    pub fn search(&self) -> &SearchFlow {
        &self.search
    }

    pub fn contributors(&self) -> &ContributorFlow {
        &self.contributors
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Submit the search form. Blank input is ignored.
    pub fn submit(&mut self, input: &str) -> Option<Request> {
        self.submit_page(input, 1)
    }

    /// Submit the search form starting at `page` instead of the first page.
    pub fn submit_page(&mut self, input: &str, page: u32) -> Option<Request> {
        let query = input.trim();
        if query.is_empty() {
            debug!("ignoring blank search");
            return None;
        }
        if page == 0 {
            debug!("ignoring search for page 0");
            return None;
        }
        Some(self.begin_search(query.to_string(), page))
    }

    /// Use a pagination control of the repository list.
    pub fn navigate_search(&mut self, target: PageTarget) -> Option<Request> {
        let query = self.search.scope()?.clone();
        let page = resolve(self.search.page(), target)?;
        Some(self.begin_search(query, page))
    }

    /// Open the repository at `index` (zero-based) of the current page.
    pub fn open(&mut self, index: usize) -> Option<Request> {
        let repo = self.search.items().get(index)?.clone();
        self.select(repo)
    }

    /// Select a repository; fetches its first contributor page unless it is
    /// already the selected one.
    pub fn select(&mut self, repo: RepositorySummary) -> Option<Request> {
        let repo_ref = repo.repo_ref();
        if !self.selection.select(repo) {
            debug!(repo = %repo_ref, "repository already selected");
            return None;
        }
        info!(repo = %repo_ref, "selected repository");
        Some(self.begin_contributors(repo_ref, 1))
    }

    /// Use a pagination control of the selected repository's contributors.
    pub fn navigate_contributors(&mut self, target: PageTarget) -> Option<Request> {
        let repo = self.selection.current()?.repo_ref();
        let page = resolve(self.contributors.page(), target)?;
        Some(self.begin_contributors(repo, page))
    }

    /// Apply a finished request to the matching listing.
    pub fn complete(&mut self, completion: Completion) -> Outcome {
        match completion {
            Completion::Search { ticket, result } => self.search.settle(ticket, result),
            Completion::Contributors { ticket, result } => {
                self.contributors.settle(ticket, result)
            }
        }
    }

    fn begin_search(&mut self, query: String, page: u32) -> Request {
        let ticket = self.search.begin(query.clone(), page);
        Request::Search {
            ticket,
            query,
            page,
        }
    }

    fn begin_contributors(&mut self, repo: RepoRef, page: u32) -> Request {
        let ticket = self.contributors.begin(repo.clone(), page);
        Request::Contributors { ticket, repo, page }
    }
}

/// Page to fetch for `target`. An explicit page number works even when the
/// listing has no descriptor yet, e.g. after a failed request.
fn resolve(page: Option<&PageDescriptor>, target: PageTarget) -> Option<u32> {
    let resolved = match (page, target) {
        (_, PageTarget::Page(n)) => (n > 0).then_some(n),
        (Some(page), target) => page.resolve(target),
        (None, _) => None,
    };
    if resolved.is_none() {
        debug!(?target, "pagination control not available");
    }
    resolved
}

/// Perform `request` against the API. Never fails: errors travel inside the
/// returned [`Completion`] so the explorer can absorb them.
pub async fn execute(api: &dyn GitHubApi, request: Request) -> Completion {
    match request {
        Request::Search {
            ticket,
            query,
            page,
        } => {
            let result = api
                .search_repositories(&query, page)
                .instrument(info_span!("search", query = %query, page))
                .await;
            Completion::Search { ticket, result }
        }
        Request::Contributors { ticket, repo, page } => {
            let result = api
                .list_contributors(&repo, page)
                .instrument(info_span!("contributors", repo = %repo, page))
                .await;
            Completion::Contributors { ticket, result }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::mock::{MockGitHub, FAILING_QUERY};
    use crate::github::types::Owner;

    async fn run(explorer: &mut Explorer, api: &MockGitHub, request: Option<Request>) -> Outcome {
        let request = request.expect("a request should have been issued");
        let completion = execute(api, request).await;
        explorer.complete(completion)
    }

    #[test]
    fn test_blank_query_issues_no_request() {
        let mut explorer = Explorer::new(true);
        assert!(explorer.submit("").is_none());
        assert!(explorer.submit("   \t ").is_none());
        assert_eq!(explorer.search().status(), FlowStatus::Idle);
    }

    #[test]
    fn test_submit_trims_and_starts_at_page_one() {
        let mut explorer = Explorer::new(true);
        match explorer.submit("  octo  ") {
            Some(Request::Search { query, page, .. }) => {
                assert_eq!(query, "octo");
                assert_eq!(page, 1);
            }
            other => panic!("unexpected request: {:?}", other),
        }
        assert!(explorer.search().is_loading());
        assert_eq!(explorer.search().scope().map(String::as_str), Some("octo"));
    }

    #[tokio::test]
    async fn test_submit_page_starts_at_requested_page() {
        let api = MockGitHub::new(10);
        let mut explorer = Explorer::new(true);
        assert!(explorer.submit_page(" ", 3).is_none());
        assert!(explorer.submit_page("octo", 0).is_none());

        let request = explorer.submit_page("octo", 3);
        assert!(matches!(request, Some(Request::Search { page: 3, .. })));
        run(&mut explorer, &api, request).await;

        assert_eq!(api.search_calls(), 1);
        let descriptor = explorer.search().page().unwrap();
        assert_eq!(descriptor.current, 3);
        assert_eq!(descriptor.prev, Some(2));
    }

    #[test]
    fn test_navigation_needs_a_search() {
        let mut explorer = Explorer::new(true);
        assert!(explorer.navigate_search(PageTarget::Next).is_none());
        assert!(explorer.navigate_contributors(PageTarget::Next).is_none());
    }

    #[tokio::test]
    async fn test_search_success_mirrors_response() {
        let api = MockGitHub::new(10);
        let mut explorer = Explorer::new(true);
        let request = explorer.submit("octo");
        let outcome = run(&mut explorer, &api, request).await;

        let expected = api.search_repositories("octo", 1).await.unwrap();
        assert_eq!(outcome, Outcome::Populated { items: 10 });
        assert_eq!(explorer.search().items(), expected.items.as_slice());
        assert_eq!(explorer.search().page().unwrap().current, 1);
        assert!(!explorer.search().is_loading());
    }

    #[tokio::test]
    async fn test_search_failure_ends_empty() {
        let api = MockGitHub::new(10);
        let mut explorer = Explorer::new(true);
        let request = explorer.submit(FAILING_QUERY);
        let outcome = run(&mut explorer, &api, request).await;

        assert_eq!(outcome, Outcome::Failed);
        assert!(explorer.search().items().is_empty());
        assert!(!explorer.search().is_loading());
        assert_eq!(explorer.search().status(), FlowStatus::Failed);
    }

    #[tokio::test]
    async fn test_next_page_replaces_items_and_descriptor() {
        let api = MockGitHub::new(10);
        let mut explorer = Explorer::new(true);
        let request = explorer.submit("octo");
        run(&mut explorer, &api, request).await;

        let first_page = explorer.search().items().to_vec();
        let descriptor = *explorer.search().page().unwrap();
        assert_eq!(descriptor.next, Some(2));
        assert!(descriptor.prev.is_none());

        let request = explorer.navigate_search(PageTarget::Next);
        assert!(matches!(request, Some(Request::Search { page: 2, .. })));
        assert!(explorer.search().items().is_empty());
        run(&mut explorer, &api, request).await;

        let descriptor = *explorer.search().page().unwrap();
        assert_eq!(descriptor.current, 2);
        assert_eq!(descriptor.prev, Some(1));
        assert_eq!(descriptor.first, Some(1));
        assert_ne!(explorer.search().items(), first_page.as_slice());
    }

    #[tokio::test]
    async fn test_unavailable_control_issues_no_request() {
        let api = MockGitHub::new(10);
        let mut explorer = Explorer::new(true);
        let request = explorer.submit("octo");
        run(&mut explorer, &api, request).await;

        assert!(explorer.navigate_search(PageTarget::Prev).is_none());
        assert_eq!(explorer.search().status(), FlowStatus::Populated);
        assert_eq!(api.search_calls(), 1);
    }

    #[tokio::test]
    async fn test_open_fetches_contributors_once() {
        let api = MockGitHub::new(10);
        let mut explorer = Explorer::new(true);
        let request = explorer.submit("octo");
        run(&mut explorer, &api, request).await;

        let request = explorer.open(0);
        assert!(matches!(request, Some(Request::Contributors { page: 1, .. })));
        assert!(explorer.contributors().is_loading());
        run(&mut explorer, &api, request).await;
        assert_eq!(api.contributor_calls(), 1);

        assert!(explorer.open(0).is_none());
        assert!(!explorer.contributors().is_loading());
        assert_eq!(api.contributor_calls(), 1);
    }

    #[tokio::test]
    async fn test_selecting_another_repository_resets_contributors() {
        let api = MockGitHub::new(10);
        let mut explorer = Explorer::new(true);
        let request = explorer.submit("octo");
        run(&mut explorer, &api, request).await;

        let first = explorer.search().items()[0].clone();
        let expected = api.list_contributors(&first.repo_ref(), 1).await.unwrap();
        let request = explorer.open(0);
        run(&mut explorer, &api, request).await;
        assert_eq!(explorer.contributors().items().len(), expected.items.len());

        let request = explorer.open(1);
        assert!(request.is_some());
        assert!(explorer.contributors().items().is_empty());
        assert!(explorer.contributors().is_loading());
        assert_eq!(
            explorer.contributors().scope(),
            Some(&explorer.search().items()[1].repo_ref())
        );
    }

    #[tokio::test]
    async fn test_open_out_of_range() {
        let mut explorer = Explorer::new(true);
        assert!(explorer.open(3).is_none());
    }

    #[tokio::test]
    async fn test_contributor_pagination_uses_selected_repository() {
        let api = MockGitHub::new(1);
        let mut explorer = Explorer::new(true);
        let repo = named_repository(42, "octo", "cat");
        assert!(MockGitHub::total_contributors(&repo.repo_ref()) > 1);

        let request = explorer.select(repo);
        run(&mut explorer, &api, request).await;
        assert_eq!(explorer.contributors().page().unwrap().next, Some(2));

        match explorer.navigate_contributors(PageTarget::Next) {
            Some(Request::Contributors { repo, page, .. }) => {
                assert_eq!(repo.to_string(), "octo/cat");
                assert_eq!(page, 2);
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_late_search_response_is_discarded() {
        let api = MockGitHub::new(10);
        let mut explorer = Explorer::new(true);
        let stale = explorer.submit("octo").unwrap();
        let fresh = explorer.submit("rust").unwrap();

        let fresh_completion = execute(&api, fresh).await;
        assert!(matches!(
            explorer.complete(fresh_completion),
            Outcome::Populated { .. }
        ));
        let stale_completion = execute(&api, stale).await;
        assert_eq!(explorer.complete(stale_completion), Outcome::Discarded);

        assert!(explorer.search().items()[0].name.starts_with("rust"));
    }

    fn named_repository(id: u64, owner: &str, name: &str) -> RepositorySummary {
        RepositorySummary {
            id,
            name: name.to_string(),
            full_name: format!("{}/{}", owner, name),
            owner: Owner {
                login: owner.to_string(),
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_contributors_of_previous_selection_are_discarded() {
        let api = MockGitHub::new(10);
        let mut explorer = Explorer::new(true);
        let first = explorer.select(named_repository(1, "octo", "cat")).unwrap();
        let second = explorer.select(named_repository(2, "rust", "lang")).unwrap();

        let stale = execute(&api, first).await;
        assert_eq!(explorer.complete(stale), Outcome::Discarded);
        assert!(explorer.contributors().items().is_empty());
        assert!(explorer.contributors().is_loading());

        let fresh = execute(&api, second).await;
        assert!(matches!(explorer.complete(fresh), Outcome::Populated { .. }));
        assert_eq!(explorer.selection().current().map(|r| r.id), Some(2));
    }

    #[tokio::test]
    async fn test_contributors_of_previous_selection_land_without_discarding() {
        let api = MockGitHub::new(10);
        let mut explorer = Explorer::new(false);
        let cat = named_repository(1, "octo", "cat");
        let expected = api.list_contributors(&cat.repo_ref(), 1).await.unwrap();

        let first = explorer.select(cat).unwrap();
        explorer.select(named_repository(2, "rust", "lang")).unwrap();

        let late = execute(&api, first).await;
        assert!(matches!(explorer.complete(late), Outcome::Populated { .. }));
        assert_eq!(explorer.contributors().items(), expected.items.as_slice());
        assert!(!explorer.contributors().is_loading());
        assert_eq!(explorer.selection().current().map(|r| r.id), Some(2));
        assert_eq!(
            explorer.contributors().scope().map(|r| r.to_string()),
            Some("rust/lang".to_string())
        );
    }

    #[tokio::test]
    async fn test_explicit_page_target() {
        let api = MockGitHub::new(10);
        let mut explorer = Explorer::new(true);
        let request = explorer.submit("octo");
        run(&mut explorer, &api, request).await;

        let request = explorer.navigate_search(PageTarget::Page(3));
        run(&mut explorer, &api, request).await;
        assert_eq!(explorer.search().page().map(|p| p.current), Some(3));
        assert!(explorer.navigate_search(PageTarget::Page(0)).is_none());
    }
}
