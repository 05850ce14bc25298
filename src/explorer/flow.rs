use tracing::{debug, warn};

use crate::github::{parse_link_header, GitHubError, Page, PageDescriptor};

/// Lifecycle of one paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStatus {
    Idle,
    Loading,
    Populated,
    Failed,
}

/// Issued when a request starts; handed back with its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    page: u32,
}

/// What happened to a completed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Populated { items: usize },
    Failed,
    /// A newer request for the same listing was already issued.
    Discarded,
}

/// State of one paginated listing: what it is scoped to, the current page of
/// items, and where that page sits among its neighbours.
#[derive(Debug)]
pub struct PagedFlow<S, T> {
    scope: Option<S>,
    items: Vec<T>,
    page: Option<PageDescriptor>,
    status: FlowStatus,
    error: Option<String>,
    generation: u64,
    discard_stale: bool,
}

impl<S, T> PagedFlow<S, T> {
    pub fn new(discard_stale: bool) -> Self {
        Self {
            scope: None,
            items: Vec::new(),
            page: None,
            status: FlowStatus::Idle,
            error: None,
            generation: 0,
            discard_stale,
        }
    }

    pub fn scope(&self) -> Option<&S> {
        self.scope.as_ref()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn page(&self) -> Option<&PageDescriptor> {
        self.page.as_ref()
    }

    pub fn status(&self) -> FlowStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == FlowStatus::Loading
    }

    /// Message of the most recent failure, while the flow is in `Failed`.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Enter Loading for `page` of `scope`. Prior items and page are dropped
    /// immediately so stale rows never render while the request is out.
    pub fn begin(&mut self, scope: S, page: u32) -> Ticket {
        self.generation += 1;
        self.scope = Some(scope);
        self.items.clear();
        self.page = None;
        self.error = None;
        self.status = FlowStatus::Loading;

        Ticket {
            generation: self.generation,
            page,
        }
    }

    /// Apply the result of the request identified by `ticket`.
    ///
    /// Always leaves Loading when the result is applied. A result for an
    /// older ticket is dropped when stale discarding is on; otherwise the
    /// last response to arrive wins.
    pub fn settle(&mut self, ticket: Ticket, result: Result<Page<T>, GitHubError>) -> Outcome {
        if self.discard_stale && ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                latest = self.generation,
                page = ticket.page,
                "discarding stale response"
            );
            return Outcome::Discarded;
        }

        match result {
            Ok(page) => {
                let descriptor =
                    parse_link_header(page.link.as_deref().unwrap_or_default(), ticket.page);
                self.items = page.items;
                self.page = Some(descriptor);
                self.error = None;
                self.status = FlowStatus::Populated;
                Outcome::Populated {
                    items: self.items.len(),
                }
            }
            Err(err) => {
                warn!(error = %err, page = ticket.page, "request failed");
                self.items.clear();
                self.page = None;
                self.error = Some(err.to_string());
                self.status = FlowStatus::Failed;
                Outcome::Failed
            }
        }
    }
}
