use serde::Serialize;

use crate::explorer::{Explorer, FlowStatus};
use crate::github::{ContributorSummary, PageDescriptor, RepositorySummary};

/// Display label for a listing's lifecycle state.
pub fn status_label(status: FlowStatus) -> &'static str {
    match status {
        FlowStatus::Idle => "idle",
        FlowStatus::Loading => "loading",
        FlowStatus::Populated => "ready",
        FlowStatus::Failed => "failed",
    }
}

/// Plain-data copy of what the view shows, for JSON output.
#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub query: Option<String>,
    pub status: &'static str,
    pub loading: bool,
    pub page: Option<PageDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub repositories: Vec<RepositorySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<SelectedSnapshot>,
}

/// The selected repository and its contributor listing.
#[derive(Debug, Serialize)]
pub struct SelectedSnapshot {
    pub repository: RepositorySummary,
    pub status: &'static str,
    pub loading: bool,
    pub page: Option<PageDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub contributors: Vec<ContributorSummary>,
}

impl Snapshot {
    pub fn capture(explorer: &Explorer) -> Self {
        let search = explorer.search();
        let contributors = explorer.contributors();

        Snapshot {
            query: search.scope().cloned(),
            status: status_label(search.status()),
            loading: search.is_loading(),
            page: search.page().copied(),
            error: search.error().map(str::to_string),
            repositories: search.items().to_vec(),
            selected: explorer.selection().current().map(|repo| SelectedSnapshot {
                repository: repo.clone(),
                status: status_label(contributors.status()),
                loading: contributors.is_loading(),
                page: contributors.page().copied(),
                error: contributors.error().map(str::to_string),
                contributors: contributors.items().to_vec(),
            }),
        }
    }
}
