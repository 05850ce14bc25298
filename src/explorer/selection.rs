use crate::github::RepositorySummary;

/// The one repository whose contributors are shown, if any.
#[derive(Debug, Default)]
pub struct Selection {
    current: Option<RepositorySummary>,
}

impl Selection {
    pub fn current(&self) -> Option<&RepositorySummary> {
        self.current.as_ref()
    }

    pub fn is_selected(&self, repo: &RepositorySummary) -> bool {
        self.current.as_ref().is_some_and(|current| current.id == repo.id)
    }

    /// Select `repo`. Returns false, and changes nothing, when it is already selected.
    pub fn select(&mut self, repo: RepositorySummary) -> bool {
        if self.is_selected(&repo) {
            return false;
        }
        self.current = Some(repo);
        true
    }
}
