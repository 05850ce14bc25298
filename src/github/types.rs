use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit JSON `null` the same as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Owner block embedded in a repository payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Owner {
    #[serde(deserialize_with = "nullable")]
    pub login: String,
}

/// A repository as returned by the search endpoint.
/// Missing fields fall back to their defaults instead of failing the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositorySummary {
    #[serde(deserialize_with = "nullable")]
    pub id: u64,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub full_name: String,
    #[serde(deserialize_with = "nullable")]
    pub owner: Owner,
    #[serde(deserialize_with = "nullable")]
    pub html_url: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub stargazers_count: u64,
}

impl RepositorySummary {
    /// Owner/name pair used to address the repository's sub-resources.
    pub fn repo_ref(&self) -> RepoRef {
        let (fallback_owner, fallback_name) =
            self.full_name.split_once('/').unwrap_or(("", self.full_name.as_str()));

        let owner = if self.owner.login.is_empty() {
            fallback_owner
        } else {
            self.owner.login.as_str()
        };
        let name = if self.name.is_empty() {
            fallback_name
        } else {
            self.name.as_str()
        };

        RepoRef {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    /// Label shown in lists: `full_name`, or `owner/name` when the API left it out.
    pub fn label(&self) -> String {
        if self.full_name.is_empty() {
            self.repo_ref().to_string()
        } else {
            self.full_name.clone()
        }
    }
}

/// A single contributor of a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContributorSummary {
    #[serde(deserialize_with = "nullable")]
    pub id: u64,
    #[serde(deserialize_with = "nullable")]
    pub login: String,
    #[serde(deserialize_with = "nullable")]
    pub html_url: String,
    #[serde(deserialize_with = "nullable")]
    pub contributions: u64,
}

/// Body of `GET /search/repositories`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    #[serde(deserialize_with = "nullable")]
    pub total_count: u64,
    #[serde(deserialize_with = "nullable")]
    pub incomplete_results: bool,
    #[serde(deserialize_with = "nullable")]
    pub items: Vec<RepositorySummary>,
}

/// Owner login + repository name, the scope of a contributor listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// One page of results plus the raw `Link` header that came with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub link: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, link: Option<String>) -> Self {
        Self { items, link }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            link: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_full_payload() {
        let json = r#"{
            "id": 1296269,
            "name": "Hello-World",
            "full_name": "octocat/Hello-World",
            "owner": { "login": "octocat", "id": 1 },
            "html_url": "https://github.com/octocat/Hello-World",
            "description": "This your first repo!",
            "stargazers_count": 80,
            "private": false
        }"#;
        let repo: RepositorySummary = serde_json::from_str(json).unwrap();
        assert_eq!(repo.id, 1296269);
        assert_eq!(repo.owner.login, "octocat");
        assert_eq!(repo.stargazers_count, 80);
        assert_eq!(repo.description.as_deref(), Some("This your first repo!"));
    }

    #[test]
    fn test_repository_tolerates_missing_and_null_fields() {
        let json = r#"{ "id": 7, "full_name": "octo/cat", "owner": null, "html_url": null }"#;
        let repo: RepositorySummary = serde_json::from_str(json).unwrap();
        assert_eq!(repo.id, 7);
        assert!(repo.owner.login.is_empty());
        assert!(repo.html_url.is_empty());
        assert!(repo.description.is_none());
    }

    #[test]
    fn test_repo_ref_falls_back_to_full_name() {
        let repo = RepositorySummary {
            full_name: "octo/cat".to_string(),
            ..Default::default()
        };
        let repo_ref = repo.repo_ref();
        assert_eq!(repo_ref.owner, "octo");
        assert_eq!(repo_ref.name, "cat");
        assert_eq!(repo_ref.to_string(), "octo/cat");
    }

    #[test]
    fn test_label_prefers_full_name() {
        let repo = RepositorySummary {
            name: "cat".to_string(),
            full_name: "octo/cat".to_string(),
            owner: Owner {
                login: "octo".to_string(),
            },
            ..Default::default()
        };
        assert_eq!(repo.label(), "octo/cat");

        let bare = RepositorySummary {
            name: "cat".to_string(),
            owner: Owner {
                login: "octo".to_string(),
            },
            ..Default::default()
        };
        assert_eq!(bare.label(), "octo/cat");
    }

    #[test]
    fn test_search_response_without_items() {
        let response: SearchResponse = serde_json::from_str(r#"{ "total_count": 0 }"#).unwrap();
        assert!(response.items.is_empty());

        let response: SearchResponse = serde_json::from_str(r#"{ "items": null }"#).unwrap();
        assert!(response.items.is_empty());
    }

    #[test]
    fn test_contributor_payload() {
        let json = r#"[
            { "login": "octocat", "id": 1, "html_url": "https://github.com/octocat", "contributions": 32 },
            { "login": "hubot" }
        ]"#;
        let contributors: Vec<ContributorSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(contributors.len(), 2);
        assert_eq!(contributors[0].contributions, 32);
        assert_eq!(contributors[1].login, "hubot");
        assert_eq!(contributors[1].id, 0);
    }
}
