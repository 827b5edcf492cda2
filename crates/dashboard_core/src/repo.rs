//! Repository references and page activation

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PageNotRecognized;

static ACTIONS_PAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/([^/?#]+)/([^/?#]+)/actions(?:[/?#]|$)").expect("actions page pattern")
});

/// An `(owner, repo)` pair scoping listings and persisted state
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Activates on a workflow listing page path such as `/octo/hello/actions`.
    ///
    /// Deeper paths (`/octo/hello/actions/workflows/ci.yml`) also match. A full
    /// page URL is accepted and reduced to its path first.
    pub fn from_page_path(location: &str) -> Result<Self, PageNotRecognized> {
        let path = strip_origin(location.trim());
        ACTIONS_PAGE
            .captures(path)
            .map(|captures| RepoRef::new(&captures[1], &captures[2]))
            .ok_or_else(|| PageNotRecognized {
                path: location.to_string(),
            })
    }

    /// `/{owner}/{repo}/actions`
    pub fn actions_path(&self) -> String {
        format!("/{}/{}/actions", self.owner, self.repo)
    }
}

fn strip_origin(location: &str) -> &str {
    match location.find("://") {
        Some(scheme_end) => {
            let rest = &location[scheme_end + 3..];
            rest.find('/').map(|index| &rest[index..]).unwrap_or("/")
        }
        None => location,
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoRef {
    type Err = PageNotRecognized;

    /// Parses `owner/repo`
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.trim().split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty() => {
                Ok(RepoRef::new(owner, repo))
            }
            _ => Err(PageNotRecognized {
                path: value.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_path_matches() {
        let repo = RepoRef::from_page_path("/octo/hello/actions").unwrap();
        assert_eq!(repo, RepoRef::new("octo", "hello"));
    }

    #[test]
    fn test_deeper_page_path_matches() {
        let repo = RepoRef::from_page_path("/octo/hello/actions/workflows/ci.yml").unwrap();
        assert_eq!(repo.to_string(), "octo/hello");
    }

    #[test]
    fn test_full_url_matches() {
        let repo = RepoRef::from_page_path("https://github.com/octo/hello/actions?query=x").unwrap();
        assert_eq!(repo, RepoRef::new("octo", "hello"));
    }

    #[test]
    fn test_other_pages_are_not_recognized() {
        for path in ["/octo/hello", "/octo/hello/pulls", "/octo/hello/actionsfoo", "/octo", ""] {
            let err = RepoRef::from_page_path(path).unwrap_err();
            assert_eq!(err.path, path);
        }
    }

    #[test]
    fn test_owner_repo_from_str() {
        assert_eq!("octo/hello".parse::<RepoRef>().unwrap(), RepoRef::new("octo", "hello"));
        assert!("octo".parse::<RepoRef>().is_err());
        assert!("octo/".parse::<RepoRef>().is_err());
        assert!("octo/hello/extra".parse::<RepoRef>().is_err());
    }

    #[test]
    fn test_actions_path() {
        assert_eq!(RepoRef::new("octo", "hello").actions_path(), "/octo/hello/actions");
    }
}
