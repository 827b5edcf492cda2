//! Storage keys
//!
//! Keys are made of segments rather than concatenated strings, so
//! `("a_b", "c")` and `("a", "b_c")` never collide.

use dashboard_core::RepoRef;
use std::fmt;

const CATEGORIES_NAMESPACE: &str = "categories";
const PREFERENCES_NAMESPACE: &str = "preferences";
const DARK_MODE: &str = "dark_mode";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey {
    segments: Vec<String>,
}

impl StorageKey {
    /// Category assignment of one repository
    pub fn categories(repo: &RepoRef) -> Self {
        Self {
            segments: vec![
                CATEGORIES_NAMESPACE.to_string(),
                repo.owner.clone(),
                repo.repo.clone(),
            ],
        }
    }

    /// Dark mode flag, shared by every repository
    pub fn dark_mode() -> Self {
        Self {
            segments: vec![PREFERENCES_NAMESPACE.to_string(), DARK_MODE.to_string()],
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}
