//! Workflow records as returned by the upstream listing API

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::name_parser::{self, ParsedName};
use crate::repo::RepoRef;

/// Opaque workflow identifier.
///
/// The listing API hands out numeric ids while persisted category data may
/// carry them as strings, so ids are always held and compared as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WorkflowId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawWorkflowId {
    Unsigned(u64),
    Signed(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for WorkflowId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = match RawWorkflowId::deserialize(deserializer)? {
            RawWorkflowId::Unsigned(value) => value.to_string(),
            RawWorkflowId::Signed(value) => value.to_string(),
            RawWorkflowId::Text(value) => value,
        };
        Ok(WorkflowId(id))
    }
}

impl WorkflowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for WorkflowId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for WorkflowId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for WorkflowId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&WorkflowId> for WorkflowId {
    fn from(value: &WorkflowId) -> Self {
        value.clone()
    }
}

/// Workflow state as reported by the listing API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    #[default]
    Active,
    Deleted,
    DisabledFork,
    DisabledInactivity,
    DisabledManually,
    #[serde(other)]
    Unknown,
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Active => "active",
            WorkflowState::Deleted => "deleted",
            WorkflowState::DisabledFork => "disabled_fork",
            WorkflowState::DisabledInactivity => "disabled_inactivity",
            WorkflowState::DisabledManually => "disabled_manually",
            WorkflowState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single workflow definition from the listing API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRecord {
    pub id: WorkflowId,

    /// Raw label, possibly encoding "Group - Category - Remainder"
    pub name: String,

    /// Source file path, e.g. `.github/workflows/ci.yml`
    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub state: WorkflowState,

    #[serde(default)]
    pub badge_url: Option<String>,

    #[serde(default)]
    pub html_url: String,
}

impl WorkflowRecord {
    pub fn new(id: impl Into<WorkflowId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            path: String::new(),
            state: WorkflowState::Active,
            badge_url: None,
            html_url: String::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_state(mut self, state: WorkflowState) -> Self {
        self.state = state;
        self
    }

    pub fn with_badge_url(mut self, badge_url: impl Into<String>) -> Self {
        self.badge_url = Some(badge_url.into());
        self
    }

    pub fn with_html_url(mut self, html_url: impl Into<String>) -> Self {
        self.html_url = html_url.into();
        self
    }

    pub fn is_active(&self) -> bool {
        self.state == WorkflowState::Active
    }

    /// Badge endpoint, treating an empty string as absent
    pub fn badge_url(&self) -> Option<&str> {
        self.badge_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    pub fn parsed_name(&self) -> ParsedName {
        name_parser::parse(&self.name)
    }

    /// Last segment of the workflow file path
    pub fn file_name(&self) -> Option<&str> {
        self.path.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Link to the workflow's run listing inside the repository.
    ///
    /// Falls back to `html_url` when the record carries no file path.
    pub fn link(&self, repo: &RepoRef) -> String {
        match self.file_name() {
            Some(file_name) => format!("{}/workflows/{}", repo.actions_path(), file_name),
            None => self.html_url.clone(),
        }
    }
}
