//! Per-repository category assignment persistence

use dashboard_core::{CategorySet, RepoRef, WorkflowRecord};
use log::{info, warn};
use std::sync::Arc;

use crate::error::{Result, StoreError};
use crate::keys::StorageKey;
use crate::kv::KeyValueStore;

#[derive(Clone)]
pub struct CategoryStore {
    kv: Arc<dyn KeyValueStore>,
}

impl CategoryStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Stored assignment for `repo`.
    ///
    /// A value that does not decode is reported and treated as absent, which
    /// puts the dashboard back on automatic grouping.
    pub async fn load(&self, repo: &RepoRef) -> Result<Option<CategorySet>> {
        let key = StorageKey::categories(repo);
        let Some(raw) = self.kv.get(&key).await? else {
            return Ok(None);
        };
        match decode(&key, &raw) {
            Ok(set) => Ok(Some(set)),
            Err(error) => {
                warn!("{}; falling back to automatic grouping", error);
                Ok(None)
            }
        }
    }

    /// Replaces the stored assignment wholesale
    pub async fn save(&self, repo: &RepoRef, set: &CategorySet) -> Result<()> {
        let raw = serde_json::to_string(set)?;
        self.kv.set(&StorageKey::categories(repo), &raw).await
    }

    /// Regroups every workflow by its parsed group and overwrites the stored
    /// assignment. Destructive: callers confirm before calling.
    pub async fn reset(&self, repo: &RepoRef, workflows: &[WorkflowRecord]) -> Result<CategorySet> {
        let set = CategorySet::seed_from_workflows(workflows);
        self.save(repo, &set).await?;
        info!(
            "Reset categories for {} to {} groups",
            repo,
            set.len()
        );
        Ok(set)
    }

    /// Stored assignment, seeding one from the workflow names when none exists
    pub async fn load_or_seed(&self, repo: &RepoRef, workflows: &[WorkflowRecord]) -> Result<CategorySet> {
        match self.load(repo).await? {
            Some(set) => Ok(set),
            None => self.reset(repo, workflows).await,
        }
    }
}

fn decode(key: &StorageKey, raw: &str) -> Result<CategorySet> {
    serde_json::from_str(raw).map_err(|error| StoreError::Corrupt {
        key: key.to_string(),
        reason: error.to_string(),
    })
}
