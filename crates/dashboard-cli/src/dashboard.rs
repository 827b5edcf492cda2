//! Repository-scoped dashboard operations shared by the commands

use std::sync::Arc;

use actions_client::WorkflowSource;
use anyhow::{bail, Context};
use dashboard_core::{
    CategorizationEngine, CategoryCommand, CategorySet, RenderModel, RepoRef, UnassignedPolicy,
    WorkflowId, WorkflowRecord,
};
use dashboard_store::CategoryStore;
use log::info;

/// One resolution of the listing against the stored categories
pub struct Snapshot {
    pub workflows: Vec<WorkflowRecord>,
    pub model: RenderModel,
}

/// The listing together with the (possibly freshly seeded) assignment
pub struct Assignment {
    pub workflows: Vec<WorkflowRecord>,
    pub set: CategorySet,
}

pub struct Dashboard {
    repo: RepoRef,
    source: Arc<dyn WorkflowSource>,
    categories: CategoryStore,
    engine: CategorizationEngine,
}

impl Dashboard {
    pub fn new(
        repo: RepoRef,
        source: Arc<dyn WorkflowSource>,
        categories: CategoryStore,
        unassigned: UnassignedPolicy,
    ) -> Self {
        Self {
            repo,
            source,
            categories,
            engine: CategorizationEngine::new(unassigned),
        }
    }

    pub fn repo(&self) -> &RepoRef {
        &self.repo
    }

    async fn list_workflows(&self) -> anyhow::Result<Vec<WorkflowRecord>> {
        self.source
            .list_workflows(&self.repo)
            .await
            .with_context(|| format!("failed to list workflows for {}", self.repo))
    }

    /// Reads without seeding, so a repository nobody has customized keeps
    /// automatic grouping.
    pub async fn snapshot(&self) -> anyhow::Result<Snapshot> {
        let workflows = self.list_workflows().await?;
        let stored = self.categories.load(&self.repo).await?;
        let model = self.engine.resolve(&workflows, stored.as_ref());
        Ok(Snapshot { workflows, model })
    }

    pub async fn assignment(&self) -> anyhow::Result<Assignment> {
        let workflows = self.list_workflows().await?;
        let set = self.categories.load_or_seed(&self.repo, &workflows).await?;
        Ok(Assignment { workflows, set })
    }

    /// Applies an edit to the current assignment and persists the result
    pub async fn apply(&self, command: CategoryCommand) -> anyhow::Result<Assignment> {
        let Assignment { workflows, set } = self.assignment().await?;
        let set = command.apply(&set)?;
        self.categories.save(&self.repo, &set).await?;
        info!("Applied {:?} to {}", command, self.repo);
        Ok(Assignment { workflows, set })
    }

    /// Moves the workflow named by `query` (an id or an exact name)
    pub async fn move_workflow(&self, query: &str, target: &str) -> anyhow::Result<Assignment> {
        let target = target.trim();
        if target.is_empty() {
            bail!("target category must not be empty");
        }
        let Assignment { workflows, set } = self.assignment().await?;
        let id = find_workflow(&workflows, query)?;
        let set = CategoryCommand::MoveWorkflow {
            id,
            target: target.to_string(),
        }
        .apply(&set)?;
        self.categories.save(&self.repo, &set).await?;
        Ok(Assignment { workflows, set })
    }

    pub async fn reset(&self) -> anyhow::Result<Assignment> {
        let workflows = self.list_workflows().await?;
        let set = self.categories.reset(&self.repo, &workflows).await?;
        Ok(Assignment { workflows, set })
    }
}

/// Id match first, then exact raw name
pub fn find_workflow(workflows: &[WorkflowRecord], query: &str) -> anyhow::Result<WorkflowId> {
    let query = query.trim();
    if let Some(workflow) = workflows.iter().find(|workflow| workflow.id.as_str() == query) {
        return Ok(workflow.id.clone());
    }

    let mut named = workflows.iter().filter(|workflow| workflow.name == query);
    match (named.next(), named.next()) {
        (Some(workflow), None) => Ok(workflow.id.clone()),
        (Some(_), Some(_)) => bail!("several workflows are named {query:?}; use the id instead"),
        (None, _) => bail!("no workflow with id or name {query:?}"),
    }
}

/// `--repo` or `--page`, falling back to the configured repository
pub fn resolve_repo(
    repo: Option<&str>,
    page: Option<&str>,
    configured: Option<&str>,
) -> anyhow::Result<RepoRef> {
    match (repo, page) {
        (Some(_), Some(_)) => bail!("--repo and --page are mutually exclusive"),
        (Some(repo), None) => repo
            .parse()
            .with_context(|| format!("expected OWNER/REPO, got {repo:?}")),
        (None, Some(page)) => Ok(RepoRef::from_page_path(page)?),
        (None, None) => match configured {
            Some(repo) => repo
                .parse()
                .with_context(|| format!("configured repo {repo:?} is not OWNER/REPO")),
            None => bail!("no repository given; pass --repo OWNER/REPO or --page /OWNER/REPO/actions"),
        },
    }
}
