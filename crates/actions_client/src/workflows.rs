//! Paginated workflow listing

use async_trait::async_trait;
use dashboard_core::{RepoRef, WorkflowRecord};
use log::{debug, info};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{bearer, GITHUB_JSON};

#[async_trait]
pub trait WorkflowSource: Send + Sync {
    /// All workflows of a repository in listing order. A failure on any page
    /// fails the whole listing.
    async fn list_workflows(&self, repo: &RepoRef) -> Result<Vec<WorkflowRecord>, ClientError>;
}

#[derive(Debug, Deserialize)]
struct WorkflowPage {
    #[serde(default)]
    workflows: Option<Vec<WorkflowRecord>>,
}

pub struct GithubWorkflowSource {
    client: Client,
    api_base: String,
    token: Option<String>,
    page_size: usize,
}

impl GithubWorkflowSource {
    pub fn new(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|token| !token.is_empty()),
            page_size: config.page_size.max(1),
        }
    }

    fn listing_url(&self, repo: &RepoRef) -> String {
        format!(
            "{}/repos/{}/{}/actions/workflows",
            self.api_base, repo.owner, repo.repo
        )
    }

    /// `None` when the page carries no workflow array
    async fn fetch_page(&self, url: &str, page: usize) -> Result<Option<Vec<WorkflowRecord>>, ClientError> {
        let mut request = self
            .client
            .get(url)
            .query(&[("per_page", self.page_size), ("page", page)])
            .header(ACCEPT, GITHUB_JSON);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, bearer(token)?);
        }

        let response = request.send().await.map_err(|source| ClientError::Http {
            url: url.to_string(),
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| ClientError::Http {
            url: url.to_string(),
            source,
        })?;
        let page: WorkflowPage = serde_json::from_str(&body).map_err(|e| ClientError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(page.workflows)
    }
}

#[async_trait]
impl WorkflowSource for GithubWorkflowSource {
    async fn list_workflows(&self, repo: &RepoRef) -> Result<Vec<WorkflowRecord>, ClientError> {
        let url = self.listing_url(repo);
        let mut workflows = Vec::new();
        let mut page = 1;

        loop {
            let Some(batch) = self.fetch_page(&url, page).await? else {
                debug!("Page {} of {} has no workflow array, stopping", page, repo);
                break;
            };
            let received = batch.len();
            workflows.extend(batch);
            debug!("Fetched page {} of {} ({} workflows)", page, repo, received);
            if received < self.page_size {
                break;
            }
            page += 1;
        }

        info!("Listed {} workflows for {}", workflows.len(), repo);
        Ok(workflows)
    }
}
