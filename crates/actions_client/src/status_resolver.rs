//! Badge status resolution

use dashboard_core::{BadgeStatus, Epoch, StatusUpdate, WorkflowId};
use futures::stream::{self, StreamExt};
use log::{debug, warn};
use reqwest::Client;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::badge::extract_label;
use crate::config::RetryPolicy;
use crate::error::BadgeError;
use crate::retry::{retry_with_timeout, RetryError};

/// Resolves badge URLs to statuses.
///
/// Resolution never fails: anything that goes wrong (timeouts, exhausted
/// retries, unreadable SVG, cancellation) settles as `UNKNOWN`.
#[derive(Clone)]
pub struct StatusResolver {
    client: Client,
    policy: RetryPolicy,
    cancel: CancellationToken,
}

impl StatusResolver {
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self {
            client,
            policy,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Cancelling this token aborts every in-flight resolution
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn resolve_status(&self, badge_url: Option<&str>) -> BadgeStatus {
        let Some(url) = badge_url.filter(|url| !url.is_empty()) else {
            return BadgeStatus::no_badge();
        };

        match self.fetch_label(url).await {
            Ok(label) => BadgeStatus::from_label(label),
            Err(BadgeError::Fetch(RetryError::Cancelled)) => {
                debug!("Badge resolution for {} cancelled", url);
                BadgeStatus::unknown()
            }
            Err(error) => {
                warn!("Badge for {} unresolved: {}", url, error);
                BadgeStatus::unknown()
            }
        }
    }

    async fn fetch_label(&self, url: &str) -> Result<String, BadgeError> {
        let svg = retry_with_timeout(&self.policy, &self.cancel, |attempt| {
            let request = self.client.get(url);
            async move {
                debug!("Fetching badge {} (attempt {})", url, attempt);
                let response = request.send().await?.error_for_status()?;
                response.text().await
            }
        })
        .await
        .map_err(BadgeError::Fetch)?;

        extract_label(&svg)
    }

    /// Resolves every badge concurrently and reports each one on `updates` as
    /// it settles, tagged with `epoch`. Returns once all have settled; a
    /// closed receiver just drops the remaining reports.
    pub async fn resolve_all<I>(&self, epoch: Epoch, badges: I, updates: mpsc::Sender<StatusUpdate>)
    where
        I: IntoIterator<Item = (WorkflowId, Option<String>)>,
    {
        stream::iter(badges)
            .for_each_concurrent(None, |(workflow_id, badge_url)| {
                let updates = updates.clone();
                async move {
                    let status = self.resolve_status(badge_url.as_deref()).await;
                    let update = StatusUpdate {
                        epoch,
                        workflow_id,
                        status,
                    };
                    if updates.send(update).await.is_err() {
                        debug!("Status receiver closed, dropping update");
                    }
                }
            })
            .await;
    }
}
