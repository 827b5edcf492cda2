use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use actions_client::StatusResolver;
use anyhow::bail;
use colored::Colorize;
use dashboard_core::{
    CategoryCommand, RenderModel, StatusBoard, StatusUpdate, WorkflowId, UNCATEGORIZED,
};
use dashboard_store::{ThemeMode, ThemeStore};
use log::{debug, error, info};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::cli::{CategoryAction, ThemeAction};
use crate::dashboard::{Assignment, Dashboard};
use crate::render::{
    display_names, render_categories, render_empty_notice, render_model, render_summary, render_update,
};

const STATUS_CHANNEL_CAPACITY: usize = 64;

fn badge_requests(model: &RenderModel) -> Vec<(WorkflowId, Option<String>)> {
    model
        .entries()
        .map(|entry| {
            (
                entry.workflow.id.clone(),
                entry.workflow.badge_url().map(str::to_string),
            )
        })
        .collect()
}

/// Renders once, then prints each badge status as it settles
pub async fn show(
    dashboard: &Dashboard,
    resolver: &StatusResolver,
    theme: ThemeMode,
    with_status: bool,
) -> anyhow::Result<()> {
    let snapshot = dashboard.snapshot().await?;
    if snapshot.workflows.is_empty() {
        info!("No workflows listed for {}, nothing to render", dashboard.repo());
        return Ok(());
    }
    if let Some(notice) = render_empty_notice(dashboard.repo(), snapshot.workflows.len(), &snapshot.model) {
        println!("{}", notice.yellow());
        return Ok(());
    }

    if !with_status {
        print!("{}", render_model(dashboard.repo(), &snapshot.model, None, theme));
        return Ok(());
    }

    let mut board = StatusBoard::new();
    let epoch = board.begin_pass();
    print!(
        "{}",
        render_model(dashboard.repo(), &snapshot.model, Some(&board), theme)
    );

    let names = display_names(&snapshot.model);
    let (tx, mut rx) = mpsc::channel(STATUS_CHANNEL_CAPACITY);
    let resolution = resolver.resolve_all(epoch, badge_requests(&snapshot.model), tx);
    let progress = async {
        while let Some(update) = rx.recv().await {
            let line = render_update(&names, &update.workflow_id, &update.status);
            if board.apply(update) {
                println!("{line}");
            }
        }
    };
    tokio::join!(resolution, progress);

    println!("{}", render_summary(&board).bold());
    Ok(())
}

/// Re-renders every `interval` until Ctrl-C
pub async fn watch(
    dashboard: &Dashboard,
    resolver: StatusResolver,
    theme: ThemeMode,
    interval: Duration,
) -> anyhow::Result<()> {
    watch_until(dashboard, resolver, theme, interval, tokio::signal::ctrl_c()).await
}

/// Re-renders every `interval` until `shutdown` completes. Starting a pass
/// cancels the previous pass's badge fetches; their late updates carry the
/// old epoch and are dropped.
///
/// `shutdown` lives for the whole watch and is checked before anything else,
/// so one that completes during a refresh stops the loop right after it.
pub async fn watch_until<F: Future>(
    dashboard: &Dashboard,
    resolver: StatusResolver,
    theme: ThemeMode,
    interval: Duration,
    shutdown: F,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::channel::<StatusUpdate>(STATUS_CHANNEL_CAPACITY);
    let mut board = StatusBoard::new();
    let mut names: HashMap<WorkflowId, String> = HashMap::new();
    let mut ticker = tokio::time::interval(interval);
    let mut in_flight: Option<CancellationToken> = None;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                if let Some(token) = in_flight.take() {
                    token.cancel();
                }
                info!("Stopping watch of {}", dashboard.repo());
                break;
            }
            _ = ticker.tick() => {
                if let Some(token) = in_flight.take() {
                    token.cancel();
                }
                let snapshot = match dashboard.snapshot().await {
                    Ok(snapshot) => snapshot,
                    Err(error) => {
                        error!("Refresh of {} failed: {:#}", dashboard.repo(), error);
                        continue;
                    }
                };

                let epoch = board.begin_pass();
                println!(
                    "{}",
                    format!("── pass {} · {}", epoch.value(), chrono::Local::now().format("%H:%M:%S")).dimmed()
                );
                print!("{}", render_model(dashboard.repo(), &snapshot.model, Some(&board), theme));
                if let Some(notice) = render_empty_notice(dashboard.repo(), snapshot.workflows.len(), &snapshot.model) {
                    println!("{}", notice.yellow());
                }
                names = display_names(&snapshot.model);

                let token = CancellationToken::new();
                let pass = resolver.clone().with_cancellation(token.clone());
                in_flight = Some(token);
                let badges = badge_requests(&snapshot.model);
                let tx = tx.clone();
                tokio::spawn(async move {
                    pass.resolve_all(epoch, badges, tx).await;
                });
            }
            Some(update) = rx.recv() => {
                let line = render_update(&names, &update.workflow_id, &update.status);
                if board.apply(update) {
                    println!("{line}");
                } else {
                    debug!("Dropped status update from an earlier pass");
                }
            }
        }
    }
    Ok(())
}

pub async fn category(dashboard: &Dashboard, action: CategoryAction, theme: ThemeMode) -> anyhow::Result<()> {
    let Assignment { workflows, set } = match action {
        CategoryAction::List => dashboard.assignment().await?,
        CategoryAction::Add { name } => dashboard.apply(CategoryCommand::AddCategory { name }).await?,
        CategoryAction::Rename { from, to } => {
            dashboard
                .apply(CategoryCommand::RenameCategory { from, to })
                .await?
        }
        CategoryAction::Delete { name, yes } => {
            if !yes {
                bail!("deleting {name:?} moves its workflows to {UNCATEGORIZED}; pass --yes to confirm");
            }
            dashboard.apply(CategoryCommand::DeleteCategory { name }).await?
        }
        CategoryAction::Move { workflow, target } => dashboard.move_workflow(&workflow, &target).await?,
        CategoryAction::Reset { yes } => {
            if !yes {
                bail!("reset discards every custom category for {}; pass --yes to confirm", dashboard.repo());
            }
            dashboard.reset().await?
        }
    };

    print!("{}", render_categories(&set, &workflows, theme));
    Ok(())
}

pub async fn theme(store: &ThemeStore, action: ThemeAction) -> anyhow::Result<()> {
    let mode = match action {
        ThemeAction::Show => store.load().await?,
        ThemeAction::Toggle => store.toggle().await?,
        ThemeAction::Set { mode } => {
            let mode = ThemeMode::from(mode);
            store.save(mode).await?;
            mode
        }
    };
    println!("{mode}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::tests::{workflows, StaticSource};
    use actions_client::{build_http_client, ClientConfig, ClientError, RetryPolicy, WorkflowSource};
    use async_trait::async_trait;
    use dashboard_core::{RepoRef, UnassignedPolicy, WorkflowRecord};
    use dashboard_store::{CategoryStore, MemoryKeyValueStore};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Lists after a delay and counts the listings
    struct SlowSource {
        delay: Duration,
        listings: Arc<AtomicU32>,
    }

    #[async_trait]
    impl WorkflowSource for SlowSource {
        async fn list_workflows(&self, _repo: &RepoRef) -> Result<Vec<WorkflowRecord>, ClientError> {
            self.listings.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(workflows())
        }
    }

    fn dashboard() -> Dashboard {
        Dashboard::new(
            RepoRef::new("octo", "hello"),
            Arc::new(StaticSource(workflows())),
            CategoryStore::new(Arc::new(MemoryKeyValueStore::new())),
            UnassignedPolicy::Collect,
        )
    }

    #[test]
    fn test_badge_requests_follow_the_model() {
        let workflows = vec![
            WorkflowRecord::new(1, "CI").with_badge_url("https://example.com/ci.svg"),
            WorkflowRecord::new(2, "Docs"),
        ];
        let model = dashboard_core::resolve(&workflows, None);

        let requests = badge_requests(&model);

        assert_eq!(
            requests,
            vec![
                (WorkflowId::from(1), Some("https://example.com/ci.svg".to_string())),
                (WorkflowId::from(2), None),
            ]
        );
    }

    #[tokio::test]
    async fn test_watch_stops_when_shutdown_fires_during_refresh() {
        let listings = Arc::new(AtomicU32::new(0));
        let dashboard = Dashboard::new(
            RepoRef::new("octo", "hello"),
            Arc::new(SlowSource {
                delay: Duration::from_millis(200),
                listings: listings.clone(),
            }),
            CategoryStore::new(Arc::new(MemoryKeyValueStore::new())),
            UnassignedPolicy::Collect,
        );
        let resolver = StatusResolver::new(
            build_http_client(&ClientConfig::default()).unwrap(),
            RetryPolicy::default(),
        );
        // completes while the first listing is still sleeping
        let shutdown = tokio::time::sleep(Duration::from_millis(20));

        let watched = tokio::time::timeout(
            Duration::from_secs(5),
            watch_until(&dashboard, resolver, ThemeMode::Light, Duration::from_millis(50), shutdown),
        )
        .await;

        assert!(watched.expect("watch kept running after shutdown").is_ok());
        assert_eq!(listings.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_destructive_edits_need_confirmation() {
        let dashboard = dashboard();

        let delete = category(
            &dashboard,
            CategoryAction::Delete {
                name: "Infra".to_string(),
                yes: false,
            },
            ThemeMode::Light,
        )
        .await;
        let reset = category(&dashboard, CategoryAction::Reset { yes: false }, ThemeMode::Light).await;

        assert!(delete.is_err());
        assert!(reset.is_err());
        // nothing was seeded or saved
        let snapshot = dashboard.snapshot().await.unwrap();
        assert_eq!(snapshot.model.mode, dashboard_core::RenderMode::Auto);
    }

    #[tokio::test]
    async fn test_theme_set_and_toggle() {
        let store = ThemeStore::new(Arc::new(MemoryKeyValueStore::new()));

        theme(&store, ThemeAction::Set { mode: crate::cli::ThemeArg::Dark })
            .await
            .unwrap();
        assert_eq!(store.load().await.unwrap(), ThemeMode::Dark);

        theme(&store, ThemeAction::Toggle).await.unwrap();
        assert_eq!(store.load().await.unwrap(), ThemeMode::Light);
    }
}
