mod cli;
mod commands;
mod config;
mod dashboard;
mod logging;
mod render;

use std::sync::Arc;
use std::time::Duration;

use actions_client::{build_http_client, GithubWorkflowSource, StatusResolver};
use clap::Parser;
use dashboard_store::{CategoryStore, FileKeyValueStore, KeyValueStore, ThemeStore};
use log::debug;

use cli::{Cli, Commands};
use config::DashboardConfig;
use dashboard::{resolve_repo, Dashboard};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.debug);

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(store_dir) = cli.store_dir.clone() {
        config.store_dir = Some(store_dir);
    }
    let store_dir = config.store_dir();
    debug!("Using store at {}", store_dir.display());
    let kv: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(store_dir));
    let themes = ThemeStore::new(kv.clone());

    if let Commands::Theme { action } = cli.command {
        return commands::theme(&themes, action).await;
    }

    let repo = resolve_repo(
        cli.repo.as_deref(),
        cli.page.as_deref(),
        config.repo.as_deref(),
    )?;
    let client_config = config.client_config();
    let client = build_http_client(&client_config)?;
    let dashboard = Dashboard::new(
        repo,
        Arc::new(GithubWorkflowSource::new(client.clone(), &client_config)),
        CategoryStore::new(kv),
        config.unassigned_policy(),
    );
    let resolver = StatusResolver::new(client, config.badge.clone());
    let theme = themes.load().await?;

    match cli.command {
        Commands::Show { no_status } => commands::show(&dashboard, &resolver, theme, !no_status).await,
        Commands::Watch { interval } => {
            let seconds = interval.unwrap_or(config.watch_interval_secs).max(1);
            commands::watch(&dashboard, resolver, theme, Duration::from_secs(seconds)).await
        }
        Commands::Category { action } => commands::category(&dashboard, action, theme).await,
        Commands::Theme { action } => commands::theme(&themes, action).await,
    }
}
