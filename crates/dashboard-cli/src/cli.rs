use clap::{Parser, Subcommand, ValueEnum};
use dashboard_store::ThemeMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "actions-dashboard")]
#[command(about = "Categorized dashboard for a repository's GitHub Actions workflows")]
#[command(version)]
pub struct Cli {
    /// Repository as OWNER/REPO
    #[arg(long, global = true)]
    pub repo: Option<String>,

    /// Workflow listing page, e.g. /octo/hello/actions or its full URL
    #[arg(long, global = true)]
    pub page: Option<String>,

    /// Enable debug mode
    #[arg(long, short, global = true, default_value = "false")]
    pub debug: bool,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding categories and preferences
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the dashboard once and stream badge statuses
    Show {
        /// Skip badge resolution
        #[arg(long)]
        no_status: bool,
    },
    /// Re-render the dashboard periodically
    Watch {
        /// Seconds between refreshes
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Inspect or edit custom categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Dark mode preference
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// List categories and their workflows
    List,
    /// Add an empty category
    Add { name: String },
    /// Rename a category in place
    Rename { from: String, to: String },
    /// Delete a category; its workflows move to Uncategorized
    Delete {
        name: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Move a workflow (id or exact name) into a category
    Move { workflow: String, target: String },
    /// Regroup every workflow by name, discarding customizations
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Set the theme explicitly
    Set {
        #[arg(value_enum)]
        mode: ThemeArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for ThemeMode {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => ThemeMode::Dark,
            ThemeArg::Light => ThemeMode::Light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "actions-dashboard",
            "category",
            "move",
            "42",
            "Infra",
            "--repo",
            "octo/hello",
        ]);
        assert_eq!(cli.repo.as_deref(), Some("octo/hello"));
        match cli.command {
            Commands::Category {
                action: CategoryAction::Move { workflow, target },
            } => {
                assert_eq!(workflow, "42");
                assert_eq!(target, "Infra");
            }
            _ => panic!("expected category move"),
        }
    }

    #[test]
    fn test_theme_set_parses_mode() {
        let cli = Cli::parse_from(["actions-dashboard", "theme", "set", "dark"]);
        match cli.command {
            Commands::Theme {
                action: ThemeAction::Set { mode },
            } => assert_eq!(ThemeMode::from(mode), ThemeMode::Dark),
            _ => panic!("expected theme set"),
        }
    }
}
