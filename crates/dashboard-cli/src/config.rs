use std::path::{Path, PathBuf};

use actions_client::{ClientConfig, RetryPolicy, DEFAULT_API_BASE, PAGE_SIZE};
use anyhow::{bail, Context};
use dashboard_core::UnassignedPolicy;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "actions-dashboard";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Repository used when neither `--repo` nor `--page` is given
    pub repo: Option<String>,
    pub github_token: Option<String>,
    pub api_base: String,
    pub store_dir: Option<PathBuf>,
    pub http_proxy: String,
    pub https_proxy: String,
    /// Show workflows no custom category mentions under `Uncategorized`
    pub show_unassigned: bool,
    pub watch_interval_secs: u64,
    pub badge: RetryPolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            repo: None,
            github_token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            store_dir: None,
            http_proxy: String::new(),
            https_proxy: String::new(),
            show_unassigned: true,
            watch_interval_secs: 60,
            badge: RetryPolicy::default(),
        }
    }
}

fn parse_bool_env(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

fn parse_number_env<T: std::str::FromStr>(name: &str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(number) => Some(number),
        Err(_) => {
            warn!("Ignoring {}: {:?} is not a valid number", name, value);
            None
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE_NAME))
}

impl DashboardConfig {
    /// Reads the config file, then applies environment overrides.
    ///
    /// An explicitly given path must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) if !path.exists() => bail!("config file {} not found", path.display()),
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|path| path.exists()),
        };

        let mut config = match file {
            Some(file) => {
                debug!("Loading config from {}", file.display());
                let content = std::fs::read_to_string(&file)
                    .with_context(|| format!("failed to read {}", file.display()))?;
                toml::from_str::<DashboardConfig>(&content)
                    .with_context(|| format!("failed to parse {}", file.display()))?
            }
            None => DashboardConfig::default(),
        };

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("GITHUB_TOKEN").filter(|token| !token.trim().is_empty()) {
            self.github_token = Some(token.trim().to_string());
        }
        if let Some(api_base) = lookup("GITHUB_API_BASE") {
            self.api_base = api_base;
        }
        if let Some(store_dir) = lookup("DASHBOARD_STORE_DIR") {
            self.store_dir = Some(PathBuf::from(store_dir));
        }
        if let Some(http_proxy) = lookup("HTTP_PROXY") {
            self.http_proxy = http_proxy;
        }
        if let Some(https_proxy) = lookup("HTTPS_PROXY") {
            self.https_proxy = https_proxy;
        }
        if let Some(value) = lookup("DASHBOARD_BADGE_TIMEOUT_MS") {
            if let Some(timeout_ms) = parse_number_env("DASHBOARD_BADGE_TIMEOUT_MS", &value) {
                self.badge.timeout_ms = timeout_ms;
            }
        }
        if let Some(value) = lookup("DASHBOARD_BADGE_RETRIES") {
            if let Some(retries) = parse_number_env("DASHBOARD_BADGE_RETRIES", &value) {
                self.badge.retries = retries;
            }
        }
        if let Some(value) = lookup("DASHBOARD_BADGE_RETRY_DELAY_MS") {
            if let Some(delay_ms) = parse_number_env("DASHBOARD_BADGE_RETRY_DELAY_MS", &value) {
                self.badge.delay_ms = delay_ms;
            }
        }
        if let Some(value) = lookup("DASHBOARD_SHOW_UNASSIGNED") {
            self.show_unassigned = parse_bool_env(&value);
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_base: self.api_base.clone(),
            token: self.github_token.clone(),
            page_size: PAGE_SIZE,
            http_proxy: self.http_proxy.clone(),
            https_proxy: self.https_proxy.clone(),
            ..ClientConfig::default()
        }
    }

    pub fn unassigned_policy(&self) -> UnassignedPolicy {
        if self.show_unassigned {
            UnassignedPolicy::Collect
        } else {
            UnassignedPolicy::Hide
        }
    }

    pub fn store_dir(&self) -> PathBuf {
        self.store_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR)
        })
    }
}
