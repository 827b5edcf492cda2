//! Dashboard theme preference

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::keys::StorageKey;
use crate::kv::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeMode::Light => f.write_str("light"),
            ThemeMode::Dark => f.write_str("dark"),
        }
    }
}

/// Repository-independent dark mode flag, stored as `"true"` / `"false"`
#[derive(Clone)]
pub struct ThemeStore {
    kv: Arc<dyn KeyValueStore>,
}

impl ThemeStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub async fn load(&self) -> Result<ThemeMode> {
        let mode = match self.kv.get(&StorageKey::dark_mode()).await?.as_deref().map(str::trim) {
            Some("true") => ThemeMode::Dark,
            Some("false") | None => ThemeMode::Light,
            Some(other) => {
                warn!("Ignoring unrecognized dark mode flag {:?}", other);
                ThemeMode::Light
            }
        };
        Ok(mode)
    }

    pub async fn save(&self, mode: ThemeMode) -> Result<()> {
        let flag = if mode.is_dark() { "true" } else { "false" };
        self.kv.set(&StorageKey::dark_mode(), flag).await
    }

    /// Flips the stored preference and returns the new mode
    pub async fn toggle(&self) -> Result<ThemeMode> {
        let mode = self.load().await?.toggled();
        self.save(mode).await?;
        Ok(mode)
    }
}
