// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Loaded once at startup from `config.yaml` in the user's config directory.
//! A missing or unreadable file falls back to defaults.

use crate::error::Result;
use crate::io::assets::{DirectoryScanSource, HttpScanSource, ScanSource};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const APP_DIR: &str = "spot-the-lesion";

/// Environment variable holding the upload server key.
pub const SERVER_KEY_ENV: &str = "SPOT_THE_LESION_SERVER_KEY";

/// Key sent when no server key is configured.
pub const DEFAULT_SERVER_KEY: &str = "N/A";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP(S) base URL or local directory holding `content/`
    pub asset_base: String,
    /// Where scores, statistics, flags and game settings are kept
    pub data_dir: Option<PathBuf>,
    pub upload_endpoint: String,
    /// Admin console password; the console is locked when unset
    pub admin_password: Option<String>,
    /// Base of shared challenge links
    pub share_base_url: String,
    #[serde(skip)]
    pub upload_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            asset_base: "https://spot-the-lesion.github.io".to_string(),
            data_dir: None,
            upload_endpoint: "https://spot-the-lesion.herokuapp.com/post/".to_string(),
            admin_password: None,
            share_base_url: "https://spot-the-lesion.github.io/game".to_string(),
            upload_key: DEFAULT_SERVER_KEY.to_string(),
        }
    }
}

impl AppConfig {
    /// Data directory, defaulting to the platform data dir.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir().join("settings.yaml")
    }

    pub fn storage_path(&self) -> PathBuf {
        self.data_dir().join("state.json")
    }

    pub fn uses_http_assets(&self) -> bool {
        self.asset_base.starts_with("http://") || self.asset_base.starts_with("https://")
    }

    /// Build the scan source the asset base points at.
    pub fn scan_source(&self) -> Result<Arc<dyn ScanSource>> {
        if self.uses_http_assets() {
            Ok(Arc::new(HttpScanSource::new(self.asset_base.clone())?))
        } else {
            Ok(Arc::new(DirectoryScanSource::new(&self.asset_base)))
        }
    }
}

/// Default location of the config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join("config.yaml"))
        .unwrap_or_else(|| PathBuf::from("config.yaml"))
}

/// Load configuration from `path` or return defaults, then apply the
/// environment override for the upload key.
pub fn load_config(path: &Path) -> AppConfig {
    log::info!("Looking for config at: {}", path.display());

    let mut config = if path.exists() {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Config loaded from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    AppConfig::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
                AppConfig::default()
            }
        }
    } else {
        log::info!("{} not found. Using default config.", path.display());
        AppConfig::default()
    };

    config.upload_key = server_key(std::env::var(SERVER_KEY_ENV).ok());
    config
}

fn server_key(value: Option<String>) -> String {
    value
        .filter(|key| !key.is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER_KEY.to_string())
}
