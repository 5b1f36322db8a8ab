// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Game settings serialization and deserialization.
//!
//! This module handles exporting and importing game settings in YAML
//! and JSON formats. The format is chosen from the file extension.

use crate::error::{Error, Result};
use crate::models::settings::GameSettings;
use std::path::Path;

/// Settings file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            other => Err(Error::InvalidSettings(format!(
                "unsupported file extension: {:?}",
                other
            ))),
        }
    }
}

/// Export settings to YAML format.
pub fn export_yaml(settings: &GameSettings, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(settings)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export settings to JSON format.
pub fn export_json(settings: &GameSettings, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Import settings from YAML format.
pub fn import_yaml(path: &Path) -> Result<GameSettings> {
    let yaml = std::fs::read_to_string(path)?;
    let settings = serde_yaml::from_str(&yaml)?;
    Ok(settings)
}

/// Import settings from JSON format.
pub fn import_json(path: &Path) -> Result<GameSettings> {
    let json = std::fs::read_to_string(path)?;
    let settings = serde_json::from_str(&json)?;
    Ok(settings)
}

/// Validate and write settings in the format matching the extension.
pub fn save_settings(settings: &GameSettings, path: &Path) -> Result<()> {
    settings.validate()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    match Format::from_path(path)? {
        Format::Yaml => export_yaml(settings, path)?,
        Format::Json => export_json(settings, path)?,
    }
    log::info!("Saved game settings to {}", path.display());
    Ok(())
}

/// Read and validate settings in the format matching the extension.
pub fn load_settings(path: &Path) -> Result<GameSettings> {
    let settings = match Format::from_path(path)? {
        Format::Yaml => import_yaml(path)?,
        Format::Json => import_json(path)?,
    };
    settings.validate()?;
    log::info!("Loaded game settings from {}", path.display());
    Ok(settings)
}

/// Settings at `path`, or the defaults when the file is missing or invalid.
pub fn load_settings_or_default(path: &Path) -> GameSettings {
    if !path.exists() {
        return GameSettings::default();
    }
    load_settings(path).unwrap_or_else(|e| {
        log::warn!("Using default game settings: {}", e);
        GameSettings::default()
    })
}
