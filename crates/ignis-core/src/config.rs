// SPDX-License-Identifier: CEPL-1.0
//! Runtime settings read from `ignis.toml`.
//!
//! Nothing in here touches diagnostics; validation is a build-time decision.
use serde::Deserialize;
use std::{fs, io, path::Path};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("parsing {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub window: WindowConfig,
}

/// Metadata handed to the graphics context.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppSection {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_engine_name")]
    pub engine: String,
    #[serde(default = "default_version")]
    pub version: [u32; 3],
    #[serde(default = "default_version")]
    pub engine_version: [u32; 3],
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub resizable: bool,
}

impl Default for AppSection {
    fn default() -> Self {
        AppSection {
            name: default_app_name(),
            engine: default_engine_name(),
            version: default_version(),
            engine_version: default_version(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            resizable: false,
        }
    }
}

fn default_app_name() -> String {
    "Hello Triangle".to_owned()
}
fn default_engine_name() -> String {
    "No Engine".to_owned()
}
fn default_version() -> [u32; 3] {
    [1, 0, 0]
}
fn default_title() -> String {
    "HelloTriangleApplication".to_owned()
}
fn default_width() -> u32 {
    800
}
fn default_height() -> u32 {
    600
}

impl AppConfig {
    pub fn from_toml(src: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(src).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Strict load; a missing file is an error here.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let shown = path.display().to_string();
        let src = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: shown.clone(),
            source,
        })?;
        Self::from_toml(&src, &shown)
    }

    /// Missing file means defaults; a broken one is reported and also
    /// falls back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(cfg) => {
                info!("config loaded from {}", path.display());
                cfg
            }
            Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                AppConfig::default()
            }
            Err(e) => {
                warn!("{e}; using defaults");
                AppConfig::default()
            }
        }
    }
}
