// Copyright 2024 RisingLight Project Authors. Licensed under Apache-2.0.

//! Connection settings of the shell.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

/// Path of the settings file, relative to the working directory.
pub const CONFIG_PATH: &str = "config.json";

/// Connection settings shared by the query and write clients.
///
/// Every field is required. There are no defaults: a file missing any of
/// them is rejected as a whole.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Flight SQL host of the query service.
    pub host: String,

    /// API token used by both clients.
    pub token: String,

    /// Bucket (namespace) that queries read from and writes go to.
    pub namespace: String,

    /// Organization owning the bucket.
    pub org: String,

    /// Base URL of the write API.
    pub url: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Config {
    /// Load settings from [`CONFIG_PATH`].
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(CONFIG_PATH)
    }

    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config =
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        info!(
            host = %config.host,
            namespace = %config.namespace,
            "loaded config from {}",
            path.display()
        );
        Ok(config)
    }
}
