//! # packrs Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads, merges and validates the packrs configuration. The
//! configuration supplies defaults for the compression pipeline (codec,
//! spool buffer size, overwrite policy, permission of created files) and
//! the location of the external `tar` executable used by the archiver.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.packrs.toml` in the current directory or its ancestors
//!    (the search stops at a directory containing `.git`)
//! 2. User-specific `<config dir>/packrs/config.toml`
//! 3. Default values defined in the code
//!
//! After merging, `~` in paths is expanded and every value is validated.
//! Command-line flags override whatever the configuration provides.
//!
//! ## Examples
//!
//! ```toml
//! [compress]
//! default_codec = "xz"
//! buffer_size = 131072
//! refuse_overwrite = true
//! default_mode = "640"
//!
//! [archive]
//! tar_path = "/usr/bin/tar"
//! ```
//!
use crate::common::archive::compression::CompressionKind;
use crate::common::archive::spool::DEFAULT_BUFFER_SIZE;
use crate::common::archive::tar::DEFAULT_TAR_PATH;
use crate::common::fs::permissions::Permission;
use crate::core::error::{PackError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)] // Error if unknown fields are in TOML
pub struct Config {
    #[serde(default)]
    pub compress: CompressConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
}

/// Defaults for `packrs compress`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CompressConfig {
    /// Codec used when `--compression` is not given. Any accepted alias.
    #[serde(default = "default_codec")]
    pub default_codec: String,
    /// Chunk size used when spooling the source into the encoder.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// Fail instead of overwriting an existing destination file.
    #[serde(default)]
    pub refuse_overwrite: bool,
    /// Permission for created files, octal ("640") or symbolic ("rw-r-----").
    #[serde(default)]
    pub default_mode: Option<String>,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            default_codec: default_codec(),
            buffer_size: default_buffer_size(),
            refuse_overwrite: false,
            default_mode: None,
        }
    }
}

/// Settings for the tar-based archiver.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Path of the tar executable (can use ~). Will be expanded.
    #[serde(default = "default_tar_path")]
    pub tar_path: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            tar_path: default_tar_path(),
        }
    }
}

fn default_codec() -> String {
    "gz".to_string()
}
fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}
fn default_tar_path() -> String {
    DEFAULT_TAR_PATH.to_string()
}

const PROJECT_CONFIG_FILENAME: &str = ".packrs.toml";

pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "packrs", "packrs") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine the user configuration directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    match find_project_config_path()? {
        Some(path) => {
            info!("Loading project configuration from: {}", path.display());
            load_config_from_path(&path).map(Some)
        }
        None => {
            debug!("No project configuration file ({}) found.", PROJECT_CONFIG_FILENAME);
            Ok(None)
        }
    }
}

fn find_project_config_path() -> Result<Option<PathBuf>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    find_project_config_from(&current_dir)
}

fn find_project_config_from(start: &Path) -> Result<Option<PathBuf>> {
    let mut path: &Path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Ok(Some(project_config));
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return Ok(None);
        }
        match path.parent() {
            Some(parent) => path = parent,
            None => break,
        }
    }
    Ok(None)
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    let mut merged = Config::default();
    merged.compress.default_codec = if project_cfg.compress.default_codec != default_codec() {
        project_cfg.compress.default_codec
    } else {
        user.compress.default_codec
    };
    merged.compress.buffer_size = if project_cfg.compress.buffer_size != default_buffer_size() {
        project_cfg.compress.buffer_size
    } else {
        user.compress.buffer_size
    };
    merged.compress.refuse_overwrite =
        project_cfg.compress.refuse_overwrite || user.compress.refuse_overwrite;
    merged.compress.default_mode = project_cfg
        .compress
        .default_mode
        .or(user.compress.default_mode);
    merged.archive.tar_path = if project_cfg.archive.tar_path != default_tar_path() {
        project_cfg.archive.tar_path
    } else {
        user.archive.tar_path
    };
    merged
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    config.archive.tar_path = shellexpand::tilde(&config.archive.tar_path).into_owned();
    debug!("Expanded tar path: {}", config.archive.tar_path);
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    debug!("Validating final configuration...");
    config
        .compress
        .default_codec
        .parse::<CompressionKind>()
        .map_err(|_| {
            anyhow!(PackError::Config(format!(
                "Unknown default codec '{}'. Expected one of: gz, gzip, bz2, bzip2, xz.",
                config.compress.default_codec
            )))
        })?;
    if config.compress.buffer_size == 0 {
        return Err(anyhow!(PackError::Config(
            "buffer_size must be greater than zero.".to_string()
        )));
    }
    if let Some(mode) = &config.compress.default_mode {
        mode.parse::<Permission>().map_err(|_| {
            anyhow!(PackError::Config(format!(
                "Invalid default_mode '{}'. Expected octal (\"640\") or symbolic (\"rw-r-----\") permissions.",
                mode
            )))
        })?;
    }
    if config.archive.tar_path.is_empty() {
        return Err(anyhow!(PackError::Config(
            "tar_path cannot be empty.".to_string()
        )));
    }
    if !Path::new(&config.archive.tar_path).is_file() {
        warn!(
            "Configured tar executable '{}' does not exist.",
            config.archive.tar_path
        );
    }
    debug!("Configuration validation successful.");
    Ok(())
}
