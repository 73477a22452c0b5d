//! User configuration.
//!
//! Loaded once at startup from a TOML file; a missing file is the default
//! configuration, a malformed one is an error. The path is the XDG config
//! directory by default and can be overridden with `WTA_CONFIG_PATH` for
//! tests and one-off runs.

use std::path::PathBuf;

use anyhow::Context;
use etcetera::BaseStrategy;
use serde::Deserialize;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "WTA_CONFIG_PATH";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub worktree: WorktreeConfig,
    #[serde(default)]
    pub open: OpenConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct WorktreeConfig {
    /// Directory new worktrees are suggested under. Supports `~` expansion.
    pub default_parent_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct OpenConfig {
    /// Workspace file name to prefer when opening a worktree, relative to
    /// the worktree root.
    pub workspace_file: Option<String>,
}

impl Config {
    /// Load from the resolved config path; absent file means defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            log::debug!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// The parent directory for suggested worktree paths, tilde-expanded.
    ///
    /// Falls back to the current repository's parent when unset; callers
    /// pass that fallback in.
    pub fn parent_dir(&self, fallback: &str) -> String {
        match &self.worktree.default_parent_dir {
            Some(dir) => shellexpand::tilde(dir).into_owned(),
            None => fallback.to_string(),
        }
    }
}

/// Resolve the config file path: env override, else XDG config dir.
pub fn config_path() -> anyhow::Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }
    let strategy =
        etcetera::choose_base_strategy().context("could not determine config directory")?;
    Ok(strategy.config_dir().join("wta").join("config.toml"))
}
