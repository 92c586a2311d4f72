//! Configuration management for docsync.
//!
//! Defaults match the dqlite docs setup. A `docsync.toml` in the working
//! directory, or `~/.config/docsync/config.toml`, can override any field.
//! `DISCEDIT` overrides the discedit command last.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Project-local config file name.
pub const LOCAL_CONFIG_FILE: &str = "docsync.toml";

/// Environment variable overriding `tools.discedit`.
pub const DISCEDIT_ENV: &str = "DISCEDIT";

/// Global docsync configuration.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub github: GithubConfig,

    #[serde(default)]
    pub discourse: DiscourseConfig,

    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GithubConfig {
    /// `owner/name` of the docs repository.
    #[serde(default = "default_repo")]
    pub repo: String,

    #[serde(default = "default_per_page")]
    pub per_page: u32,

    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            repo: default_repo(),
            per_page: default_per_page(),
            api_url: default_api_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DiscourseConfig {
    /// Base URL, with trailing slash.
    #[serde(default = "default_discourse_prefix")]
    pub prefix: String,
}

impl Default for DiscourseConfig {
    fn default() -> Self {
        Self {
            prefix: default_discourse_prefix(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IndexConfig {
    /// Index file holding the navigation table.
    #[serde(default = "default_index_file")]
    pub file: String,

    /// Topic ID of the index file itself.
    #[serde(default = "default_index_topic_id")]
    pub topic_id: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            file: default_index_file(),
            topic_id: default_index_topic_id(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ToolsConfig {
    /// Diff tool used as the editor for discedit.
    #[serde(default = "default_difftool")]
    pub difftool: String,

    #[serde(default = "default_discedit")]
    pub discedit: String,

    #[serde(default = "default_diff")]
    pub diff: String,

    /// Command run once per changed file of a PR.
    #[serde(default = "default_publish")]
    pub publish: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            difftool: default_difftool(),
            discedit: default_discedit(),
            diff: default_diff(),
            publish: default_publish(),
        }
    }
}

fn default_repo() -> String {
    "canonical/dqlite-docs".to_string()
}

fn default_per_page() -> u32 {
    100
}

fn default_api_url() -> String {
    "https://api.github.com/".to_string()
}

fn default_discourse_prefix() -> String {
    "https://discourse.dqlite.io/".to_string()
}

fn default_index_file() -> String {
    "index.md".to_string()
}

fn default_index_topic_id() -> String {
    "34".to_string()
}

fn default_difftool() -> String {
    "meld".to_string()
}

fn default_discedit() -> String {
    "discedit".to_string()
}

fn default_diff() -> String {
    "diff".to_string()
}

fn default_publish() -> String {
    "./publish.sh".to_string()
}

impl Config {
    /// Load config from the first config file found, then apply env overrides.
    pub fn load() -> Result<Self, Error> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        let mut config = if local.exists() {
            Self::load_from(&local)?
        } else {
            Self::load_from(&Self::path())?
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load config from `path`, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Apply environment overrides. `lookup` stands in for `std::env::var`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(discedit) = lookup(DISCEDIT_ENV) {
            self.tools.discedit = discedit;
        }
    }

    /// Path to global docsync directory (~/.config/docsync/)
    pub fn global_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docsync")
    }

    /// Path to global config file
    pub fn path() -> PathBuf {
        Self::global_dir().join("config.toml")
    }

    /// Discourse URL of a topic.
    pub fn topic_url(&self, topic_id: &str) -> String {
        format!("{}t/{}", self.discourse.prefix, topic_id)
    }

    /// Discourse URL of a topic's raw Markdown.
    pub fn raw_url(&self, topic_id: &str) -> String {
        format!("{}raw/{}", self.discourse.prefix, topic_id)
    }

    /// GitHub URL listing the files changed by a pull request.
    pub fn pr_files_url(&self, pr: &str) -> String {
        format!(
            "{}repos/{}/pulls/{}/files?per_page={}",
            self.github.api_url, self.github.repo, pr, self.github.per_page
        )
    }
}
