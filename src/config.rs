use crate::analyzer::KeywordPriorityTable;
use crate::domain::VersionTemplate;
use crate::error::{Result, VersioningError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Represents the complete configuration for tag-bump.
///
/// Mirrors the JSON layout used by the CI action:
/// `{ "tag_format": "v{major}.{minor}.{patch}", "keyword": { "patch": [...], ... } }`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    pub tag_format: String,

    #[serde(default)]
    pub keyword: KeywordConfig,

    #[serde(default)]
    pub github: GitHubConfig,
}

/// Change-type keywords grouped by the severity they trigger.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct KeywordConfig {
    #[serde(default)]
    pub patch: Vec<String>,

    #[serde(default)]
    pub minor: Vec<String>,

    #[serde(default)]
    pub major: Vec<String>,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_concurrency() -> usize {
    1
}

/// Settings for the pull request lookup.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitHubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// `owner/repo`; falls back to the origin remote when unset
    #[serde(default)]
    pub repository: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of lookups in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        GitHubConfig {
            api_url: default_api_url(),
            repository: None,
            timeout_secs: default_timeout_secs(),
            concurrency: default_concurrency(),
        }
    }
}

impl Config {
    /// Parse configuration text. JSON is selected by a `.json` extension,
    /// everything else is read as TOML.
    pub fn from_str_for_path(content: &str, path: &Path) -> Result<Config> {
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config: Config = if is_json {
            serde_json::from_str(content).map_err(|e| {
                VersioningError::config(format!("{}: {}", path.display(), e))
            })?
        } else {
            toml::from_str(content).map_err(|e| {
                VersioningError::config(format!("{}: {}", path.display(), e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Check the parts of the configuration that cannot be expressed in serde.
    pub fn validate(&self) -> Result<()> {
        VersionTemplate::compile(&self.tag_format)?;
        KeywordPriorityTable::build(&self.keyword)?;

        if self.github.concurrency == 0 {
            return Err(VersioningError::config(
                "github.concurrency must be at least 1",
            ));
        }
        if self.github.timeout_secs == 0 {
            return Err(VersioningError::config(
                "github.timeout_secs must be at least 1",
            ));
        }

        Ok(())
    }
}

/// Candidate configuration files, in lookup order.
///
/// 1. `tag-bump.toml` in current directory
/// 2. `tag-bump.json` in current directory
/// 3. `config.json` inside `$ACTION_PATH` (composite CI action layout)
/// 4. `tag-bump/config.toml` in the user config directory
pub fn default_config_paths(action_path: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("./tag-bump.toml"),
        PathBuf::from("./tag-bump.json"),
    ];
    if let Some(action_path) = action_path {
        paths.push(action_path.join("config.json"));
    }
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("tag-bump").join("config.toml"));
    }
    paths
}

/// Loads configuration from file.
///
/// An explicit path must exist. Without one, the first existing entry of
/// [`default_config_paths`] is used. There are no built-in defaults: a
/// missing file is always [`VersioningError::ConfigNotFound`].
pub fn load_config(config_path: Option<&Path>, action_path: Option<&Path>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => {
            let candidates = default_config_paths(action_path);
            match candidates.iter().find(|p| p.is_file()) {
                Some(found) => found.clone(),
                None => {
                    let first = candidates
                        .into_iter()
                        .next()
                        .unwrap_or_else(|| PathBuf::from("./tag-bump.toml"));
                    return Err(VersioningError::ConfigNotFound(first));
                }
            }
        }
    };

    if !path.is_file() {
        return Err(VersioningError::ConfigNotFound(path));
    }

    tracing::debug!(path = %path.display(), "loading configuration");
    let content = fs::read_to_string(&path)?;
    Config::from_str_for_path(&content, &path)
}
