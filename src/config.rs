use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::lookup::maven::MAVEN_CENTRAL;
use crate::notice::NoticePolicy;

/// Root configuration structure, deserialized from `.osgi-licenses/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub notice: NoticeConfig,
}

/// Where dependency JARs and parent POMs are looked up.
#[derive(Debug, Deserialize)]
pub struct RepositoryConfig {
    /// Maven-layout local repository. Defaults to `~/.m2/repository`.
    pub local: Option<PathBuf>,
    /// Remote repositories consulted in order when running `--online`.
    #[serde(default = "default_remotes")]
    pub remotes: Vec<String>,
}

fn default_remotes() -> Vec<String> {
    vec![MAVEN_CENTRAL.to_string()]
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        RepositoryConfig {
            local: None,
            remotes: default_remotes(),
        }
    }
}

impl RepositoryConfig {
    /// The configured local repository, else `~/.m2/repository`.
    pub fn local_path(&self) -> PathBuf {
        self.local.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_default()
                .join(".m2")
                .join("repository")
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NoticeConfig {
    /// How `about.html` notices turn into license records.
    #[serde(default)]
    pub policy: NoticePolicy,
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<project_path>/.osgi-licenses/config.toml`
/// 3. `~/.config/osgi-licenses/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".osgi-licenses").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("osgi-licenses")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
}
