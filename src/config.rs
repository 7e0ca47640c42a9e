//! `bob.toml` configuration
//!
//! The file is found through `--config`, then `BOB_CONFIG`, then `./bob.toml`.
//! Secrets may come from the environment instead of the file:
//! `BOB_GITHUB_TOKEN` and `BOB_TRAVIS_TOKEN` win over the file values.

use crate::artifacts::objects::commit::Author;
use anyhow::{Context, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

pub const CONFIG_ENV: &str = "BOB_CONFIG";
pub const GITHUB_TOKEN_ENV: &str = "BOB_GITHUB_TOKEN";
pub const TRAVIS_TOKEN_ENV: &str = "BOB_TRAVIS_TOKEN";
const DEFAULT_CONFIG_FILE: &str = "bob.toml";

pub const DEFAULT_BUMP_MESSAGE: &str = "[General] Bumps version to <version> (<buildNumber>).";
pub const DEFAULT_ALIGN_MESSAGE: &str = "[General] Aligns version to <version> (<buildNumber>).";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub github: GitHubConfig,
    #[serde(default)]
    pub author: AuthorConfig,
    #[serde(default)]
    pub ios: IosConfig,
    pub travis: Option<TravisConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubConfig {
    /// Repository API url, e.g. `https://api.github.com/repos/{owner}/{repo}`
    pub repo_url: String,
    pub username: Option<String>,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_branch")]
    pub default_branch: String,
    /// Upper bound on concurrent per-file requests of one batch rewrite
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorConfig {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IosConfig {
    #[serde(default)]
    pub plist_paths: Vec<String>,
    #[serde(default = "default_bump_message")]
    pub bump_message: String,
    #[serde(default = "default_align_message")]
    pub align_message: String,
}

impl Default for IosConfig {
    fn default() -> Self {
        IosConfig {
            plist_paths: vec![],
            bump_message: default_bump_message(),
            align_message: default_align_message(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TravisConfig {
    /// e.g. `https://api.travis-ci.com/repo/acme%2Fapp`
    pub repo_url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub targets: Vec<TravisTarget>,
}

/// A build the CI service can be asked to run
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TravisTarget {
    pub name: String,
    pub script: String,
    /// Extra build configuration merged into the request
    #[serde(default)]
    pub config: serde_json::Map<String, serde_json::Value>,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_max_concurrency() -> usize {
    8
}

fn default_bump_message() -> String {
    DEFAULT_BUMP_MESSAGE.to_string()
}

fn default_align_message() -> String {
    DEFAULT_ALIGN_MESSAGE.to_string()
}

impl Config {
    /// Path of the configuration file to read
    pub fn locate(explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(path) => path.to_path_buf(),
            None => std::env::var_os(CONFIG_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
        }
    }

    /// Read, apply environment overrides and validate
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("could not read config file `{}`", path.display()))?;
        let mut config = Self::parse(&content)
            .with_context(|| format!("invalid config file `{}`", path.display()))?;

        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.github.max_concurrency = config.github.max_concurrency.max(1);
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(GITHUB_TOKEN_ENV).filter(|token| !token.is_empty()) {
            self.github.token = token;
        }
        if let Some(travis) = self.travis.as_mut()
            && let Some(token) = lookup(TRAVIS_TOKEN_ENV).filter(|token| !token.is_empty())
        {
            travis.token = token;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.github.token.trim().is_empty() {
            bail!("no GitHub token configured; set github.token or {GITHUB_TOKEN_ENV}");
        }
        Url::parse(&self.github.repo_url)
            .with_context(|| format!("invalid github.repo_url `{}`", self.github.repo_url))?;

        if let Some(travis) = &self.travis {
            Url::parse(&travis.repo_url)
                .with_context(|| format!("invalid travis.repo_url `{}`", travis.repo_url))?;
        }

        Ok(())
    }

    /// Commit author from the `[author]` section, else from the environment
    pub fn author(&self) -> anyhow::Result<Author> {
        match (&self.author.name, &self.author.email) {
            (Some(name), Some(email)) => Ok(Author::new(name.clone(), email.clone())),
            _ => Author::load_from_env()
                .context("no commit author configured; set [author] or GIT_AUTHOR_NAME/GIT_AUTHOR_EMAIL"),
        }
    }
}
