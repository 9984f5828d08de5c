//! # Configuration
//!
//! Loads the two YAML documents the bot is started with: the bot description
//! (name, delay, store file, behaviors) and the platform credentials.
//! Response lists given as file paths are resolved here, once, at load time.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::types::Behavior;

/// Bot description document.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub username: String,
    /// Poll interval in minutes.
    pub delay: u64,
    #[serde(default)]
    pub store_file: Option<String>,
    pub behaviors: Vec<BehaviorConfig>,
    /// Optional plain-text log sink, in addition to stdout.
    #[serde(default)]
    pub log_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct BehaviorConfig {
    #[serde(default)]
    pub search_term: Option<String>,
    #[serde(default)]
    pub responses: Option<ResponseSource>,
}

/// Where a behavior's replies come from.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ResponseSource {
    Inline(Vec<String>),
    /// One response per non-empty line.
    File(PathBuf),
}

impl ResponseSource {
    pub fn resolve(&self) -> Result<Vec<String>> {
        match self {
            ResponseSource::Inline(lines) => Ok(lines.clone()),
            ResponseSource::File(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read responses file {}", path.display()))?;
                Ok(content
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect())
            }
        }
    }
}

impl BotConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read bot config {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse bot config {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn delay_duration(&self) -> Duration {
        Duration::from_secs(self.delay.saturating_mul(60))
    }

    /// Backing file for the watermark store; `None` disables persistence.
    pub fn store_path(&self) -> Option<PathBuf> {
        self.store_file
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    /// Resolves every search behavior, in declared order.
    ///
    /// Entries without a `search-term` are not a known behavior kind and are skipped.
    pub fn search_behaviors(&self) -> Result<Vec<Behavior>> {
        let mut behaviors = Vec::new();
        for (index, entry) in self.behaviors.iter().enumerate() {
            let Some(term) = &entry.search_term else {
                tracing::debug!("Ignoring behavior #{index}: no search-term");
                continue;
            };
            let Some(source) = &entry.responses else {
                bail!("Behavior '{term}' has no responses");
            };
            let responses = source
                .resolve()
                .with_context(|| format!("Failed to resolve responses for '{term}'"))?;
            if responses.is_empty() {
                bail!("Behavior '{term}' resolved to an empty response list");
            }
            behaviors.push(Behavior::search(term.clone(), responses));
        }
        Ok(behaviors)
    }
}

/// Platform credentials document. Passed verbatim to the API client.
#[derive(Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_key: String,
    pub access_secret: String,
}

impl Credentials {
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_key: impl Into<String>,
        access_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            access_key: access_key.into(),
            access_secret: access_secret.into(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse credentials {}", path.display()))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_key", &self.access_key)
            .field("access_secret", &"<redacted>")
            .finish()
    }
}
