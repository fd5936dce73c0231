//! Banned-token classifier
//!
//! A comment is rejected when its lowercased text contains any banned token
//! as a substring. Tokens are stored lowercased.

use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::{CensorError, Result};

/// Tokens used when no override is configured
pub const DEFAULT_BANNED_WORDS: [&str; 3] = ["йцукен", "ячсмит", "пролсд"];

/// Outcome of one moderation check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModerationResult {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ModerationResult {
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            reason: Some(reason.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Censor {
    banned: Vec<String>,
}

impl Default for Censor {
    fn default() -> Self {
        Self::new(DEFAULT_BANNED_WORDS)
    }
}

impl Censor {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut banned: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        // First occurrence wins so the configured order is kept.
        let mut seen = HashSet::new();
        banned.retain(|w| seen.insert(w.clone()));

        Self { banned }
    }

    /// Load tokens from a file, one per line. Blank lines and lines starting
    /// with `#` are skipped.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CensorError::Config(format!(
                "Failed to load banned words from {}: {}",
                path.display(),
                e
            ))
        })?;

        let words = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));

        Ok(Self::new(words))
    }

    /// Word file first, then the env list, then the built-in defaults.
    pub fn from_config(config: &Config) -> Result<Self> {
        if let Some(path) = &config.words_file {
            return Self::from_file(path);
        }
        Ok(match &config.banned_words {
            Some(words) => Self::new(words),
            None => Self::default(),
        })
    }

    pub fn banned_words(&self) -> &[String] {
        &self.banned
    }

    pub fn check(&self, text: &str) -> ModerationResult {
        if text.is_empty() {
            return ModerationResult::accepted();
        }

        let normalized = text.to_lowercase();
        match self.banned.iter().find(|word| normalized.contains(word.as_str())) {
            Some(word) => {
                tracing::debug!("Rejected for banned token: {}", word);
                ModerationResult::rejected("Comment contains a banned word")
            }
            None => ModerationResult::accepted(),
        }
    }
}
