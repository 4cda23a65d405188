use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub value: String,
    pub stored_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredEntry {
    pub fn new(value: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            value,
            stored_at: Utc::now(),
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|at| Utc::now() >= at).unwrap_or(false)
    }
}

/// File-backed string key-value store holding the session cookies.
///
/// Every write is flushed to disk immediately.
pub struct TokenStore {
    path: PathBuf,
    entries: BTreeMap<String, StoredEntry>,
}

impl TokenStore {
    /// Open the store at `path`, loading it if the file exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read token store: {}", path.display()))?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse token store: {}", path.display()))?
            }
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), entries = entries.len(), "Token store opened");
        Ok(Self { path, entries })
    }

    /// Value for `key`, unless missing or expired
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.as_str())
    }

    pub fn set(&mut self, key: &str, value: &str, expires_at: Option<DateTime<Utc>>) -> Result<()> {
        self.entries
            .insert(key.to_string(), StoredEntry::new(value.to_string(), expires_at));
        self.save()
    }

    /// Remove `key`, returning whether it was present
    pub fn remove(&mut self, key: &str) -> Result<bool> {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create token store directory: {}", parent.display())
                })?;
            }
        }
        let contents =
            serde_json::to_string_pretty(&self.entries).context("Failed to serialize token store")?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write token store: {}", self.path.display()))?;
        Ok(())
    }
}
