//! Parsed-history cache keyed by file content.
//!
//! A render pass normally reparses the table. When the same process renders
//! repeatedly, the cache skips the parse while the file's modification time is
//! unchanged, and skips it again after a touch that left the bytes identical.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::{file_sha256, load_history, GameHistory};
use crate::error::{Result, StatsError};
use crate::logging::log_cache;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// mtime unchanged, nothing read.
    Hit,
    /// mtime changed but the sha256 matched; only the mtime was refreshed.
    Revalidated,
    /// Parsed from disk.
    Miss,
}

impl CacheOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheOutcome::Hit => "hit",
            CacheOutcome::Revalidated => "revalidated",
            CacheOutcome::Miss => "miss",
        }
    }
}

struct CacheEntry {
    modified: SystemTime,
    hash_sha256: String,
    history: Arc<GameHistory>,
}

#[derive(Default)]
pub struct HistoryCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl HistoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<GameHistory>> {
        self.get_or_load_with_outcome(path).map(|(h, _)| h)
    }

    pub fn get_or_load_with_outcome(
        &mut self,
        path: &Path,
    ) -> Result<(Arc<GameHistory>, CacheOutcome)> {
        let modified = fs::metadata(path)
            .and_then(|m| m.modified())
            .map_err(|e| StatsError::io(path, e))?;
        let display = path.display().to_string();

        let mut known_hash = None;
        if let Some(entry) = self.entries.get_mut(path) {
            if entry.modified == modified {
                log_cache(&display, CacheOutcome::Hit.as_str(), &entry.hash_sha256);
                return Ok((Arc::clone(&entry.history), CacheOutcome::Hit));
            }
            let hash = file_sha256(path)?;
            if hash == entry.hash_sha256 {
                entry.modified = modified;
                log_cache(&display, CacheOutcome::Revalidated.as_str(), &hash);
                return Ok((Arc::clone(&entry.history), CacheOutcome::Revalidated));
            }
            known_hash = Some(hash);
        }

        let hash = match known_hash {
            Some(hash) => hash,
            None => file_sha256(path)?,
        };
        let history = Arc::new(load_history(path)?);
        log_cache(&display, CacheOutcome::Miss.as_str(), &hash);
        self.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                modified,
                hash_sha256: hash,
                history: Arc::clone(&history),
            },
        );
        Ok((history, CacheOutcome::Miss))
    }

    /// sha256 of the cached content for `path`, if loaded.
    pub fn fingerprint(&self, path: &Path) -> Option<&str> {
        self.entries.get(path).map(|e| e.hash_sha256.as_str())
    }

    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
