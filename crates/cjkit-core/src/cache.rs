//! File-backed caching for decoded API responses.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Defines how a single API call interacts with the response cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    /// Read from the cache if a non-expired entry is present;
    /// otherwise, fetch from the network and write the response to the cache. (Default)
    Use,
    /// Always fetch from the network, bypassing any cached entry,
    /// and write the new response to the cache.
    Refresh,
    /// Always fetch from the network and do not read from or write to the cache.
    Bypass,
}

impl Default for CacheMode {
    fn default() -> Self {
        Self::Use
    }
}

/// File-backed TTL cache for decoded responses.
///
/// One file per key under the cache directory, named by the SHA-256 of the
/// key. Entry age is the file's modification time; expired entries are
/// removed on read. All I/O failures degrade to a miss so a broken cache
/// never fails an API call. Concurrent writers are last-write-wins; a torn
/// entry fails to parse and is treated as a miss.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    enabled: bool,
    ttl: Duration,
    dir: PathBuf,
}

impl ResponseCache {
    /// Create a cache rooted at `dir`. The directory is created up front
    /// when the cache is enabled.
    pub fn new(enabled: bool, ttl: Duration, dir: impl Into<PathBuf>) -> Self {
        let cache = Self {
            enabled,
            ttl,
            dir: dir.into(),
        };
        if cache.enabled {
            let _ = std::fs::create_dir_all(&cache.dir);
        }
        cache
    }

    /// Create a cache under the system temp directory.
    pub fn in_temp_dir(enabled: bool, ttl: Duration) -> Self {
        Self::new(enabled, ttl, std::env::temp_dir().join("cjkit-cache"))
    }

    /// Create a disabled cache: gets miss, sets are dropped.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ttl: Duration::ZERO,
            dir: std::env::temp_dir().join("cjkit-cache"),
        }
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Get a cached value for the given key.
    ///
    /// Returns `None` if:
    /// - The cache is disabled
    /// - No entry exists for the key
    /// - The entry is older than the TTL (the file is deleted as a side effect)
    /// - The entry cannot be read or parsed (also deleted)
    pub fn get(&self, key: &str) -> Option<Value> {
        if !self.enabled {
            return None;
        }

        let path = self.entry_path(key);
        let modified = std::fs::metadata(&path).ok()?.modified().ok()?;
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        if age > self.ttl {
            let _ = std::fs::remove_file(&path);
            return None;
        }

        let parsed = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok());
        if parsed.is_none() {
            let _ = std::fs::remove_file(&path);
        }
        parsed
    }

    /// Store a value under the given key. Returns `false` when the cache is
    /// disabled or the write fails.
    pub fn set(&self, key: &str, value: &Value) -> bool {
        if !self.enabled {
            return false;
        }
        if std::fs::create_dir_all(&self.dir).is_err() {
            return false;
        }

        let Ok(raw) = serde_json::to_string(value) else {
            return false;
        };
        std::fs::write(self.entry_path(key), raw).is_ok()
    }

    /// Remove a single entry. Returns `true` only when a file was removed.
    pub fn delete(&self, key: &str) -> bool {
        if !self.enabled {
            return false;
        }
        std::fs::remove_file(self.entry_path(key)).is_ok()
    }

    /// Remove every cache entry in the directory. Files without the cache
    /// extension are left alone. Returns `false` when disabled or the
    /// directory cannot be read.
    pub fn clear(&self) -> bool {
        if !self.enabled {
            return false;
        }
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return false;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                let _ = std::fs::remove_file(&path);
            }
        }
        true
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        self.dir.join(format!("{:x}.json", hasher.finalize()))
    }
}
