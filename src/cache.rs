use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use serde::{Deserialize, Serialize};
use log::{debug, error};
use crate::error::Result;
use crate::model::ResultEntry;

#[derive(Serialize, Deserialize)]
struct CacheFile {
    /// Unix seconds at write time.
    #[serde(default)]
    time: f64,
    packages: Vec<ResultEntry>,
}

/// File-backed copy of the last successful "list installed" result.
///
/// No locking: a torn or concurrent write just reads back as a miss.
pub struct InstalledCache {
    path: PathBuf,
    ttl: Duration,
}

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

impl InstalledCache {
    pub fn new(path: PathBuf, ttl: Duration) -> Self {
        Self { path, ttl }
    }

    #[cfg(test)]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Cached entries, if the file exists, parses, and is younger than the TTL.
    pub fn read(&self) -> Option<Vec<ResultEntry>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                error!("Error reading cache {:?}: {}", self.path, e);
                return None;
            }
        };

        let cache: CacheFile = match serde_json::from_str(&content) {
            Ok(cache) => cache,
            Err(e) => {
                error!("Error reading cache {:?}: {}", self.path, e);
                return None;
            }
        };

        let age = now_secs() - cache.time;
        if age < self.ttl.as_secs_f64() {
            debug!("Cache hit: {} packages, {:.0}s old", cache.packages.len(), age);
            Some(cache.packages)
        } else {
            debug!("Cache expired ({:.0}s old)", age);
            None
        }
    }

    pub fn write(&self, entries: &[ResultEntry]) {
        if let Err(e) = self.write_at(entries, now_secs()) {
            error!("Error writing cache {:?}: {}", self.path, e);
        }
    }

    fn write_at(&self, entries: &[ResultEntry], time: f64) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let cache = CacheFile {
            time,
            packages: entries.to_vec(),
        };
        fs::write(&self.path, serde_json::to_string(&cache)?)?;
        Ok(())
    }

    pub fn invalidate(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Cache invalidated"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => error!("Error invalidating cache {:?}: {}", self.path, e),
        }
    }
}
