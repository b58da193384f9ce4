// 💾 Cache Store - local snapshot of the raw API response
//
// Presence of the cache file short-circuits the network fetch entirely.
// Single-process access only; there is no file locking.

use crate::error::{ParkError, ParkResult};
use crate::source::{ParkResponse, ParkSource};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Indent used for the cache file
const CACHE_INDENT: &[u8] = b"      ";

/// Where the catalog's raw data came from on this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Fetched,
}

pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        CacheStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Last write time of the cache file, if present
    pub fn modified_at(&self) -> Option<DateTime<Local>> {
        let modified = fs::metadata(&self.path).and_then(|m| m.modified()).ok()?;
        Some(DateTime::<Local>::from(modified))
    }

    /// Read the snapshot; `Ok(None)` when no cache file exists
    pub fn load(&self) -> ParkResult<Option<ParkResponse>> {
        if !self.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| self.error(e))?;
        let response = serde_json::from_str(&content).map_err(|e| self.error(e))?;

        Ok(Some(response))
    }

    /// Write the snapshot, pretty-printed for human reading
    pub fn store(&self, response: &ParkResponse) -> ParkResult<()> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(CACHE_INDENT);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        response.serialize(&mut ser).map_err(|e| self.error(e))?;

        fs::write(&self.path, buf).map_err(|e| self.error(e))?;
        debug!(path = %self.path.display(), "Wrote park cache");

        Ok(())
    }

    /// Return the cached snapshot, or fetch from `source` and cache the result
    pub fn load_or_fetch(&self, source: &dyn ParkSource) -> ParkResult<(ParkResponse, CacheStatus)> {
        if let Some(response) = self.load()? {
            info!(
                path = %self.path.display(),
                records = response.data.len(),
                "Using cached park data"
            );
            return Ok((response, CacheStatus::Hit));
        }

        info!(path = %self.path.display(), "No park cache, fetching");
        let response = self.refresh(source)?;

        Ok((response, CacheStatus::Fetched))
    }

    /// Fetch unconditionally and overwrite the cache
    pub fn refresh(&self, source: &dyn ParkSource) -> ParkResult<ParkResponse> {
        let response = source.fetch()?;
        self.store(&response)?;
        Ok(response)
    }

    fn error<E: std::fmt::Display>(&self, e: E) -> ParkError {
        ParkError::Cache {
            path: self.path.display().to_string(),
            message: e.to_string(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
