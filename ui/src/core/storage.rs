//! Local persistence of the last analysis result.
//!
//! Two logical entries, always written and cleared together: the serialized
//! [`AnalysisResult`] and an ISO-8601 timestamp of the save. On the web this
//! is browser local storage; native builds keep a JSON file in the platform
//! data directory. A cache that fails to deserialize is purged and reported
//! as absent, so the user simply proceeds as if nothing had been saved.

#[cfg(not(target_arch = "wasm32"))]
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use super::payload::AnalysisResult;

pub const ANALYSIS_KEY: &str = "sheetsense.analysis";
pub const SAVED_AT_KEY: &str = "sheetsense.analysis_saved_at";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("couldn't serialize analysis: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage backend unavailable: {0}")]
    Backend(String),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

/// What a successful cache load hands back.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedAnalysis {
    pub result: AnalysisResult,
    /// RFC 3339 stamp of the save; `None` if the stamp entry went missing.
    pub saved_at: Option<String>,
}

fn now_stamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

#[cfg(target_arch = "wasm32")]
mod backend {
    use gloo_storage::{LocalStorage, Storage};

    use super::*;

    pub fn save(result: &AnalysisResult) -> Result<String, StorageError> {
        let serialized = serde_json::to_string(result)?;
        let stamp = now_stamp();
        LocalStorage::set(ANALYSIS_KEY, serialized)
            .map_err(|err| StorageError::Backend(err.to_string()))?;
        LocalStorage::set(SAVED_AT_KEY, stamp.clone())
            .map_err(|err| StorageError::Backend(err.to_string()))?;
        Ok(stamp)
    }

    pub fn load() -> Result<Option<CachedAnalysis>, StorageError> {
        let serialized: String = match LocalStorage::get(ANALYSIS_KEY) {
            Ok(value) => value,
            Err(_) => return Ok(None),
        };
        match serde_json::from_str(&serialized) {
            Ok(result) => {
                let saved_at: Option<String> = LocalStorage::get(SAVED_AT_KEY).ok();
                Ok(Some(CachedAnalysis { result, saved_at }))
            }
            Err(err) => {
                tracing::warn!(%err, "purging corrupted analysis cache");
                clear();
                Ok(None)
            }
        }
    }

    pub fn clear() {
        LocalStorage::delete(ANALYSIS_KEY);
        LocalStorage::delete(SAVED_AT_KEY);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod backend {
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::*;

    /// On-disk form: both logical entries in one file so they can't drift.
    #[derive(Serialize, Deserialize)]
    struct CacheFile {
        saved_at: String,
        result: AnalysisResult,
    }

    fn cache_dir() -> Result<PathBuf, StorageError> {
        if let Ok(dir) = std::env::var("SHEETSENSE_DATA_DIR") {
            return Ok(PathBuf::from(dir));
        }
        dirs::data_dir()
            .map(|dir| dir.join("sheetsense"))
            .ok_or_else(|| StorageError::Backend("no platform data directory".into()))
    }

    fn cache_path(dir: &Path) -> PathBuf {
        dir.join("analysis.json")
    }

    pub fn save(result: &AnalysisResult) -> Result<String, StorageError> {
        let dir = cache_dir()?;
        save_in(&dir, result)
    }

    pub fn load() -> Result<Option<CachedAnalysis>, StorageError> {
        let dir = cache_dir()?;
        load_in(&dir)
    }

    pub fn clear() {
        if let Ok(dir) = cache_dir() {
            clear_in(&dir);
        }
    }

    pub(crate) fn save_in(dir: &Path, result: &AnalysisResult) -> Result<String, StorageError> {
        let stamp = now_stamp();
        let file = CacheFile {
            saved_at: stamp.clone(),
            result: result.clone(),
        };
        fs::create_dir_all(dir)?;
        fs::write(cache_path(dir), serde_json::to_vec_pretty(&file)?)?;
        Ok(stamp)
    }

    pub(crate) fn load_in(dir: &Path) -> Result<Option<CachedAnalysis>, StorageError> {
        let path = cache_path(dir);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_slice::<CacheFile>(&bytes) {
            Ok(file) => Ok(Some(CachedAnalysis {
                result: file.result,
                saved_at: Some(file.saved_at),
            })),
            Err(err) => {
                tracing::warn!(%err, path = %path.display(), "purging corrupted analysis cache");
                clear_in(dir);
                Ok(None)
            }
        }
    }

    pub(crate) fn clear_in(dir: &Path) {
        let _ = fs::remove_file(cache_path(dir));
    }
}

/// Persist the analysis and return the timestamp it was saved under.
pub fn save_analysis(result: &AnalysisResult) -> Result<String, StorageError> {
    backend::save(result)
}

/// Load the cached analysis, if any. A corrupted cache is purged and
/// reported as `Ok(None)`.
pub fn load_analysis() -> Result<Option<CachedAnalysis>, StorageError> {
    backend::load()
}

/// Remove both cache entries.
pub fn clear_analysis() {
    backend::clear();
}
