//! Cache path resolution
//!
//! All persisted state lives in a `cache/` folder directly under the
//! process working directory:
//!
//! - `cache/cache.json`: trip snapshot
//! - `cache/people_cache.json`: members and hosts snapshot
//! - `cache/settings.json`: user settings
//! - `cache/audit.log`: append-only audit log
//!
//! The folder is not created implicitly. Resolving paths against a working
//! directory without `cache/` is an error; `trip init` creates it.

use std::path::{Path, PathBuf};

use crate::error::{TripError, TripResult};

/// Name of the cache folder inside the working directory
pub const CACHE_DIR_NAME: &str = "cache";

/// Resolves the on-disk cache files
#[derive(Debug, Clone)]
pub struct CachePaths {
    /// Working directory the cache folder is resolved against
    working_dir: PathBuf,
}

impl CachePaths {
    /// Resolve against the process working directory
    ///
    /// # Errors
    ///
    /// Returns `CacheFolderNotFound` if `./cache` does not exist.
    pub fn from_current_dir() -> TripResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| TripError::Io(format!("Failed to read working directory: {}", e)))?;
        Self::resolve(cwd)
    }

    /// Resolve against an explicit working directory, requiring `cache/`
    pub fn resolve(working_dir: impl Into<PathBuf>) -> TripResult<Self> {
        let paths = Self::with_working_dir(working_dir);
        if !paths.cache_dir().is_dir() {
            return Err(TripError::CacheFolderNotFound(paths.working_dir));
        }
        Ok(paths)
    }

    /// Build paths without checking the cache folder (useful for testing and `init`)
    pub fn with_working_dir(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    /// Get the working directory
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Get the cache directory (`<working dir>/cache`)
    pub fn cache_dir(&self) -> PathBuf {
        self.working_dir.join(CACHE_DIR_NAME)
    }

    /// Get the path to the trip cache
    pub fn trip_cache_file(&self) -> PathBuf {
        self.cache_dir().join("cache.json")
    }

    /// Get the path to the people cache
    pub fn people_cache_file(&self) -> PathBuf {
        self.cache_dir().join("people_cache.json")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.cache_dir().join("settings.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.cache_dir().join("audit.log")
    }

    /// Check whether the cache folder exists
    pub fn cache_dir_exists(&self) -> bool {
        self.cache_dir().is_dir()
    }

    /// Create the cache folder if missing
    pub fn ensure_cache_dir(&self) -> TripResult<()> {
        std::fs::create_dir_all(self.cache_dir())
            .map_err(|e| TripError::Io(format!("Failed to create cache directory: {}", e)))
    }
}
