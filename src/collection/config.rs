//! Store configuration
//!
//! The root directory is resolved by the caller; the store only joins
//! the collection name onto it.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::thread;

use super::errors::{CollectionError, CollectionResult};

/// Fallback worker limit when the available parallelism is unknown.
pub const FALLBACK_MAX_CONCURRENCY: usize = 4;

/// Configuration shared by every collection under one root.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding one sub-directory per collection.
    pub root_dir: PathBuf,
    /// Upper bound on worker threads used by one batch operation.
    pub max_concurrency: usize,
}

impl StoreConfig {
    /// Create config for `root_dir` with the default worker limit.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            max_concurrency: default_max_concurrency(),
        }
    }

    /// Override the batch worker limit.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Get the root directory.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Reject settings no store can run with.
    pub fn validate(&self) -> CollectionResult<()> {
        if self.max_concurrency == 0 {
            return Err(CollectionError::Configuration(
                "max_concurrency must be at least 1".into(),
            ));
        }
        if self.root_dir.as_os_str().is_empty() {
            return Err(CollectionError::Configuration(
                "root_dir must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn default_max_concurrency() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(FALLBACK_MAX_CONCURRENCY)
}
