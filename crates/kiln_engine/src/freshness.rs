//! Timestamp-based staleness checks.
//!
//! A target is up to date when it exists and is not older than its source.
//! Nothing is persisted between runs; the file system is the only record.

use std::path::Path;
use std::time::SystemTime;

use crate::error::EngineError;

/// The state of a rule target relative to its source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Freshness {
    /// The target does not exist.
    Missing,
    /// The source was modified after the target.
    Outdated,
    /// The target is at least as new as the source.
    Fresh,
}

impl Freshness {
    /// Compares modification times of `source` and `target`.
    ///
    /// The source must exist; a missing source is an error.
    pub fn check(source: &Path, target: &Path) -> Result<Self, EngineError> {
        let source_time = modified(source)?;
        if !target.exists() {
            return Ok(Freshness::Missing);
        }
        let target_time = modified(target)?;
        if source_time > target_time {
            Ok(Freshness::Outdated)
        } else {
            Ok(Freshness::Fresh)
        }
    }

    /// Returns `true` if the target needs rebuilding.
    pub fn is_stale(self) -> bool {
        self != Freshness::Fresh
    }
}

fn modified(path: &Path) -> Result<SystemTime, EngineError> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })
}
