//! Unit discovery beneath source roots.
//!
//! The pure identifier/path mapping lives on [`UnitId`]; this module adds the
//! file-system side: which entries are source roots, and which units a root
//! contains.

use std::path::{Path, PathBuf};

use kiln_common::{UnitId, SOURCE_EXT};
use tracing::warn;

use crate::walk::{files_under, has_extension};

/// Returns the entries of `sources` that are directories, in order.
///
/// Other entries are individually listed files and are not scanned.
pub fn source_roots(sources: &[PathBuf]) -> Vec<PathBuf> {
    sources.iter().filter(|s| s.is_dir()).cloned().collect()
}

/// Derives the unit identifier of `file` relative to `root`.
///
/// Returns `None` if `file` is not a source file beneath `root` or its path
/// is not valid UTF-8.
pub fn unit_of(root: &Path, file: &Path) -> Option<UnitId> {
    if !has_extension(file, SOURCE_EXT) {
        return None;
    }
    let rel = file.strip_prefix(root).ok()?.with_extension("");
    let mut segments = Vec::new();
    for component in rel.components() {
        segments.push(component.as_os_str().to_str()?);
    }
    if segments.is_empty() {
        return None;
    }
    Some(UnitId::from_path(&segments.join("/")))
}

/// Enumerates the units of every source file beneath `root`.
///
/// The sequence is lazy and finite; call again to restart it. Entries are
/// visited in file-name order.
pub fn discover(root: &Path) -> impl Iterator<Item = UnitId> {
    let root = root.to_path_buf();
    files_under(&root)
        .filter(|file| has_extension(file, SOURCE_EXT))
        .filter_map(move |file| {
            let id = unit_of(&root, &file);
            if id.is_none() {
                warn!(file = %file.display(), "cannot derive a unit name, skipping");
            }
            id
        })
}

/// Enumerates the units of every root, root by root.
pub fn discover_all(roots: &[PathBuf]) -> Vec<UnitId> {
    roots.iter().flat_map(|root| discover(root)).collect()
}
