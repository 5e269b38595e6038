//! Recursive file enumeration shared by unit discovery and language detection.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::warn;

/// Returns every regular file beneath `root`, in file-name order.
///
/// Hidden entries are skipped and symlinks followed, the way a shell glob
/// like `**/*.clj` behaves. Unreadable entries are logged and skipped.
pub(crate) fn files_under(root: &Path) -> impl Iterator<Item = PathBuf> {
    walk(root, true)
}

/// Like [`files_under`], but descends into hidden directories and yields
/// hidden files too.
pub(crate) fn all_files_under(root: &Path) -> impl Iterator<Item = PathBuf> {
    walk(root, false)
}

fn walk(root: &Path, skip_hidden: bool) -> impl Iterator<Item = PathBuf> {
    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .hidden(skip_hidden)
        .follow_links(true)
        .sort_by_file_name(|a, b| a.cmp(b));

    builder.build().filter_map(|entry| match entry {
        Ok(entry) if entry.file_type().is_some_and(|t| t.is_file()) => Some(entry.into_path()),
        Ok(_) => None,
        Err(err) => {
            warn!(%err, "skipping unreadable entry");
            None
        }
    })
}

/// Returns `true` if `path` has extension `ext`.
pub(crate) fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e == ext)
}
