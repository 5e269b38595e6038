//! Mirroring of uncompiled sources into the output tree.
//!
//! Sources that are not compiled still have to be loadable from the output
//! directory, so each one gets a copy rule placing it at the same relative
//! path beneath the target.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use kiln_common::{UnitId, SOURCE_EXT};
use kiln_engine::RuleGraph;
use tracing::debug;

use crate::error::BuildError;
use crate::namespace::unit_of;
use crate::walk::{all_files_under, has_extension};

/// Registers copy rules for every source under `roots` whose unit is not in `done`.
///
/// Unlike discovery, the walk enters hidden directories. Returns the number
/// of rules added. Two roots mirroring onto the same destination is a
/// duplicate-namespace error.
pub fn register_copies(
    graph: &mut RuleGraph<'_>,
    roots: &[PathBuf],
    done: &BTreeSet<UnitId>,
    target: &Path,
) -> Result<usize, BuildError> {
    let mut claimed: HashMap<PathBuf, UnitId> = HashMap::new();
    for root in roots {
        for source in all_files_under(root).filter(|f| has_extension(f, SOURCE_EXT)) {
            let Some(id) = unit_of(root, &source) else {
                continue;
            };
            if done.contains(&id) {
                continue;
            }
            let Ok(rel) = source.strip_prefix(root) else {
                continue;
            };
            let dest = target.join(rel);
            if claimed.contains_key(&dest) {
                return Err(BuildError::DuplicateNamespace(id));
            }
            debug!(unit = %id, output = %dest.display(), "registering copy rule");
            graph.copy(source.clone(), dest.clone());
            claimed.insert(dest, id);
        }
    }
    Ok(claimed.len())
}
