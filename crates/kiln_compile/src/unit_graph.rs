//! Per-unit compile rules.
//!
//! Each requested unit is located in exactly one source root and registered
//! as `<target>/<path>__init.class` depending on its source file. All rules
//! share the one compile action, so a single invocation refreshes every stale
//! unit.

use std::path::{Path, PathBuf};

use kiln_common::UnitId;
use kiln_engine::{ActionId, RuleGraph};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::BuildError;

/// A requested unit together with the root holding its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocatedUnit {
    /// The unit identifier.
    pub id: UnitId,
    /// The source root that contains it.
    pub root: PathBuf,
    /// The unit's source file.
    pub source: PathBuf,
}

/// Finds the one root among `roots` that contains the source of `id`.
///
/// Returns `Ok(None)` if no root has it, and a duplicate error if more than
/// one does.
pub fn locate(id: &UnitId, roots: &[PathBuf]) -> Result<Option<LocatedUnit>, BuildError> {
    let mut found: Option<LocatedUnit> = None;
    for root in roots {
        let source = id.source_file(root);
        if !source.is_file() {
            continue;
        }
        if found.is_some() {
            return Err(BuildError::DuplicateNamespace(id.clone()));
        }
        found = Some(LocatedUnit {
            id: id.clone(),
            root: root.clone(),
            source,
        });
    }
    Ok(found)
}

/// Registers one rule per locatable unit of `libs`, in list order.
///
/// Units that no root contains are skipped with a warning. The first
/// duplicate stops registration.
pub fn register(
    graph: &mut RuleGraph<'_>,
    action: ActionId,
    libs: &[UnitId],
    roots: &[PathBuf],
    target: &Path,
) -> Result<Vec<LocatedUnit>, BuildError> {
    let mut located = Vec::with_capacity(libs.len());
    for id in libs {
        let Some(unit) = locate(id, roots)? else {
            warn!(unit = %id, "no source file found in any source root, skipping");
            continue;
        };
        let artifact = id.init_artifact(target);
        debug!(unit = %id, output = %artifact.display(), "registering compile rule");
        graph.depend(artifact, unit.source.clone(), action);
        located.push(unit);
    }
    Ok(located)
}
