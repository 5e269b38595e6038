//! Rule graph execution.
//!
//! [`TimestampEngine`] checks the [`Freshness`] of every rule in a
//! [`RuleGraph`], then brings stale targets up to date in registration order. Shared
//! actions are deduplicated within one execution, so any number of stale
//! rules pointing at the same action cause a single run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::EngineError;
use crate::freshness::Freshness;
use crate::rule::{ActionId, RuleAction, RuleGraph};

/// Executes the rules of a graph.
pub trait IncrementalEngine {
    /// Evaluates every rule in registration order.
    ///
    /// Stops at the first failure; nothing is rolled back.
    fn execute(&self, graph: &RuleGraph<'_>) -> Result<BuildReport, EngineError>;
}

/// Outcome of one engine execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Targets that were already up to date.
    pub fresh: Vec<PathBuf>,

    /// Targets of stale action rules.
    pub rebuilt: Vec<PathBuf>,

    /// Targets written by copy rules.
    pub copied: Vec<PathBuf>,

    /// Number of distinct actions that ran.
    pub actions_run: usize,
}

impl BuildReport {
    /// Returns `true` if nothing was rebuilt or copied.
    pub fn is_noop(&self) -> bool {
        self.rebuilt.is_empty() && self.copied.is_empty()
    }
}

/// Engine that rebuilds targets that are missing or older than their source.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampEngine {
    force: bool,
}

impl TimestampEngine {
    /// Creates an engine using timestamp comparison.
    pub fn new() -> Self {
        Self { force: false }
    }

    /// Treats every rule as stale when `force` is set.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    fn freshness(&self, source: &Path, target: &Path) -> Result<Freshness, EngineError> {
        if self.force {
            return Ok(Freshness::Outdated);
        }
        Freshness::check(source, target)
    }
}

impl IncrementalEngine for TimestampEngine {
    fn execute(&self, graph: &RuleGraph<'_>) -> Result<BuildReport, EngineError> {
        let mut report = BuildReport::default();
        let mut ran: HashSet<ActionId> = HashSet::new();

        // Decide staleness up front: a shared action writes the targets of
        // later rules, which must still count as rebuilt.
        let states = graph
            .rules()
            .iter()
            .map(|rule| self.freshness(&rule.source, &rule.target))
            .collect::<Result<Vec<_>, _>>()?;

        for (rule, state) in graph.rules().iter().zip(states) {
            if !state.is_stale() {
                debug!(output = %rule.target.display(), "up to date");
                report.fresh.push(rule.target.clone());
                continue;
            }

            match rule.action {
                RuleAction::Invoke(id) => {
                    if ran.insert(id) {
                        let action = graph.action(id);
                        debug!(
                            output = %rule.target.display(),
                            ?state,
                            action = %action.label(),
                            "stale, running action"
                        );
                        action.run().map_err(|source| EngineError::ActionFailed {
                            label: action.label(),
                            source,
                        })?;
                        report.actions_run += 1;
                    } else {
                        debug!(output = %rule.target.display(), "covered by earlier run");
                    }
                    report.rebuilt.push(rule.target.clone());
                }
                RuleAction::Copy => {
                    debug!(
                        input = %rule.source.display(),
                        output = %rule.target.display(),
                        "copying"
                    );
                    copy_file(&rule.source, &rule.target)?;
                    report.copied.push(rule.target.clone());
                }
            }
        }

        Ok(report)
    }
}

/// Copies `source` to `target`, creating the destination directory on demand.
fn copy_file(source: &Path, target: &Path) -> Result<(), EngineError> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| EngineError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::copy(source, target).map_err(|e| EngineError::Io {
        path: target.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
