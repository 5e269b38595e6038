//! Dependency rules and the graph that owns them.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ActionError;

/// Work that rebuilds one or more rule targets.
///
/// An action registered once and referenced by many rules is run at most
/// once per engine execution.
pub trait Action {
    /// Short name used in logs and error messages.
    fn label(&self) -> String;

    /// Performs the action. Blocks until it completes.
    fn run(&self) -> Result<(), ActionError>;
}

/// Handle to an action registered in a [`RuleGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActionId(usize);

/// What the engine does when a rule's target is stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleAction {
    /// Run a shared action.
    Invoke(ActionId),
    /// Copy the source file to the target, creating parent directories.
    Copy,
}

/// A `target depends-on source` rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DependencyRule {
    /// The file the rule produces.
    pub target: PathBuf,
    /// The file the target is derived from.
    pub source: PathBuf,
    /// How to bring the target up to date.
    pub action: RuleAction,
}

/// Rules and the actions they reference, in registration order.
///
/// A graph is built fresh for every compile call and owned by it.
#[derive(Default)]
pub struct RuleGraph<'a> {
    actions: Vec<Box<dyn Action + 'a>>,
    rules: Vec<DependencyRule>,
}

impl<'a> RuleGraph<'a> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            rules: Vec::new(),
        }
    }

    /// Registers an action that rules can share.
    pub fn add_action(&mut self, action: impl Action + 'a) -> ActionId {
        self.actions.push(Box::new(action));
        ActionId(self.actions.len() - 1)
    }

    /// Registers `target` depending on `source`, rebuilt by `action`.
    pub fn depend(&mut self, target: PathBuf, source: PathBuf, action: ActionId) {
        self.rules.push(DependencyRule {
            target,
            source,
            action: RuleAction::Invoke(action),
        });
    }

    /// Registers a verbatim copy of `source` to `target`.
    pub fn copy(&mut self, source: PathBuf, target: PathBuf) {
        self.rules.push(DependencyRule {
            target,
            source,
            action: RuleAction::Copy,
        });
    }

    /// Returns the action behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different graph.
    pub fn action(&self, id: ActionId) -> &dyn Action {
        self.actions[id.0].as_ref()
    }

    /// All rules in registration order.
    pub fn rules(&self) -> &[DependencyRule] {
        &self.rules
    }

    /// Finds the rule producing `target`, if any.
    pub fn rule_for(&self, target: &Path) -> Option<&DependencyRule> {
        self.rules.iter().find(|r| r.target == target)
    }

    /// Returns `true` if no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

impl fmt::Debug for RuleGraph<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.actions.iter().map(|a| a.label()).collect();
        f.debug_struct("RuleGraph")
            .field("actions", &labels)
            .field("rules", &self.rules)
            .finish()
    }
}
