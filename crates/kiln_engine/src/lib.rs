//! Incremental file-rule execution.
//!
//! Rules describe a target file that depends on a source file and the action
//! that rebuilds it. Rules are collected into a [`RuleGraph`] and handed to an
//! [`IncrementalEngine`], which decides staleness and runs actions. Several
//! rules may share one action; it runs at most once per execution.

#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod freshness;
pub mod rule;

pub use engine::{BuildReport, IncrementalEngine, TimestampEngine};
pub use error::{ActionError, EngineError};
pub use freshness::Freshness;
pub use rule::{Action, ActionId, DependencyRule, RuleAction, RuleGraph};
