//! The kiln compiler driver.
//!
//! Orchestrates ahead-of-time compilation of a Clojure source tree: it derives
//! unit identifiers from the directory layout, registers one rule per
//! requested unit against a single batched compiler invocation, mirrors the
//! remaining sources into the output tree, and finally hands mixed sources to
//! at most one secondary compiler (Scala, Groovy or Java).
//!
//! Compilation itself is done by external processes. Rules are executed by
//! an [`IncrementalEngine`](kiln_engine::IncrementalEngine).

#![warn(missing_docs)]

pub mod classpath;
pub mod compiler;
pub mod detect;
pub mod dispatch;
pub mod error;
pub mod invoke;
pub mod mirror;
pub mod namespace;
pub mod process;
pub mod secondary;
pub mod suite;
pub mod unit_graph;

mod walk;

pub use classpath::{ClasspathEntry, DependencyResolver, LocalRepository, PATH_SEPARATOR};
pub use compiler::{Cljc, CompileSummary, Toolchain};
pub use detect::SecondaryLanguage;
pub use dispatch::MixedMode;
pub use error::BuildError;
pub use process::{Invocation, ProcessRunner, SystemRunner};
pub use secondary::SecondaryCompiler;
pub use suite::{SuiteOutcome, TestSuites};
