//! The compile entry point.
//!
//! A call runs in two phases. Planning resolves the classpath, locates every
//! requested unit and registers compile and copy rules in a fresh
//! [`RuleGraph`]; any duplicate aborts here, before anything is written.
//! Execution hands the graph to the engine and then dispatches to at most one
//! secondary compiler.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use kiln_common::UnitId;
use kiln_config::{CompileOptions, ResolvedToolchain};
use kiln_engine::{BuildReport, IncrementalEngine, RuleGraph};
use serde::Serialize;
use tracing::{debug, trace};

use crate::classpath::{self, absolute, render, ClasspathEntry, DependencyResolver};
use crate::dispatch::{dispatch, MixedMode};
use crate::error::BuildError;
use crate::invoke::{compile_invocation, CompileAction};
use crate::mirror::register_copies;
use crate::namespace::{discover_all, source_roots};
use crate::process::ProcessRunner;
use crate::unit_graph::{register, LocatedUnit};

/// External tools and the runtime artifacts they need.
pub struct Toolchain<'a> {
    /// The `java` launcher.
    pub java: PathBuf,
    /// The `javac` compiler.
    pub javac: PathBuf,
    /// The `scalac` compiler.
    pub scalac: PathBuf,
    /// The `groovyc` compiler.
    pub groovyc: PathBuf,
    /// Clojure runtime entries, appended to every classpath.
    pub runtime: Vec<ClasspathEntry>,
    /// Resolves artifact coordinates.
    pub resolver: &'a dyn DependencyResolver,
    /// Runs external processes.
    pub runner: &'a dyn ProcessRunner,
}

impl<'a> Toolchain<'a> {
    /// Builds a toolchain from resolved tool locations.
    pub fn from_resolved(
        tools: &ResolvedToolchain,
        runtime: Vec<ClasspathEntry>,
        resolver: &'a dyn DependencyResolver,
        runner: &'a dyn ProcessRunner,
    ) -> Self {
        Self {
            java: tools.java.clone(),
            javac: tools.javac.clone(),
            scalac: tools.scalac.clone(),
            groovyc: tools.groovyc.clone(),
            runtime,
            resolver,
            runner,
        }
    }

    /// Resolves `entries` followed by the runtime into absolute paths.
    pub fn classpath(&self, entries: Vec<ClasspathEntry>) -> Result<Vec<PathBuf>, BuildError> {
        let mut all = entries;
        all.extend(self.runtime.iter().cloned());
        classpath::resolve(&all, self.resolver)
    }
}

/// What one compile call did.
#[derive(Debug, Clone, Serialize)]
pub struct CompileSummary {
    /// Units handed to the compiler.
    pub libs: Vec<UnitId>,
    /// Units that had a source file and got a rule.
    pub located: Vec<LocatedUnit>,
    /// Uncompiled sources mirrored into the target.
    pub mirrored: usize,
    /// What the engine rebuilt, copied or skipped.
    pub report: BuildReport,
    /// The secondary compiler that ran, if any.
    pub mixed: MixedMode,
}

/// The Clojure compiler driver.
pub struct Cljc<'a> {
    options: CompileOptions,
    toolchain: Toolchain<'a>,
}

impl<'a> Cljc<'a> {
    /// Creates a driver with validated `options`.
    pub fn new(options: CompileOptions, toolchain: Toolchain<'a>) -> Self {
        Self { options, toolchain }
    }

    /// The options in effect.
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compiles `sources` into `target`.
    ///
    /// Directories in `sources` are source roots; files are only seen by the
    /// secondary compilers. `target` need not exist.
    pub fn compile(
        &self,
        sources: &[PathBuf],
        target: &Path,
        dependencies: &[ClasspathEntry],
        engine: &dyn IncrementalEngine,
    ) -> Result<CompileSummary, BuildError> {
        let roots = source_roots(sources);
        let target = absolute(target)?;
        trace!(target = %target.display(), "target");
        trace!(?sources, "sources");

        let libs = match &self.options.libs {
            Some(libs) => libs.clone(),
            None => discover_all(&roots),
        };
        debug!(count = libs.len(), "units to compile");

        let mut entries = dependencies.to_vec();
        entries.extend(roots.iter().cloned().map(ClasspathEntry::Path));
        let cp = self.toolchain.classpath(entries)?;

        let invocation = compile_invocation(
            &self.toolchain.java,
            render(&cp, &target),
            &target,
            &libs,
        );

        let mut graph = RuleGraph::new();
        let action = graph.add_action(CompileAction::new(
            invocation,
            target.clone(),
            self.toolchain.runner,
        ));
        let located = register(&mut graph, action, &libs, &roots, &target)?;
        let done: BTreeSet<UnitId> = libs.iter().cloned().collect();
        let mirrored = register_copies(&mut graph, &roots, &done, &target)?;

        let report = engine.execute(&graph)?;
        let mixed = dispatch(&self.toolchain, &self.options, sources, &target, &cp)?;

        Ok(CompileSummary {
            libs,
            located,
            mirrored,
            report,
            mixed,
        })
    }
}
