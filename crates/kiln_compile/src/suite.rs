//! Test suite selection and execution.
//!
//! Every namespace under the test root is a suite. Each suite runs in its own
//! JVM through `clojure.main`, which exits with the number of failures plus
//! errors, so a zero exit means the suite passed.

use std::path::{Path, PathBuf};

use kiln_common::UnitId;
use kiln_config::TestConfig;
use serde::Serialize;
use tracing::{debug, info};

use crate::classpath::{join, ClasspathEntry};
use crate::compiler::Toolchain;
use crate::error::BuildError;
use crate::namespace::discover;
use crate::process::Invocation;

/// Entry point used to load and run a suite.
pub const SUITE_MAIN: &str = "clojure.main";

/// The selection of suites under a test root.
#[derive(Debug, Clone)]
pub struct TestSuites {
    root: PathBuf,
    include: Vec<UnitId>,
    exclude: Vec<UnitId>,
}

/// Result of running one suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteOutcome {
    /// The suite namespace.
    pub suite: UnitId,
    /// `true` if the suite exited cleanly.
    pub passed: bool,
}

impl TestSuites {
    /// Suites found under `root`, with no extra includes or excludes.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }

    /// Suites under `root` adjusted by the `[test]` configuration.
    pub fn from_config(root: impl Into<PathBuf>, config: &TestConfig) -> Self {
        Self::new(root)
            .include(config.include.iter().cloned())
            .exclude(config.exclude.iter().cloned())
    }

    /// Adds suites that are not discovered under the root.
    pub fn include(mut self, suites: impl IntoIterator<Item = UnitId>) -> Self {
        self.include.extend(suites);
        self
    }

    /// Removes suites from the selection.
    pub fn exclude(mut self, suites: impl IntoIterator<Item = UnitId>) -> Self {
        self.exclude.extend(suites);
        self
    }

    /// The test source root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discovered plus included suites, minus excluded ones, without repeats.
    pub fn suites(&self) -> Vec<UnitId> {
        let discovered: Box<dyn Iterator<Item = UnitId>> = if self.root.is_dir() {
            Box::new(discover(&self.root))
        } else {
            Box::new(std::iter::empty())
        };

        let mut selected: Vec<UnitId> = Vec::new();
        for suite in discovered.chain(self.include.iter().cloned()) {
            if !self.exclude.contains(&suite) && !selected.contains(&suite) {
                selected.push(suite);
            }
        }
        selected
    }

    /// Runs each of `suites` in turn and reports whether it passed.
    ///
    /// `dependencies` should include the compiled main classes. A suite that
    /// exits non-zero is a failure, not an error; a JVM that cannot be
    /// launched is an error.
    pub fn run(
        &self,
        toolchain: &Toolchain<'_>,
        dependencies: &[ClasspathEntry],
        suites: &[UnitId],
    ) -> Result<Vec<SuiteOutcome>, BuildError> {
        let mut entries = dependencies.to_vec();
        entries.push(ClasspathEntry::Path(self.root.clone()));
        let cp = toolchain.classpath(entries)?;

        let mut outcomes = Vec::with_capacity(suites.len());
        for suite in suites {
            let invocation = suite_invocation(&toolchain.java, &cp, suite);
            info!(%suite, "running suite");
            let passed = match toolchain.runner.run(&invocation) {
                Ok(()) => true,
                Err(BuildError::ProcessFailed { status, .. }) => {
                    debug!(%suite, %status, "suite failed");
                    false
                }
                Err(other) => return Err(other),
            };
            outcomes.push(SuiteOutcome {
                suite: suite.clone(),
                passed,
            });
        }
        Ok(outcomes)
    }
}

/// Builds the `clojure.main` invocation that loads and runs `suite`.
pub fn suite_invocation(java: &Path, classpath: &[PathBuf], suite: &UnitId) -> Invocation {
    Invocation::new(java)
        .arg("-classpath")
        .arg(join(classpath))
        .arg(SUITE_MAIN)
        .arg("--eval")
        .arg(format!("(require (quote {suite}) :reload-all)"))
        .arg("--eval")
        .arg(format!(
            "(let [r (clojure.test/run-tests (quote {suite}))] (System/exit (+ (:fail r) (:error r))))"
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classpath::DependencyResolver;
    use crate::process::ProcessRunner;
    use kiln_common::ArtifactSpec;
    use std::cell::RefCell;
    use std::fs;

    struct NoArtifacts;

    impl DependencyResolver for NoArtifacts {
        fn resolve(&self, spec: &ArtifactSpec) -> Result<PathBuf, BuildError> {
            Err(BuildError::UnresolvedArtifact {
                spec: spec.clone(),
                path: PathBuf::from("/nowhere"),
            })
        }
    }

    /// Fails every suite whose name contains "broken".
    #[derive(Default)]
    struct Judge(RefCell<Vec<Invocation>>);

    impl ProcessRunner for Judge {
        fn run(&self, invocation: &Invocation) -> Result<(), BuildError> {
            self.0.borrow_mut().push(invocation.clone());
            let broken = invocation
                .args
                .iter()
                .any(|a| a.to_string_lossy().contains("broken"));
            if broken {
                Err(BuildError::ProcessFailed {
                    program: invocation.program_name(),
                    status: "exit status: 1".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn id(s: &str) -> UnitId {
        s.parse().unwrap()
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "(ns t)").unwrap();
    }

    #[test]
    fn selection_is_discovered_plus_include_minus_exclude() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("app/core_test.clj"));
        touch(&dir.path().join("app/slow_test.clj"));

        let suites = TestSuites::new(dir.path())
            .include([id("extra.suite"), id("app.core-test")])
            .exclude([id("app.slow-test")])
            .suites();
        assert_eq!(suites, vec![id("app.core-test"), id("extra.suite")]);
    }

    #[test]
    fn missing_root_yields_only_includes() {
        let dir = tempfile::tempdir().unwrap();
        let suites = TestSuites::new(dir.path().join("absent"))
            .include([id("only.this")])
            .suites();
        assert_eq!(suites, vec![id("only.this")]);
    }

    #[test]
    fn invocation_evaluates_require_then_run_tests() {
        let inv = suite_invocation(
            Path::new("java"),
            &[PathBuf::from("/deps/a.jar"), PathBuf::from("/test")],
            &id("app.core-test"),
        );
        let args: Vec<String> = inv
            .args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(args[2], "clojure.main");
        assert_eq!(args[4], "(require (quote app.core-test) :reload-all)");
        assert!(args[6].contains("(clojure.test/run-tests (quote app.core-test))"));
        assert!(args[6].contains("(System/exit (+ (:fail r) (:error r)))"));
    }

    #[test]
    fn run_reports_each_suite() {
        let dir = tempfile::tempdir().unwrap();
        let judge = Judge::default();
        let toolchain = Toolchain {
            java: "java".into(),
            javac: "javac".into(),
            scalac: "scalac".into(),
            groovyc: "groovyc".into(),
            runtime: vec![ClasspathEntry::Path(dir.path().join("clojure.jar"))],
            resolver: &NoArtifacts,
            runner: &judge,
        };

        let suites = TestSuites::new(dir.path().join("test"));
        let outcomes = suites
            .run(&toolchain, &[], &[id("good-test"), id("broken-test")])
            .unwrap();
        assert_eq!(
            outcomes,
            vec![
                SuiteOutcome { suite: id("good-test"), passed: true },
                SuiteOutcome { suite: id("broken-test"), passed: false },
            ]
        );
        assert_eq!(judge.0.borrow().len(), 2);
    }
}
