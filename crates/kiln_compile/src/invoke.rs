//! The batched primary-compiler invocation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use kiln_common::UnitId;
use kiln_engine::{Action, ActionError};
use tracing::trace;

use crate::error::BuildError;
use crate::process::{Invocation, ProcessRunner};

/// System property naming the compiler's output directory.
pub const COMPILE_PATH_PROPERTY: &str = "clojure.compile.path";

/// Entry point of the ahead-of-time compiler.
pub const COMPILER_MAIN: &str = "clojure.lang.Compile";

/// Builds `<java> -classpath <cp> -Dclojure.compile.path=<target> clojure.lang.Compile <libs…>`.
pub fn compile_invocation(
    java: &Path,
    classpath: OsString,
    target: &Path,
    libs: &[UnitId],
) -> Invocation {
    let mut property = OsString::from(format!("-D{COMPILE_PATH_PROPERTY}="));
    property.push(target.as_os_str());

    Invocation::new(java)
        .arg("-classpath")
        .arg(classpath)
        .arg(property)
        .arg(COMPILER_MAIN)
        .args(libs.iter().map(UnitId::as_str))
}

/// The compile step shared by every unit rule of one call.
pub struct CompileAction<'a> {
    invocation: Invocation,
    target: PathBuf,
    runner: &'a dyn ProcessRunner,
}

impl<'a> CompileAction<'a> {
    /// Wraps `invocation`, which writes into `target`.
    pub fn new(invocation: Invocation, target: PathBuf, runner: &'a dyn ProcessRunner) -> Self {
        Self {
            invocation,
            target,
            runner,
        }
    }

    /// The invocation this action runs.
    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    fn compile(&self) -> Result<(), BuildError> {
        std::fs::create_dir_all(&self.target).map_err(|source| BuildError::Io {
            path: self.target.clone(),
            source,
        })?;
        trace!(command = %self.invocation, "compiling");
        self.runner.run(&self.invocation)
    }
}

impl Action for CompileAction<'_> {
    fn label(&self) -> String {
        "cljc".to_string()
    }

    fn run(&self) -> Result<(), ActionError> {
        self.compile().map_err(|e| Box::new(e) as ActionError)
    }
}
