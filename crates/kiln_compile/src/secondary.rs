//! Secondary compiler delegates.
//!
//! Each delegate turns its option sub-object into an argument vector and
//! runs the external compiler once over every matching file. Delegates write
//! into the same output directory as the primary pass.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use kiln_config::{GroovycOptions, JavacOptions, ScalacOptions};
use tracing::{debug, trace};

use crate::classpath::render;
use crate::detect::{language_files, SecondaryLanguage};
use crate::error::BuildError;
use crate::process::{Invocation, ProcessRunner};

/// An external compiler for one secondary language.
pub trait SecondaryCompiler {
    /// The language this delegate handles.
    fn language(&self) -> SecondaryLanguage;

    /// Compiles the relevant files among `sources` into `target`.
    ///
    /// `classpath` must not include `target`; it is appended automatically.
    fn compile(
        &self,
        sources: &[PathBuf],
        target: &Path,
        classpath: &[PathBuf],
    ) -> Result<(), BuildError>;
}

/// Drives `javac`.
pub struct Javac<'a> {
    program: PathBuf,
    options: JavacOptions,
    runner: &'a dyn ProcessRunner,
}

impl<'a> Javac<'a> {
    /// Creates a delegate running `program` with `options`.
    pub fn new(program: PathBuf, options: JavacOptions, runner: &'a dyn ProcessRunner) -> Self {
        Self {
            program,
            options,
            runner,
        }
    }

    fn flags(&self) -> Vec<String> {
        let opts = &self.options;
        let mut flags = Vec::new();
        if opts.debug {
            flags.push("-g".to_string());
        }
        if let Some(source) = &opts.source {
            flags.extend(["-source".to_string(), source.clone()]);
        }
        if let Some(target) = &opts.target {
            flags.extend(["-target".to_string(), target.clone()]);
        }
        if let Some(lint) = &opts.lint {
            flags.push(format!("-Xlint:{lint}"));
        }
        flags.extend(opts.other.iter().cloned());
        flags
    }

    fn invocation(&self, files: &BTreeSet<PathBuf>, target: &Path, classpath: &[PathBuf]) -> Invocation {
        Invocation::new(&self.program)
            .args(self.flags())
            .arg("-classpath")
            .arg(render(classpath, target))
            .arg("-d")
            .arg(target)
            .args(files)
    }
}

impl SecondaryCompiler for Javac<'_> {
    fn language(&self) -> SecondaryLanguage {
        SecondaryLanguage::Java
    }

    fn compile(
        &self,
        sources: &[PathBuf],
        target: &Path,
        classpath: &[PathBuf],
    ) -> Result<(), BuildError> {
        let files = language_files(sources, SecondaryLanguage::Java.extension())?;
        run_over(self.runner, &files, target, || {
            self.invocation(&files, target, classpath)
        })
    }
}

/// Drives `scalac`, followed by `javac` for any Java files in the tree.
///
/// Java sources are handed to `scalac` too so Scala code can refer to them;
/// `scalac` only parses them, `javac` emits their classes.
pub struct Scalac<'a> {
    program: PathBuf,
    options: ScalacOptions,
    javac: Javac<'a>,
    runner: &'a dyn ProcessRunner,
}

impl<'a> Scalac<'a> {
    /// Creates a delegate running `program`, with `javac` for the Java half.
    pub fn new(
        program: PathBuf,
        options: ScalacOptions,
        javac: Javac<'a>,
        runner: &'a dyn ProcessRunner,
    ) -> Self {
        Self {
            program,
            options,
            javac,
            runner,
        }
    }

    fn flags(&self) -> Vec<String> {
        let opts = &self.options;
        let debug = if opts.debug { "-g:vars" } else { "-g:none" };
        let mut flags = vec![debug.to_string()];
        if opts.deprecation {
            flags.push("-deprecation".to_string());
        }
        if opts.optimise {
            flags.push("-optimise".to_string());
        }
        if let Some(target) = &opts.target {
            flags.push(format!("-target:{target}"));
        }
        flags.extend(opts.other.iter().cloned());
        flags
    }
}

impl SecondaryCompiler for Scalac<'_> {
    fn language(&self) -> SecondaryLanguage {
        SecondaryLanguage::Scala
    }

    fn compile(
        &self,
        sources: &[PathBuf],
        target: &Path,
        classpath: &[PathBuf],
    ) -> Result<(), BuildError> {
        let scala = language_files(sources, SecondaryLanguage::Scala.extension())?;
        let java = language_files(sources, SecondaryLanguage::Java.extension())?;
        run_over(self.runner, &scala, target, || {
            Invocation::new(&self.program)
                .args(self.flags())
                .arg("-classpath")
                .arg(render(classpath, target))
                .arg("-d")
                .arg(target)
                .args(scala.iter().chain(&java))
        })?;
        if java.is_empty() {
            return Ok(());
        }
        debug!(files = java.len(), "compiling Java sources of mixed Scala tree");
        self.javac.compile(sources, target, classpath)
    }
}

/// Drives `groovyc` in joint compilation mode, which also compiles Java files.
pub struct Groovyc<'a> {
    program: PathBuf,
    options: GroovycOptions,
    runner: &'a dyn ProcessRunner,
}

impl<'a> Groovyc<'a> {
    /// Creates a delegate running `program` with `options`.
    pub fn new(program: PathBuf, options: GroovycOptions, runner: &'a dyn ProcessRunner) -> Self {
        Self {
            program,
            options,
            runner,
        }
    }

    fn flags(&self) -> Vec<String> {
        let opts = &self.options;
        let mut flags = vec!["-j".to_string()];
        if let Some(encoding) = &opts.encoding {
            flags.extend(["--encoding".to_string(), encoding.clone()]);
        }
        if opts.stacktrace {
            flags.push("-e".to_string());
        }
        flags.extend(opts.other.iter().cloned());
        flags
    }
}

impl SecondaryCompiler for Groovyc<'_> {
    fn language(&self) -> SecondaryLanguage {
        SecondaryLanguage::Groovy
    }

    fn compile(
        &self,
        sources: &[PathBuf],
        target: &Path,
        classpath: &[PathBuf],
    ) -> Result<(), BuildError> {
        let mut files = language_files(sources, SecondaryLanguage::Groovy.extension())?;
        files.extend(language_files(sources, SecondaryLanguage::Java.extension())?);
        run_over(self.runner, &files, target, || {
            Invocation::new(&self.program)
                .args(self.flags())
                .arg("-classpath")
                .arg(render(classpath, target))
                .arg("-d")
                .arg(target)
                .args(&files)
        })
    }
}

/// Runs the invocation built by `build` unless `files` is empty.
fn run_over(
    runner: &dyn ProcessRunner,
    files: &BTreeSet<PathBuf>,
    target: &Path,
    build: impl FnOnce() -> Invocation,
) -> Result<(), BuildError> {
    if files.is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(target).map_err(|source| BuildError::Io {
        path: target.to_path_buf(),
        source,
    })?;
    let invocation = build();
    trace!(command = %invocation, "secondary compile");
    runner.run(&invocation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::ffi::OsString;
    use std::fs;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<Invocation>>);

    impl ProcessRunner for Recorder {
        fn run(&self, invocation: &Invocation) -> Result<(), BuildError> {
            self.0.borrow_mut().push(invocation.clone());
            Ok(())
        }
    }

    impl Recorder {
        fn programs(&self) -> Vec<PathBuf> {
            self.0.borrow().iter().map(|i| i.program.clone()).collect()
        }

        fn args(&self, index: usize) -> Vec<OsString> {
            self.0.borrow()[index].args.clone()
        }
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn javac_flags_from_options() {
        let runner = Recorder::default();
        let options = JavacOptions {
            source: Some("1.8".into()),
            target: Some("1.8".into()),
            debug: true,
            lint: Some("all".into()),
            other: vec!["-encoding".into(), "UTF-8".into()],
        };
        let javac = Javac::new("javac".into(), options, &runner);
        assert_eq!(
            javac.flags(),
            vec!["-g", "-source", "1.8", "-target", "1.8", "-Xlint:all", "-encoding", "UTF-8"]
        );
    }

    #[test]
    fn javac_compiles_java_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let out = dir.path().join("out");
        touch(&src.join("a/A.java"));
        touch(&src.join("b.clj"));

        let runner = Recorder::default();
        let javac = Javac::new("javac".into(), JavacOptions::default(), &runner);
        javac
            .compile(&[src.clone()], &out, &[PathBuf::from("/dep.jar")])
            .unwrap();

        assert!(out.is_dir());
        let args = runner.args(0);
        let last = args.last().unwrap();
        assert_eq!(PathBuf::from(last), src.join("a/A.java"));
        assert!(args.contains(&OsString::from("-d")));
        assert!(!args.iter().any(|a| a.to_string_lossy().ends_with(".clj")));
    }

    #[test]
    fn nothing_to_compile_runs_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Recorder::default();
        let javac = Javac::new("javac".into(), JavacOptions::default(), &runner);
        javac.compile(&[dir.path().to_path_buf()], dir.path(), &[]).unwrap();
        assert!(runner.0.borrow().is_empty());
    }

    #[test]
    fn scalac_then_javac_for_mixed_tree() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        touch(&src.join("S.scala"));
        touch(&src.join("J.java"));

        let runner = Recorder::default();
        let javac = Javac::new("javac".into(), JavacOptions::default(), &runner);
        let scalac = Scalac::new("scalac".into(), ScalacOptions::default(), javac, &runner);
        scalac.compile(&[src], &dir.path().join("out"), &[]).unwrap();

        assert_eq!(
            runner.programs(),
            vec![PathBuf::from("scalac"), PathBuf::from("javac")]
        );
        let scalac_args = runner.args(0);
        assert_eq!(scalac_args[0], OsString::from("-g:vars"));
        assert!(scalac_args.iter().any(|a| a.to_string_lossy().ends_with("J.java")));
    }

    #[test]
    fn groovyc_joint_compiles_java_too() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        touch(&src.join("G.groovy"));
        touch(&src.join("J.java"));

        let runner = Recorder::default();
        let options = GroovycOptions {
            encoding: Some("UTF-8".into()),
            stacktrace: true,
            other: Vec::new(),
        };
        let groovyc = Groovyc::new("groovyc".into(), options, &runner);
        groovyc.compile(&[src], &dir.path().join("out"), &[]).unwrap();

        let args = runner.args(0);
        assert_eq!(
            &args[..4],
            &[
                OsString::from("-j"),
                OsString::from("--encoding"),
                OsString::from("UTF-8"),
                OsString::from("-e"),
            ]
        );
        let files = args
            .iter()
            .filter(|a| {
                let s = a.to_string_lossy();
                s.ends_with(".groovy") || s.ends_with(".java")
            })
            .count();
        assert_eq!(files, 2);
    }

    #[test]
    fn classpath_argument_ends_with_target() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let out = dir.path().join("out");
        touch(&src.join("A.java"));

        let runner = Recorder::default();
        let javac = Javac::new("javac".into(), JavacOptions::default(), &runner);
        javac
            .compile(&[src], &out, &[PathBuf::from("/dep.jar")])
            .unwrap();

        let args = runner.args(0);
        let cp_index = args.iter().position(|a| a == "-classpath").unwrap();
        let cp = args[cp_index + 1].to_string_lossy().into_owned();
        assert!(cp.starts_with("/dep.jar"));
        assert!(cp.ends_with(&*out.to_string_lossy()));
    }
}
