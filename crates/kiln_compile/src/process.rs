//! External process invocation.
//!
//! Compilers are described as an [`Invocation`], a program plus an argument
//! vector, and run through a [`ProcessRunner`]. Arguments are never joined
//! into a shell string.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use tracing::trace;

use crate::error::BuildError;

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The executable to launch.
    pub program: PathBuf,
    /// Arguments in order.
    pub args: Vec<OsString>,
}

impl Invocation {
    /// An invocation of `program` with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// The program name as shown in messages.
    pub fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    /// Builds a [`Command`] with inherited standard streams.
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Runs invocations to completion.
pub trait ProcessRunner {
    /// Runs `invocation`, blocking until it exits. A non-zero exit is an error.
    fn run(&self, invocation: &Invocation) -> Result<(), BuildError>;
}

/// Spawns real subprocesses that share this process's terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), BuildError> {
        trace!(command = %invocation, "spawning");
        let status = invocation
            .to_command()
            .status()
            .map_err(|source| BuildError::Spawn {
                program: invocation.program_name(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(BuildError::ProcessFailed {
                program: invocation.program_name(),
                status: status.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_argument_order() {
        let inv = Invocation::new("java")
            .arg("-classpath")
            .arg("a b:c")
            .args(["x", "y"]);
        assert_eq!(inv.args.len(), 4);
        assert_eq!(inv.args[1], OsString::from("a b:c"));
        assert_eq!(inv.to_string(), "java -classpath a b:c x y");
    }

    #[test]
    fn command_gets_program_and_args() {
        let inv = Invocation::new("javac").args(["-d", "out"]);
        let command = inv.to_command();
        assert_eq!(command.get_program(), OsStr::new("javac"));
        let args: Vec<&OsStr> = command.get_args().collect();
        assert_eq!(args, vec![OsStr::new("-d"), OsStr::new("out")]);
    }

    #[test]
    fn spawn_failure_names_program() {
        let inv = Invocation::new("/nonexistent/kiln-test-binary");
        let err = SystemRunner.run(&inv).unwrap_err();
        match err {
            BuildError::Spawn { program, .. } => {
                assert_eq!(program, "/nonexistent/kiln-test-binary");
            }
            other => panic!("expected Spawn, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_process_failed() {
        let err = SystemRunner.run(&Invocation::new("false")).unwrap_err();
        assert!(matches!(err, BuildError::ProcessFailed { .. }));
        SystemRunner.run(&Invocation::new("true")).unwrap();
    }
}
