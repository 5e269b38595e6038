//! Error types for the compile driver.

use std::path::PathBuf;

use kiln_common::{ArtifactSpec, UnitId};
use kiln_config::ConfigError;
use kiln_engine::EngineError;

/// Errors that abort a compile call.
///
/// Every variant is fatal: there are no retries and no partial results.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The same unit has a source file in two source roots.
    #[error("found duplicate namespace across multiple source dirs: {0}")]
    DuplicateNamespace(UnitId),

    /// An external compiler exited unsuccessfully. Its own output has already
    /// been written to the terminal.
    #[error("compilation failed: `{program}` {status}, see errors above")]
    ProcessFailed {
        /// The program that was run.
        program: String,
        /// Its exit status as reported by the OS.
        status: String,
    },

    /// An external program could not be started.
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        /// The program that was run.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An artifact coordinate has no file in the local repository.
    #[error("cannot resolve artifact {spec}: {} does not exist", path.display())]
    UnresolvedArtifact {
        /// The coordinate that failed.
        spec: ArtifactSpec,
        /// Where the artifact was expected.
        path: PathBuf,
    },

    /// The local repository location could not be determined.
    #[error("no local artifact repository: home directory is unknown")]
    NoRepository,

    /// Invalid configuration, including unrecognized compiler options.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A file system operation failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The rule engine failed outside of a compile action.
    #[error(transparent)]
    Engine(EngineError),
}

impl From<EngineError> for BuildError {
    /// Unwraps errors raised by this crate's own actions so callers see the
    /// original variant.
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::ActionFailed { label, source } => match source.downcast::<BuildError>() {
                Ok(inner) => *inner,
                Err(source) => BuildError::Engine(EngineError::ActionFailed { label, source }),
            },
            other => BuildError::Engine(other),
        }
    }
}
