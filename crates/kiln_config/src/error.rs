//! Errors raised while reading `kiln.toml` and resolving it against a project.

use std::path::PathBuf;

/// Why a project configuration could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// The file that was opened.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the expected tables.
    #[error("malformed configuration: {0}")]
    Parse(String),

    /// `[cljc]` carries a key other than `libs`, `scalac`, `groovyc` or `javac`.
    #[error("unrecognized compiler option '{0}'")]
    UnknownOption(String),

    /// A required field is empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A configured source directory is absent on disk.
    #[error("source path does not exist: {}", .0.display())]
    MissingSourcePath(PathBuf),

    /// A value is present but unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
