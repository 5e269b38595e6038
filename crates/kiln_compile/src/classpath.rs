//! Classpath assembly.
//!
//! Entries are either artifact coordinates, resolved through a
//! [`DependencyResolver`], or file system paths. Resolution keeps input order.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use kiln_common::ArtifactSpec;
use tracing::trace;

use crate::error::BuildError;

/// Separator between classpath entries on this platform.
#[cfg(windows)]
pub const PATH_SEPARATOR: char = ';';

/// Separator between classpath entries on this platform.
#[cfg(not(windows))]
pub const PATH_SEPARATOR: char = ':';

/// One classpath entry before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClasspathEntry {
    /// An artifact coordinate such as `org.clojure:clojure:jar:1.1.0`.
    Artifact(ArtifactSpec),
    /// A directory or archive on disk.
    Path(PathBuf),
}

impl ClasspathEntry {
    /// Interprets a configured entry. Anything that is not a coordinate is a path.
    pub fn parse(entry: &str) -> Self {
        if ArtifactSpec::looks_like_coordinate(entry) {
            if let Ok(spec) = entry.parse() {
                return ClasspathEntry::Artifact(spec);
            }
        }
        ClasspathEntry::Path(PathBuf::from(entry))
    }

    /// Interprets every configured entry in order.
    pub fn parse_all<S: AsRef<str>>(entries: &[S]) -> Vec<Self> {
        entries.iter().map(|e| Self::parse(e.as_ref())).collect()
    }
}

impl From<PathBuf> for ClasspathEntry {
    fn from(path: PathBuf) -> Self {
        ClasspathEntry::Path(path)
    }
}

/// Turns artifact coordinates into files on disk.
pub trait DependencyResolver {
    /// Returns the absolute path of `spec`. The file must exist.
    fn resolve(&self, spec: &ArtifactSpec) -> Result<PathBuf, BuildError>;
}

/// Resolves coordinates inside a Maven-layout repository on the local disk.
///
/// Nothing is downloaded; an artifact missing from the repository is an error.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    /// A repository rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The per-user repository at `~/.m2/repository`.
    pub fn default_location() -> Result<Self, BuildError> {
        let home = dirs::home_dir().ok_or(BuildError::NoRepository)?;
        Ok(Self::new(home.join(".m2").join("repository")))
    }

    /// The repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DependencyResolver for LocalRepository {
    fn resolve(&self, spec: &ArtifactSpec) -> Result<PathBuf, BuildError> {
        let path = spec.repository_path(&self.root);
        if path.is_file() {
            absolute(&path)
        } else {
            Err(BuildError::UnresolvedArtifact {
                spec: spec.clone(),
                path,
            })
        }
    }
}

/// Resolves `entries` to absolute paths, preserving order.
pub fn resolve(
    entries: &[ClasspathEntry],
    resolver: &dyn DependencyResolver,
) -> Result<Vec<PathBuf>, BuildError> {
    entries
        .iter()
        .map(|entry| match entry {
            ClasspathEntry::Artifact(spec) => resolver.resolve(spec),
            ClasspathEntry::Path(path) => absolute(path),
        })
        .collect()
}

/// Joins `paths` with [`PATH_SEPARATOR`], always ending with `trailing`.
pub fn render(paths: &[PathBuf], trailing: &Path) -> OsString {
    let mut out = OsString::new();
    for path in paths {
        out.push(path.as_os_str());
        out.push(PATH_SEPARATOR.to_string());
    }
    out.push(trailing.as_os_str());
    trace!(classpath = ?out, "rendered classpath");
    out
}

/// Joins `paths` with [`PATH_SEPARATOR`].
pub fn join(paths: &[PathBuf]) -> OsString {
    match paths.split_last() {
        Some((last, rest)) => render(rest, last),
        None => OsString::new(),
    }
}

pub(crate) fn absolute(path: &Path) -> Result<PathBuf, BuildError> {
    std::path::absolute(path).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })
}
