//! Unit identifiers and the namespace/path mapping.
//!
//! A unit identifier names one translatable source file, e.g. `foo.bar-baz`.
//! Its relative path replaces `.` with `/` and `-` with `_`, giving
//! `foo/bar_baz`. The mapping only round-trips for identifiers that contain no
//! literal underscore; no escaping is defined for that case.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File extension of primary-language source files.
pub const SOURCE_EXT: &str = "clj";

/// File extension of compiled artifacts.
pub const CLASS_EXT: &str = "class";

/// Suffix appended to a unit's relative path to name its loader artifact.
pub const INIT_SUFFIX: &str = "__init";

/// A dotted-hyphenated unit identifier such as `foo.bar-baz`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UnitId(String);

impl UnitId {
    /// Builds an identifier from a relative path in slash/underscore form.
    ///
    /// `foo/bar_baz` becomes `foo.bar-baz`.
    pub fn from_path(path: &str) -> Self {
        Self(path.replace('/', ".").replace('_', "-"))
    }

    /// Returns the relative path in slash/underscore form, without extension.
    pub fn to_path(&self) -> String {
        self.0.replace('.', "/").replace('-', "_")
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the relative path as platform path components.
    pub fn relative_path(&self) -> PathBuf {
        self.to_path().split('/').collect()
    }

    /// Location of this unit's source file beneath `root`.
    pub fn source_file(&self, root: &Path) -> PathBuf {
        let mut path = root.join(self.relative_path());
        path.set_extension(SOURCE_EXT);
        path
    }

    /// Location of this unit's compiled loader artifact beneath `target`.
    ///
    /// `foo.bar` maps to `<target>/foo/bar__init.class`.
    pub fn init_artifact(&self, target: &Path) -> PathBuf {
        let rel = self.relative_path();
        let stem = rel
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file = format!("{stem}{INIT_SUFFIX}.{CLASS_EXT}");
        match rel.parent() {
            Some(parent) => target.join(parent).join(file),
            None => target.join(file),
        }
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnitId({})", self.0)
    }
}

/// Error returned when a string is not a usable unit identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid unit identifier: '{input}'")]
pub struct ParseUnitError {
    /// The rejected input.
    pub input: String,
}

impl FromStr for UnitId {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = !s.is_empty()
            && !s.starts_with('.')
            && !s.ends_with('.')
            && !s.contains("..")
            && !s.chars().any(|c| c.is_whitespace() || c == '/' || c == '\\');
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(ParseUnitError {
                input: s.to_string(),
            })
        }
    }
}

impl TryFrom<String> for UnitId {
    type Error = ParseUnitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UnitId> for String {
    fn from(id: UnitId) -> Self {
        id.0
    }
}
