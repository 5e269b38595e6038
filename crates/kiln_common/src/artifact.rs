//! Artifact coordinates in `group:id[:type[:classifier]]:version` form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Packaging type assumed when a coordinate omits it.
const DEFAULT_TYPE: &str = "jar";

/// A Maven-style artifact coordinate.
///
/// Accepts three forms:
/// - `group:id:version` (type defaults to `jar`)
/// - `group:id:type:version`
/// - `group:id:type:classifier:version`
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactSpec {
    /// Group identifier, e.g. `org.clojure`.
    pub group: String,
    /// Artifact identifier, e.g. `clojure`.
    pub id: String,
    /// Packaging type, e.g. `jar`.
    pub kind: String,
    /// Optional classifier, e.g. `sources`.
    pub classifier: Option<String>,
    /// Version string.
    pub version: String,
}

impl ArtifactSpec {
    /// Returns `true` if `s` has the shape of a coordinate rather than a path.
    ///
    /// Coordinates never contain path separators, so `C:\lib\a.jar` and
    /// `lib/a.jar` are both paths.
    pub fn looks_like_coordinate(s: &str) -> bool {
        !s.contains('/') && !s.contains('\\') && s.parse::<ArtifactSpec>().is_ok()
    }

    /// File name of this artifact inside a repository.
    pub fn file_name(&self) -> String {
        match &self.classifier {
            Some(c) => format!("{}-{}-{}.{}", self.id, self.version, c, self.kind),
            None => format!("{}-{}.{}", self.id, self.version, self.kind),
        }
    }

    /// Location of this artifact in a Maven-layout repository rooted at `repo`.
    pub fn repository_path(&self, repo: &Path) -> PathBuf {
        let mut path = repo.to_path_buf();
        for segment in self.group.split('.') {
            path.push(segment);
        }
        path.push(&self.id);
        path.push(&self.version);
        path.push(self.file_name());
        path
    }
}

impl fmt::Display for ArtifactSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.id, self.kind)?;
        if let Some(c) = &self.classifier {
            write!(f, ":{c}")?;
        }
        write!(f, ":{}", self.version)
    }
}

impl fmt::Debug for ArtifactSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArtifactSpec({self})")
    }
}

/// Error type for parsing artifact coordinates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid artifact coordinate: '{input}'")]
pub struct ParseArtifactError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for ArtifactSpec {
    type Err = ParseArtifactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseArtifactError {
            input: s.to_string(),
        };

        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(err());
        }

        let owned = |p: &str| p.to_string();
        match parts.as_slice() {
            [group, id, version] => Ok(Self {
                group: owned(group),
                id: owned(id),
                kind: DEFAULT_TYPE.to_string(),
                classifier: None,
                version: owned(version),
            }),
            [group, id, kind, version] => Ok(Self {
                group: owned(group),
                id: owned(id),
                kind: owned(kind),
                classifier: None,
                version: owned(version),
            }),
            [group, id, kind, classifier, version] => Ok(Self {
                group: owned(group),
                id: owned(id),
                kind: owned(kind),
                classifier: Some(owned(classifier)),
                version: owned(version),
            }),
            _ => Err(err()),
        }
    }
}

impl TryFrom<String> for ArtifactSpec {
    type Error = ParseArtifactError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ArtifactSpec> for String {
    fn from(spec: ArtifactSpec) -> Self {
        spec.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_four_part() {
        let a: ArtifactSpec = "org.clojure:clojure:jar:1.1.0".parse().unwrap();
        assert_eq!(a.group, "org.clojure");
        assert_eq!(a.id, "clojure");
        assert_eq!(a.kind, "jar");
        assert_eq!(a.classifier, None);
        assert_eq!(a.version, "1.1.0");
    }

    #[test]
    fn parse_three_part_defaults_to_jar() {
        let a: ArtifactSpec = "jline:jline:0.9.94".parse().unwrap();
        assert_eq!(a.kind, "jar");
        assert_eq!(a.to_string(), "jline:jline:jar:0.9.94");
    }

    #[test]
    fn parse_with_classifier() {
        let a: ArtifactSpec = "org.x:y:jar:sources:2.0".parse().unwrap();
        assert_eq!(a.classifier.as_deref(), Some("sources"));
        assert_eq!(a.file_name(), "y-2.0-sources.jar");
    }

    #[test]
    fn parse_rejects_bad_shapes() {
        for bad in ["", "a", "a:b", "a::c:d", "a:b:c:d:e:f"] {
            assert!(bad.parse::<ArtifactSpec>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn coordinate_versus_path() {
        assert!(ArtifactSpec::looks_like_coordinate("org.x:y:jar:1.0"));
        assert!(!ArtifactSpec::looks_like_coordinate("lib/extra.jar"));
        assert!(!ArtifactSpec::looks_like_coordinate("C:\\lib\\a:b:c.jar"));
        assert!(!ArtifactSpec::looks_like_coordinate("classes"));
    }

    #[test]
    fn repository_layout() {
        let a: ArtifactSpec = "org.clojure:clojure:jar:1.1.0".parse().unwrap();
        assert_eq!(
            a.repository_path(Path::new("/repo")),
            Path::new("/repo/org/clojure/clojure/1.1.0/clojure-1.1.0.jar")
        );
    }

    #[test]
    fn display_round_trips() {
        for s in ["a.b:c:jar:1", "a:b:pom:x:2"] {
            let a: ArtifactSpec = s.parse().unwrap();
            assert_eq!(a.to_string(), s);
        }
    }
}
