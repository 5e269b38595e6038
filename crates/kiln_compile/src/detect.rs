//! Secondary-language detection.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::classpath::absolute;
use crate::error::BuildError;
use crate::walk::{files_under, has_extension};

/// A language compiled by an external secondary compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SecondaryLanguage {
    /// Scala, compiled by `scalac`.
    Scala,
    /// Groovy, compiled jointly with Java by `groovyc`.
    Groovy,
    /// Java, compiled by `javac`.
    Java,
}

impl SecondaryLanguage {
    /// Languages in the order they are checked. The first one present wins.
    pub const PRIORITY: [SecondaryLanguage; 3] = [
        SecondaryLanguage::Scala,
        SecondaryLanguage::Groovy,
        SecondaryLanguage::Java,
    ];

    /// Source file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            SecondaryLanguage::Scala => "scala",
            SecondaryLanguage::Groovy => "groovy",
            SecondaryLanguage::Java => "java",
        }
    }
}

impl fmt::Display for SecondaryLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SecondaryLanguage::Scala => "Scala",
            SecondaryLanguage::Groovy => "Groovy",
            SecondaryLanguage::Java => "Java",
        };
        f.write_str(name)
    }
}

/// Collects the `*.ext` files among `sources`, deduplicated by absolute path.
///
/// Directories are searched recursively. Listed files are taken when they
/// carry the extension. Entries that do not exist contribute nothing.
pub fn language_files(sources: &[PathBuf], ext: &str) -> Result<BTreeSet<PathBuf>, BuildError> {
    let mut files = BTreeSet::new();
    for source in sources {
        if source.is_dir() {
            for file in files_under(source).filter(|f| has_extension(f, ext)) {
                files.insert(absolute(&file)?);
            }
        } else if source.is_file() && has_extension(source, ext) {
            files.insert(absolute(source)?);
        }
    }
    Ok(files)
}

/// Returns `true` if `sources` contain at least one `*.ext` file.
///
/// Directories are searched for `*.ext`. A file listed directly in `sources`
/// counts whatever its extension, so listing any single file selects the
/// first language in [`SecondaryLanguage::PRIORITY`].
pub fn has_language(sources: &[PathBuf], ext: &str) -> Result<bool, BuildError> {
    let mut found = BTreeSet::new();
    for source in sources {
        if source.is_dir() {
            for file in files_under(source).filter(|f| has_extension(f, ext)) {
                found.insert(absolute(&file)?);
            }
        } else if source.is_file() {
            found.insert(absolute(source)?);
        }
    }
    Ok(!found.is_empty())
}
