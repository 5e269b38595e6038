//! Mixed-language dispatch after the primary pass.

use std::fmt;
use std::path::{Path, PathBuf};

use kiln_config::CompileOptions;
use serde::Serialize;
use tracing::info;

use crate::compiler::Toolchain;
use crate::detect::{has_language, SecondaryLanguage};
use crate::error::BuildError;
use crate::secondary::{Groovyc, Javac, Scalac, SecondaryCompiler};

/// Which secondary compiler, if any, a source set needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MixedMode {
    /// Only Clojure sources.
    ClojureOnly,
    /// Scala sources present. Java sources, if any, go along with them.
    WithScala,
    /// Groovy sources present, no Scala.
    WithGroovy,
    /// Java sources present, no Scala or Groovy.
    WithJava,
}

impl MixedMode {
    /// Decides the mode from the files currently in `sources`.
    ///
    /// Languages are checked in [`SecondaryLanguage::PRIORITY`] order and the
    /// first one present wins.
    pub fn detect(sources: &[PathBuf]) -> Result<Self, BuildError> {
        for language in SecondaryLanguage::PRIORITY {
            if has_language(sources, language.extension())? {
                return Ok(Self::from(language));
            }
        }
        Ok(MixedMode::ClojureOnly)
    }

    /// The language compiled in this mode.
    pub fn language(self) -> Option<SecondaryLanguage> {
        match self {
            MixedMode::ClojureOnly => None,
            MixedMode::WithScala => Some(SecondaryLanguage::Scala),
            MixedMode::WithGroovy => Some(SecondaryLanguage::Groovy),
            MixedMode::WithJava => Some(SecondaryLanguage::Java),
        }
    }

    /// Builds the delegate for this mode from its option sub-object.
    pub fn delegate<'a>(
        self,
        toolchain: &Toolchain<'a>,
        options: &CompileOptions,
    ) -> Option<Box<dyn SecondaryCompiler + 'a>> {
        let runner = toolchain.runner;
        let javac = || Javac::new(toolchain.javac.clone(), options.javac.clone(), runner);
        match self {
            MixedMode::ClojureOnly => None,
            MixedMode::WithScala => Some(Box::new(Scalac::new(
                toolchain.scalac.clone(),
                options.scalac.clone(),
                javac(),
                runner,
            ))),
            MixedMode::WithGroovy => Some(Box::new(Groovyc::new(
                toolchain.groovyc.clone(),
                options.groovyc.clone(),
                runner,
            ))),
            MixedMode::WithJava => Some(Box::new(javac())),
        }
    }
}

impl From<SecondaryLanguage> for MixedMode {
    fn from(language: SecondaryLanguage) -> Self {
        match language {
            SecondaryLanguage::Scala => MixedMode::WithScala,
            SecondaryLanguage::Groovy => MixedMode::WithGroovy,
            SecondaryLanguage::Java => MixedMode::WithJava,
        }
    }
}

impl fmt::Display for MixedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.language() {
            None => f.write_str("Clojure"),
            Some(SecondaryLanguage::Java) => f.write_str("Clojure/Java"),
            Some(language) => write!(f, "Clojure/{language}/Java"),
        }
    }
}

/// Detects the mode for `sources` and runs the matching delegate, if any.
///
/// `classpath` excludes `target`, which the delegate appends.
pub fn dispatch(
    toolchain: &Toolchain<'_>,
    options: &CompileOptions,
    sources: &[PathBuf],
    target: &Path,
    classpath: &[PathBuf],
) -> Result<MixedMode, BuildError> {
    let mode = MixedMode::detect(sources)?;
    if let Some(delegate) = mode.delegate(toolchain, options) {
        info!("compiling mixed {mode} sources");
        delegate.compile(sources, target, classpath)?;
    }
    Ok(mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn scala_wins_over_java() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("S.scala"));
        touch(&dir.path().join("J.java"));
        assert_eq!(
            MixedMode::detect(&[dir.path().to_path_buf()]).unwrap(),
            MixedMode::WithScala
        );
    }

    #[test]
    fn groovy_wins_over_java() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("G.groovy"));
        touch(&dir.path().join("J.java"));
        assert_eq!(
            MixedMode::detect(&[dir.path().to_path_buf()]).unwrap(),
            MixedMode::WithGroovy
        );
    }

    #[test]
    fn java_only_and_clojure_only() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.clj"));
        let sources = [dir.path().to_path_buf()];
        assert_eq!(MixedMode::detect(&sources).unwrap(), MixedMode::ClojureOnly);

        touch(&dir.path().join("J.java"));
        assert_eq!(MixedMode::detect(&sources).unwrap(), MixedMode::WithJava);
    }

    #[test]
    fn display_names() {
        assert_eq!(MixedMode::WithScala.to_string(), "Clojure/Scala/Java");
        assert_eq!(MixedMode::WithJava.to_string(), "Clojure/Java");
        assert_eq!(MixedMode::ClojureOnly.to_string(), "Clojure");
        assert_eq!(MixedMode::ClojureOnly.language(), None);
    }
}
