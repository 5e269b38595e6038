//! Layout resolution: turning configured paths into absolute project paths.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::{Path, PathBuf};

/// Source directories used when `project.sources` is not configured, in order.
pub const DEFAULT_SOURCE_DIRS: [&str; 4] = [
    "src/main/clojure",
    "src/main/java",
    "src/main/scala",
    "src/main/groovy",
];

/// Output directory used when `project.target` is not configured.
pub const DEFAULT_TARGET: &str = "target/classes";

/// Test source root used when `test.sources` is not configured.
pub const DEFAULT_TEST_SOURCES: &str = "src/test/clojure";

/// A project layout with every configured path resolved against the project directory.
#[derive(Debug, Clone)]
pub struct ResolvedLayout {
    /// Source entries (directories and individual files), in configured order.
    pub sources: Vec<PathBuf>,
    /// The output directory. It need not exist yet.
    pub target: PathBuf,
    /// Dependency entries. Coordinates are kept verbatim; paths are made absolute.
    pub dependencies: Vec<String>,
    /// Runtime entries from `[clojure] spec`, resolved like dependencies.
    pub runtime: Vec<String>,
    /// The test source root. It need not exist.
    pub test_root: PathBuf,
}

/// Resolves the project layout against `project_dir`.
///
/// Configured sources must exist. Without configuration, only the default
/// source directories that exist are used.
pub fn resolve_layout(
    config: &ProjectConfig,
    project_dir: &Path,
) -> Result<ResolvedLayout, ConfigError> {
    let sources = match &config.project.sources {
        Some(entries) => {
            let mut sources = Vec::with_capacity(entries.len());
            for entry in entries {
                let path = project_dir.join(entry);
                if !path.exists() {
                    return Err(ConfigError::MissingSourcePath(path));
                }
                sources.push(path);
            }
            sources
        }
        None => DEFAULT_SOURCE_DIRS
            .iter()
            .map(|dir| project_dir.join(dir))
            .filter(|path| path.is_dir())
            .collect(),
    };

    let target = project_dir.join(config.project.target.as_deref().unwrap_or(DEFAULT_TARGET));
    let test_root = project_dir.join(
        config
            .test
            .sources
            .as_deref()
            .unwrap_or(DEFAULT_TEST_SOURCES),
    );

    Ok(ResolvedLayout {
        sources,
        target,
        dependencies: resolve_entries(&config.project.dependencies, project_dir),
        runtime: resolve_entries(&config.clojure.spec, project_dir),
        test_root,
    })
}

/// Makes path entries absolute, leaving artifact coordinates untouched.
fn resolve_entries(entries: &[String], project_dir: &Path) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            if kiln_common::ArtifactSpec::looks_like_coordinate(entry) {
                entry.clone()
            } else {
                project_dir.join(expand_home(entry)).display().to_string()
            }
        })
        .collect()
}

/// Resolved locations of the external tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToolchain {
    /// The `java` launcher.
    pub java: PathBuf,
    /// The `javac` compiler.
    pub javac: PathBuf,
    /// The `scalac` compiler.
    pub scalac: PathBuf,
    /// The `groovyc` compiler.
    pub groovyc: PathBuf,
    /// Local artifact repository, if configured.
    pub repository: Option<PathBuf>,
}

/// Resolves tool locations, consulting `JAVA_HOME` for unset Java tools.
pub fn resolve_toolchain(config: &ProjectConfig) -> ResolvedToolchain {
    let java_home = std::env::var_os("JAVA_HOME").map(PathBuf::from);
    resolve_toolchain_with(config, java_home.as_deref())
}

/// Resolves tool locations against an explicit `JAVA_HOME`.
pub fn resolve_toolchain_with(config: &ProjectConfig, java_home: Option<&Path>) -> ResolvedToolchain {
    let tools = &config.toolchain;
    let jdk_tool = |configured: &Option<String>, name: &str| match (configured, java_home) {
        (Some(path), _) => expand_home(path),
        (None, Some(home)) => home.join("bin").join(name),
        (None, None) => PathBuf::from(name),
    };
    let plain_tool = |configured: &Option<String>, name: &str| {
        configured
            .as_deref()
            .map(expand_home)
            .unwrap_or_else(|| PathBuf::from(name))
    };

    ResolvedToolchain {
        java: jdk_tool(&tools.java, "java"),
        javac: jdk_tool(&tools.javac, "javac"),
        scalac: plain_tool(&tools.scalac, "scalac"),
        groovyc: plain_tool(&tools.groovyc, "groovyc"),
        repository: tools.repository.as_deref().map(expand_home),
    }
}

/// Expands a leading `~/` to the user's home directory.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;
    use std::fs;

    const MINIMAL: &str = "[project]\nname = \"demo\"\n";

    #[test]
    fn default_layout_uses_existing_dirs_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/main/clojure")).unwrap();
        fs::create_dir_all(dir.path().join("src/main/groovy")).unwrap();

        let config = load_config_from_str(MINIMAL).unwrap();
        let layout = resolve_layout(&config, dir.path()).unwrap();
        assert_eq!(
            layout.sources,
            vec![
                dir.path().join("src/main/clojure"),
                dir.path().join("src/main/groovy"),
            ]
        );
        assert_eq!(layout.target, dir.path().join("target/classes"));
        assert_eq!(layout.test_root, dir.path().join("src/test/clojure"));
        assert_eq!(layout.runtime, vec![crate::DEFAULT_CLOJURE_SPEC]);
    }

    #[test]
    fn configured_sources_keep_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("gen")).unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("Extra.java"), "class Extra {}").unwrap();

        let toml = r#"
[project]
name = "demo"
sources = ["gen", "src", "Extra.java"]
target = "out"
"#;
        let config = load_config_from_str(toml).unwrap();
        let layout = resolve_layout(&config, dir.path()).unwrap();
        assert_eq!(
            layout.sources,
            vec![
                dir.path().join("gen"),
                dir.path().join("src"),
                dir.path().join("Extra.java"),
            ]
        );
        assert_eq!(layout.target, dir.path().join("out"));
    }

    #[test]
    fn missing_configured_source_errors() {
        let dir = tempfile::tempdir().unwrap();
        let toml = "[project]\nname = \"demo\"\nsources = [\"nope\"]\n";
        let config = load_config_from_str(toml).unwrap();
        let err = resolve_layout(&config, dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSourcePath(_)));
    }

    #[test]
    fn dependency_paths_become_absolute() {
        let toml = r#"
[project]
name = "demo"
dependencies = ["org.x:y:jar:1.0", "lib/extra.jar"]
"#;
        let config = load_config_from_str(toml).unwrap();
        let layout = resolve_layout(&config, Path::new("/work/demo")).unwrap();
        assert_eq!(layout.dependencies[0], "org.x:y:jar:1.0");
        assert_eq!(
            PathBuf::from(&layout.dependencies[1]),
            Path::new("/work/demo/lib/extra.jar")
        );
    }

    #[test]
    fn toolchain_defaults_without_java_home() {
        let config = load_config_from_str(MINIMAL).unwrap();
        let tools = resolve_toolchain_with(&config, None);
        assert_eq!(tools.java, PathBuf::from("java"));
        assert_eq!(tools.javac, PathBuf::from("javac"));
        assert_eq!(tools.scalac, PathBuf::from("scalac"));
        assert_eq!(tools.groovyc, PathBuf::from("groovyc"));
        assert!(tools.repository.is_none());
    }

    #[test]
    fn toolchain_uses_java_home() {
        let config = load_config_from_str(MINIMAL).unwrap();
        let tools = resolve_toolchain_with(&config, Some(Path::new("/opt/jdk")));
        assert_eq!(tools.java, Path::new("/opt/jdk/bin/java"));
        assert_eq!(tools.javac, Path::new("/opt/jdk/bin/javac"));
        assert_eq!(tools.scalac, PathBuf::from("scalac"));
    }

    #[test]
    fn configured_tool_wins_over_java_home() {
        let toml = "[project]\nname = \"demo\"\n[toolchain]\njava = \"/usr/bin/java\"\n";
        let config = load_config_from_str(toml).unwrap();
        let tools = resolve_toolchain_with(&config, Some(Path::new("/opt/jdk")));
        assert_eq!(tools.java, Path::new("/usr/bin/java"));
    }
}
