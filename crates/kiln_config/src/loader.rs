//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{CompileOptions, ProjectConfig};
use std::path::Path;

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = "kiln.toml";

/// Loads and validates a `kiln.toml` configuration from a project directory.
///
/// Reads `<project_dir>/kiln.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
        path: config_path.clone(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates a `kiln.toml` configuration from a string.
///
/// The `[cljc]` table is checked against the recognized option keys before
/// the typed configuration is built.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let table: toml::Table = content
        .parse()
        .map_err(|e: toml::de::Error| ConfigError::Parse(e.to_string()))?;

    if let Some(cljc) = table.get("cljc").and_then(|v| v.as_table()) {
        check_options(cljc.keys().map(String::as_str))?;
    }

    let config = toml::Value::Table(table)
        .try_into::<ProjectConfig>()
        .map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Rejects any compiler option key outside [`CompileOptions::OPTIONS`].
///
/// Reports the first offending key.
pub fn check_options<'a>(keys: impl IntoIterator<Item = &'a str>) -> Result<(), ConfigError> {
    for key in keys {
        if !CompileOptions::OPTIONS.contains(&key) {
            return Err(ConfigError::UnknownOption(key.to_string()));
        }
    }
    Ok(())
}

/// Validates that required fields are present and configuration values are consistent.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name"));
    }
    if config.clojure.spec.is_empty() {
        return Err(ConfigError::Invalid(
            "clojure.spec must name at least one runtime artifact".to_string(),
        ));
    }
    if let Some(target) = &config.project.target {
        if target.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "project.target must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
[project]
name = "demo"
version = "0.1.0"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.name, "demo");
        assert_eq!(config.project.version, "0.1.0");
        assert!(config.project.sources.is_none());
        assert!(config.project.dependencies.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[project]
name = "demo"
version = "0.1.0"
description = "mixed project"
sources = ["src/main/clojure", "src/main/java"]
target = "out/classes"
dependencies = ["org.clojure:tools.logging:jar:0.2.0", "lib/extra.jar"]

[clojure]
spec = "org.clojure:clojure:jar:1.2.0"

[toolchain]
java = "/opt/jdk/bin/java"
scalac = "/opt/scala/bin/scalac"
repository = "/var/m2"

[cljc]
libs = ["foo.bar"]

[test]
sources = "test"
include = ["extra-test"]
exclude = ["slow-test"]
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.sources.as_ref().unwrap().len(), 2);
        assert_eq!(config.project.target.as_deref(), Some("out/classes"));
        assert_eq!(config.project.dependencies.len(), 2);
        assert_eq!(config.toolchain.java.as_deref(), Some("/opt/jdk/bin/java"));
        assert_eq!(config.toolchain.repository.as_deref(), Some("/var/m2"));
        assert_eq!(config.cljc.libs.as_ref().unwrap().len(), 1);
        assert_eq!(config.test.sources.as_deref(), Some("test"));
        assert_eq!(config.test.exclude[0].as_str(), "slow-test");
    }

    #[test]
    fn unknown_compiler_option_names_the_key() {
        let toml = r#"
[project]
name = "demo"

[cljc]
libs = []
kotlinc = { jvm_target = "1.8" }
"#;
        let err = load_config_from_str(toml).unwrap_err();
        match err {
            ConfigError::UnknownOption(key) => assert_eq!(key, "kotlinc"),
            other => panic!("expected UnknownOption, got {other:?}"),
        }
    }

    #[test]
    fn check_options_accepts_recognized_set() {
        assert!(check_options(["libs", "javac", "scalac", "groovyc"]).is_ok());
        assert!(matches!(
            check_options(["libs", "warn"]),
            Err(ConfigError::UnknownOption(k)) if k == "warn"
        ));
    }

    #[test]
    fn missing_name_errors() {
        let toml = r#"
[project]
name = ""
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn empty_runtime_errors() {
        let toml = r#"
[project]
name = "demo"

[clojure]
spec = []
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_project_section_errors() {
        let err = load_config_from_str("[cljc]\nlibs = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_toolchain_key_errors() {
        let toml = r#"
[project]
name = "demo"

[toolchain]
kotlinc = "kotlinc"
"#;
        assert!(matches!(
            load_config_from_str(toml),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn load_from_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[project]\nname = \"on-disk\"\n").unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.project.name, "on-disk");
    }
}
