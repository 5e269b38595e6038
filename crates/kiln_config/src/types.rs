//! Configuration types deserialized from `kiln.toml`.

use kiln_common::UnitId;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// Runtime artifact used when `[clojure] spec` is not given.
pub const DEFAULT_CLOJURE_SPEC: &str = "org.clojure:clojure:jar:1.1.0";

/// The top-level project configuration parsed from `kiln.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata and layout.
    pub project: ProjectMeta,
    /// Clojure runtime settings.
    #[serde(default)]
    pub clojure: ClojureConfig,
    /// External tool locations.
    #[serde(default)]
    pub toolchain: ToolchainConfig,
    /// Options handed to the compiler.
    #[serde(default)]
    pub cljc: CompileOptions,
    /// Test suite selection.
    #[serde(default)]
    pub test: TestConfig,
}

/// Core project metadata required in every `kiln.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    #[serde(default = "default_version")]
    pub version: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
    /// Source entries relative to the project directory. Directories become
    /// source roots; files are compiled as listed.
    ///
    /// When absent, the existing `src/main/{clojure,java,scala,groovy}`
    /// directories are used.
    #[serde(default)]
    pub sources: Option<Vec<String>>,
    /// Output directory relative to the project directory.
    #[serde(default)]
    pub target: Option<String>,
    /// Classpath dependencies: artifact coordinates, directories or files.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

fn default_version() -> String {
    "0.0.0".to_string()
}

/// Clojure runtime settings.
#[derive(Debug, Deserialize)]
pub struct ClojureConfig {
    /// Artifact coordinates (or paths) that make up the Clojure runtime.
    ///
    /// Accepts either a single string or a list of strings.
    #[serde(default = "default_runtime", deserialize_with = "deserialize_string_or_vec")]
    pub spec: Vec<String>,
}

impl Default for ClojureConfig {
    fn default() -> Self {
        Self {
            spec: default_runtime(),
        }
    }
}

fn default_runtime() -> Vec<String> {
    vec![DEFAULT_CLOJURE_SPEC.to_string()]
}

/// Deserializes a field that can be either a single string or a list of strings.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Locations of the external tools. Unset entries fall back to defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainConfig {
    /// The `java` launcher. Defaults to `$JAVA_HOME/bin/java`, then `java`.
    pub java: Option<String>,
    /// The `javac` compiler.
    pub javac: Option<String>,
    /// The `scalac` compiler.
    pub scalac: Option<String>,
    /// The `groovyc` compiler.
    pub groovyc: Option<String>,
    /// Local artifact repository. Defaults to `~/.m2/repository`.
    pub repository: Option<String>,
}

/// The recognized compiler options.
///
/// Exactly `libs` plus one option sub-object per secondary compiler. Keys
/// outside this set are rejected by [`check_options`](crate::check_options).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompileOptions {
    /// Units to compile. `None` means every unit found under the source roots.
    #[serde(default)]
    pub libs: Option<Vec<UnitId>>,
    /// Options for `javac`.
    #[serde(default)]
    pub javac: JavacOptions,
    /// Options for `scalac`.
    #[serde(default)]
    pub scalac: ScalacOptions,
    /// Options for `groovyc`.
    #[serde(default)]
    pub groovyc: GroovycOptions,
}

impl CompileOptions {
    /// Every key accepted in the `[cljc]` table.
    pub const OPTIONS: [&'static str; 4] = ["libs", "scalac", "groovyc", "javac"];

    /// Options with an explicit compile list.
    pub fn with_libs(libs: Vec<UnitId>) -> Self {
        Self {
            libs: Some(libs),
            ..Self::default()
        }
    }
}

/// Options for the Java compiler.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JavacOptions {
    /// Source compatibility level (`-source`).
    pub source: Option<String>,
    /// Target bytecode level (`-target`).
    pub target: Option<String>,
    /// Emit debugging information (`-g`).
    #[serde(default = "enabled")]
    pub debug: bool,
    /// Lint categories (`-Xlint:<value>`).
    pub lint: Option<String>,
    /// Extra arguments passed through verbatim.
    #[serde(default)]
    pub other: Vec<String>,
}

impl Default for JavacOptions {
    fn default() -> Self {
        Self {
            source: None,
            target: None,
            debug: true,
            lint: None,
            other: Vec::new(),
        }
    }
}

/// Options for the Scala compiler.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScalacOptions {
    /// Target platform (`-target:<value>`).
    pub target: Option<String>,
    /// Emit debugging information (`-g:vars`).
    #[serde(default = "enabled")]
    pub debug: bool,
    /// Warn about deprecated API usage (`-deprecation`).
    #[serde(default)]
    pub deprecation: bool,
    /// Enable the optimiser (`-optimise`).
    #[serde(default)]
    pub optimise: bool,
    /// Extra arguments passed through verbatim.
    #[serde(default)]
    pub other: Vec<String>,
}

impl Default for ScalacOptions {
    fn default() -> Self {
        Self {
            target: None,
            debug: true,
            deprecation: false,
            optimise: false,
            other: Vec::new(),
        }
    }
}

/// Options for the Groovy joint compiler.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroovycOptions {
    /// Source file encoding (`--encoding`).
    pub encoding: Option<String>,
    /// Print a stack trace when compilation fails (`-e`).
    #[serde(default)]
    pub stacktrace: bool,
    /// Extra arguments passed through verbatim.
    #[serde(default)]
    pub other: Vec<String>,
}

fn enabled() -> bool {
    true
}

/// Test suite selection.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestConfig {
    /// Test source root relative to the project. Defaults to `src/test/clojure`.
    pub sources: Option<String>,
    /// Extra suites to run besides the discovered ones.
    #[serde(default)]
    pub include: Vec<UnitId>,
    /// Suites to leave out.
    #[serde(default)]
    pub exclude: Vec<UnitId>,
}
