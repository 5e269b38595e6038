//! `kiln init`: project scaffolding command.
//!
//! Creates a new Kiln project directory with the standard layout:
//! `src/main/clojure/`, `src/test/clojure/`, a `kiln.toml` config file, and a
//! starter namespace with a matching test suite.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use kiln_common::UnitId;
use kiln_config::{CONFIG_FILE, DEFAULT_CLOJURE_SPEC, DEFAULT_SOURCE_DIRS, DEFAULT_TEST_SOURCES};

use crate::GlobalArgs;

/// Runs the `kiln init` command.
///
/// If `name` is `Some`, creates a new subdirectory with that name.
/// Otherwise initializes in the current working directory.
/// Returns exit code 0 on success.
pub fn run(name: Option<String>, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = match &name {
        Some(n) => {
            let dir = PathBuf::from(n);
            if dir.exists() {
                return Err(format!("directory '{n}' already exists").into());
            }
            fs::create_dir_all(&dir)?;
            dir
        }
        None => std::env::current_dir()?,
    };

    if project_dir.join(CONFIG_FILE).exists() {
        return Err(format!("{CONFIG_FILE} already exists in {}", project_dir.display()).into());
    }

    let project_name = project_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("my_project");
    let main_ns = starter_namespace(project_name)?;
    let test_ns: UnitId = format!("{main_ns}-test").parse()?;

    if !global.quiet {
        eprintln!("  Creating new Kiln project `{project_name}`");
    }

    let main_root = project_dir.join(DEFAULT_SOURCE_DIRS[0]);
    let test_root = project_dir.join(DEFAULT_TEST_SOURCES);

    write_kiln_toml(&project_dir, project_name)?;
    let main_file = write_namespace(&main_root, &main_ns, &main_source(&main_ns))?;
    let test_file = write_namespace(&test_root, &test_ns, &test_source(&test_ns, &main_ns))?;

    if !global.quiet {
        eprintln!("     Created {}", project_dir.join(CONFIG_FILE).display());
        eprintln!("     Created {}", main_file.display());
        eprintln!("     Created {}", test_file.display());
    }

    Ok(0)
}

/// Derives `<name>.core` from a directory name, mapping `_` and spaces to `-`.
fn starter_namespace(project_name: &str) -> Result<UnitId, Box<dyn std::error::Error>> {
    let base: String = project_name
        .chars()
        .map(|c| match c {
            '_' | ' ' | '.' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect();
    Ok(format!("{base}.core").parse()?)
}

/// Writes the `kiln.toml` configuration file.
fn write_kiln_toml(root: &Path, name: &str) -> io::Result<()> {
    let content = format!(
        r#"[project]
name = "{name}"
version = "0.1.0"

[clojure]
spec = "{DEFAULT_CLOJURE_SPEC}"

[cljc]

[test]
include = []
exclude = []
"#
    );
    fs::write(root.join(CONFIG_FILE), content)
}

/// Writes `content` as the source file of `ns` beneath `root`.
fn write_namespace(root: &Path, ns: &UnitId, content: &str) -> io::Result<PathBuf> {
    let path = ns.source_file(root);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    Ok(path)
}

fn main_source(ns: &UnitId) -> String {
    format!(
        r#"(ns {ns})

(defn greet
  "Returns a greeting for `name`."
  [name]
  (str "Hello, " name "!"))
"#
    )
}

fn test_source(ns: &UnitId, subject: &UnitId) -> String {
    format!(
        r#"(ns {ns}
  (:use clojure.test
        {subject}))

(deftest greet-test
  (is (= "Hello, kiln!" (greet "kiln"))))
"#
    )
}
