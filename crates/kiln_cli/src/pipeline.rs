//! Shared pipeline helpers for CLI commands.
//!
//! Contains the project-loading and compile steps used by both `build` and
//! `test`: project root resolution, configuration loading, toolchain setup,
//! and the compile call itself.

use std::path::{Path, PathBuf};

use kiln_compile::{
    ClasspathEntry, Cljc, CompileSummary, LocalRepository, SystemRunner, Toolchain,
};
use kiln_config::{
    resolve_layout, resolve_toolchain, CompileOptions, ProjectConfig, ResolvedLayout,
    ResolvedToolchain, CONFIG_FILE,
};
use kiln_engine::TimestampEngine;

use crate::GlobalArgs;

/// A loaded project: its directory, configuration, and resolved layout.
pub struct Project {
    /// Directory containing the configuration file.
    pub dir: PathBuf,
    /// Parsed configuration.
    pub config: ProjectConfig,
    /// Paths resolved against `dir`.
    pub layout: ResolvedLayout,
    /// External tool locations.
    pub tools: ResolvedToolchain,
}

/// Walks up from `start` looking for the nearest directory containing `kiln.toml`.
///
/// Returns the directory containing `kiln.toml`, or an error if none is found.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Loads the project selected by the global CLI args.
///
/// If `--config` names a file, it is read directly and its directory is the
/// project root. A directory is treated as the project root. Otherwise the
/// current directory and its parents are searched for `kiln.toml`.
pub fn load_project(global: &GlobalArgs) -> Result<Project, Box<dyn std::error::Error>> {
    let (dir, config) = match &global.config {
        Some(path) => {
            let path = PathBuf::from(path);
            if path.is_file() {
                let content = std::fs::read_to_string(&path)?;
                let dir = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                (dir, kiln_config::load_config_from_str(&content)?)
            } else {
                let config = kiln_config::load_config(&path)?;
                (path, config)
            }
        }
        None => {
            let dir = find_project_root(&std::env::current_dir()?)?;
            let config = kiln_config::load_config(&dir)?;
            (dir, config)
        }
    };

    let layout = resolve_layout(&config, &dir)?;
    let tools = resolve_toolchain(&config);
    Ok(Project {
        dir,
        config,
        layout,
        tools,
    })
}

/// Opens the configured artifact repository, or the per-user default.
pub fn repository(tools: &ResolvedToolchain) -> Result<LocalRepository, Box<dyn std::error::Error>> {
    match &tools.repository {
        Some(root) => Ok(LocalRepository::new(root)),
        None => Ok(LocalRepository::default_location()?),
    }
}

/// Builds the toolchain for `project`, resolving through `repo`.
pub fn toolchain<'a>(project: &Project, repo: &'a LocalRepository) -> Toolchain<'a> {
    Toolchain::from_resolved(
        &project.tools,
        ClasspathEntry::parse_all(&project.layout.runtime),
        repo,
        &SystemRunner,
    )
}

/// Compiles `project` with `options`.
pub fn compile(
    project: &Project,
    toolchain: Toolchain<'_>,
    options: CompileOptions,
    force: bool,
) -> Result<CompileSummary, Box<dyn std::error::Error>> {
    let layout = &project.layout;
    if layout.sources.is_empty() {
        return Err(format!(
            "no source directories found in {}",
            project.dir.display()
        )
        .into());
    }

    let dependencies = ClasspathEntry::parse_all(&layout.dependencies);
    let engine = TimestampEngine::new().force(force);
    let cljc = Cljc::new(options, toolchain);
    Ok(cljc.compile(&layout.sources, &layout.target, &dependencies, &engine)?)
}
