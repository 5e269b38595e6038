//! `kiln build`: compile the project into its output directory.
//!
//! Loads `kiln.toml`, resolves the layout and toolchain, runs the compiler
//! driver and prints a summary of what was compiled, copied, or left alone.

use kiln_compile::{CompileSummary, MixedMode};
use kiln_config::CompileOptions;

use crate::pipeline::{compile, load_project, repository, toolchain};
use crate::{BuildArgs, GlobalArgs, ReportFormat};

/// Runs the `kiln build` command.
///
/// Returns exit code 0 on success. Compile failures are returned as errors.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;

    if !global.quiet {
        eprintln!(
            "   Compiling {} v{}",
            project.config.project.name, project.config.project.version
        );
    }

    let options = build_options(&project.config.cljc, args);
    let repo = repository(&project.tools)?;
    let summary = compile(&project, toolchain(&project, &repo), options, args.force)?;

    match args.format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        ReportFormat::Text => {
            if !global.quiet {
                print_summary(&summary, global.verbose);
                eprintln!("    Finished {}", project.layout.target.display());
            }
        }
    }

    Ok(0)
}

/// The configured options, with `--libs` replacing the compile list if given.
fn build_options(configured: &CompileOptions, args: &BuildArgs) -> CompileOptions {
    let mut options = configured.clone();
    if !args.libs.is_empty() {
        options.libs = Some(args.libs.clone());
    }
    options
}

/// Prints the text summary of a compile call to stderr.
fn print_summary(summary: &CompileSummary, verbose: bool) {
    let report = &summary.report;
    if report.is_noop() {
        eprintln!("  Up to date ({} target(s))", report.fresh.len());
    } else {
        eprintln!(
            "    Compiled {} unit(s), copied {} source(s), {} up to date",
            report.rebuilt.len(),
            report.copied.len(),
            report.fresh.len()
        );
    }

    let missing = summary.libs.len().saturating_sub(summary.located.len());
    if missing > 0 {
        eprintln!("warning: {missing} namespace(s) had no source file");
    }

    if summary.mixed != MixedMode::ClojureOnly {
        eprintln!("       Mixed {} sources", summary.mixed);
    }

    if verbose {
        for path in report.rebuilt.iter().chain(&report.copied) {
            eprintln!("       Wrote {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use kiln_common::UnitId;

    fn build_args(argv: &[&str]) -> BuildArgs {
        let mut full = vec!["build"];
        full.extend_from_slice(argv);
        BuildArgs::parse_from(full)
    }

    #[test]
    fn libs_flag_overrides_config() {
        let configured = CompileOptions::with_libs(vec!["from.config".parse().unwrap()]);
        let options = build_options(&configured, &build_args(&["--libs", "a.b,c"]));
        let libs: Vec<&str> = options.libs.as_ref().unwrap().iter().map(UnitId::as_str).collect();
        assert_eq!(libs, vec!["a.b", "c"]);
    }

    #[test]
    fn config_libs_kept_without_flag() {
        let configured = CompileOptions::with_libs(vec!["from.config".parse().unwrap()]);
        let options = build_options(&configured, &build_args(&[]));
        assert_eq!(options.libs.unwrap()[0].as_str(), "from.config");
    }

    #[test]
    fn secondary_options_survive_override() {
        let mut configured = CompileOptions::default();
        configured.javac.source = Some("1.8".to_string());
        let options = build_options(&configured, &build_args(&["--libs", "x"]));
        assert_eq!(options.javac.source.as_deref(), Some("1.8"));
    }

    #[test]
    fn summary_serializes_to_json() {
        let summary = CompileSummary {
            libs: vec!["foo.bar".parse().unwrap()],
            located: Vec::new(),
            mirrored: 1,
            report: Default::default(),
            mixed: MixedMode::WithJava,
        };
        let json: serde_json::Value = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["libs"][0], "foo.bar");
        assert_eq!(json["mixed"], "with_java");
        assert_eq!(json["report"]["actions_run"], 0);
    }
}
