//! Parsing and validation of `kiln.toml` project configuration files.
//!
//! This crate reads the project configuration file and produces a strongly-typed
//! [`ProjectConfig`], validates the compiler option set, and resolves the
//! source layout and toolchain locations against a project directory.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{check_options, load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{
    resolve_layout, resolve_toolchain, resolve_toolchain_with, ResolvedLayout, ResolvedToolchain,
    DEFAULT_SOURCE_DIRS, DEFAULT_TARGET, DEFAULT_TEST_SOURCES,
};
pub use types::*;
