//! Shared foundational types used across the kiln build driver.
//!
//! This crate provides the unit identifier with its namespace/path mapping and
//! artifact coordinates used for classpath dependencies.

#![warn(missing_docs)]

pub mod artifact;
pub mod unit;

pub use artifact::{ArtifactSpec, ParseArtifactError};
pub use unit::{ParseUnitError, UnitId, CLASS_EXT, INIT_SUFFIX, SOURCE_EXT};
