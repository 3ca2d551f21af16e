//! Glob pattern utilities
//!
//! Exclusion patterns are compiled once into a single `GlobSet` so that each
//! candidate path costs one match call regardless of how many patterns exist.

use crate::selector::SelectError;
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};

/// Compile a single pattern with path-aware semantics
///
/// `*` and `?` never cross a `/`; only `**` spans directories. This keeps
/// `*.json` anchored to the top level while `**/*.json` reaches any depth.
pub fn compile_glob(pattern: &str) -> Result<Glob, SelectError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| SelectError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Create a GlobSet from a list of patterns for efficient batch matching
pub fn build_globset(patterns: &[String]) -> Result<GlobSet, SelectError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(compile_glob(pattern)?);
    }

    builder.build().map_err(|source| SelectError::InvalidPattern {
        pattern: patterns.join(", "),
        source,
    })
}
