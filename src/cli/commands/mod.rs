//! Command implementations
//!
//! `list` and `parse` share the selection flags defined here.

use crate::config::ConfigOverrides;
use crate::shared::paths::{relativize, to_slash};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};

pub mod config;
pub mod list;
pub mod parse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Flags that shape the selection, layered over the loaded configuration
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Directory to search, relative to the base directory (defaults to the base directory)
    #[arg(value_name = "SEARCH_DIR")]
    pub search_dir: Option<PathBuf>,

    /// Additional exclusion glob, relative to the base directory (can be repeated)
    #[arg(short = 'e', long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Nested build unit whose files are excluded (can be repeated)
    #[arg(short = 's', long = "subproject", value_name = "DIR")]
    pub subproject: Vec<PathBuf>,

    /// Maximum file size in megabytes; 0 or negative disables the limit
    #[arg(long, value_name = "MB", allow_negative_numbers = true)]
    pub size_threshold: Option<i64>,
}

impl SelectionArgs {
    pub fn overrides(&self, strict: Option<bool>) -> ConfigOverrides {
        ConfigOverrides {
            size_threshold_mb: self.size_threshold,
            strict,
            exclusions: self.exclude.clone(),
            subprojects: self.subproject.clone(),
        }
    }

    /// The search directory as an absolute, canonical path
    pub fn resolve_search_dir(&self, base_dir: &Path) -> Result<PathBuf> {
        let dir = match &self.search_dir {
            Some(dir) => base_dir.join(dir),
            None => return Ok(base_dir.to_path_buf()),
        };
        dir.canonicalize()
            .with_context(|| format!("Search directory not found: {}", dir.display()))
    }
}

/// Render a selected path for display
pub(crate) fn display_path(base_dir: &Path, path: &Path) -> String {
    to_slash(&relativize(base_dir, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_overrides_from_flags() {
        let args = SelectionArgs {
            exclude: vec!["gen/**".to_string()],
            subproject: vec![PathBuf::from("sub")],
            size_threshold: Some(3),
            ..SelectionArgs::default()
        };

        let overrides = args.overrides(Some(true));
        assert_eq!(overrides.size_threshold_mb, Some(3));
        assert_eq!(overrides.strict, Some(true));
        assert_eq!(overrides.exclusions, vec!["gen/**"]);
        assert_eq!(overrides.subprojects, vec![PathBuf::from("sub")]);
    }

    #[test]
    fn test_search_dir_is_relative_to_base() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();
        fs::create_dir(base.join("module")).unwrap();

        let args = SelectionArgs {
            search_dir: Some(PathBuf::from("module")),
            ..SelectionArgs::default()
        };
        assert_eq!(args.resolve_search_dir(&base).unwrap(), base.join("module"));
        assert_eq!(
            SelectionArgs::default().resolve_search_dir(&base).unwrap(),
            base
        );
    }

    #[test]
    fn test_missing_search_dir() {
        let temp_dir = TempDir::new().unwrap();
        let args = SelectionArgs {
            search_dir: Some(PathBuf::from("nope")),
            ..SelectionArgs::default()
        };
        let err = args.resolve_search_dir(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("Search directory not found"));
    }
}
