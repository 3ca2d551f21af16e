//! Exclusion policy
//!
//! Subproject boundaries become `<dir>/**` patterns, user patterns are taken
//! as given, and the lot is compiled into one `GlobSet`. Patterns match paths
//! relative to the base directory.

use super::SelectError;
use crate::shared::glob::build_globset;
use crate::shared::paths::{relativize, to_slash};
use globset::GlobSet;
use std::path::{Path, PathBuf};

/// Combine subproject boundaries and user patterns into one pattern list
///
/// Absolute subproject paths are made relative to `base_dir`; relative ones
/// are taken to be relative to it already. A subproject that is the base
/// directory itself would exclude everything and is ignored.
pub fn merge_exclusions(base_dir: &Path, subprojects: &[PathBuf], user: &[String]) -> Vec<String> {
    let mut patterns: Vec<String> = subprojects
        .iter()
        .filter_map(|subproject| {
            let relative = if subproject.is_absolute() {
                relativize(base_dir, subproject)
            } else {
                subproject.clone()
            };
            let relative = to_slash(&relative);
            if relative.is_empty() {
                tracing::debug!(
                    "Ignoring subproject {} (same as base directory)",
                    subproject.display()
                );
                return None;
            }
            Some(format!("{relative}/**"))
        })
        .collect();

    patterns.extend(user.iter().cloned());
    patterns
}

/// Compiled exclusion patterns
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    patterns: Vec<String>,
    globs: GlobSet,
}

impl ExclusionSet {
    /// Compile `patterns`, failing on the first invalid one
    pub fn compile(patterns: Vec<String>) -> Result<Self, SelectError> {
        let globs = build_globset(&patterns)?;
        tracing::debug!("Compiled {} exclusion patterns", patterns.len());
        Ok(Self { patterns, globs })
    }

    /// Whether a base-relative path matches any pattern
    pub fn is_excluded(&self, relative: &Path) -> bool {
        !self.globs.is_empty() && self.globs.is_match(relative)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_subprojects_then_user_patterns() {
        let patterns = merge_exclusions(
            Path::new("/repo"),
            &[PathBuf::from("/repo/sub"), PathBuf::from("libs/core")],
            &["**/secrets.yaml".to_string(), "*.tfvars".to_string()],
        );
        assert_eq!(
            patterns,
            vec!["sub/**", "libs/core/**", "**/secrets.yaml", "*.tfvars"]
        );
    }

    #[test]
    fn test_merge_keeps_duplicates() {
        let patterns = merge_exclusions(
            Path::new("/repo"),
            &[PathBuf::from("/repo/sub")],
            &["sub/**".to_string()],
        );
        assert_eq!(patterns, vec!["sub/**", "sub/**"]);
    }

    #[test]
    fn test_merge_ignores_base_dir_as_subproject() {
        let patterns = merge_exclusions(Path::new("/repo"), &[PathBuf::from("/repo")], &[]);
        assert!(patterns.is_empty());
    }

    #[test]
    fn test_subproject_pattern_excludes_nested_files() {
        let set = ExclusionSet::compile(merge_exclusions(
            Path::new("/repo"),
            &[PathBuf::from("/repo/sub")],
            &[],
        ))
        .unwrap();

        assert!(set.is_excluded(Path::new("sub/b.json")));
        assert!(set.is_excluded(Path::new("sub/deep/er/c.xml")));
        assert!(!set.is_excluded(Path::new("a.json")));
        assert!(!set.is_excluded(Path::new("subsystem/a.json")));
    }

    #[test]
    fn test_empty_set_excludes_nothing() {
        let set = ExclusionSet::compile(Vec::new()).unwrap();
        assert!(set.is_empty());
        assert!(!set.is_excluded(Path::new("a.json")));
    }

    #[test]
    fn test_invalid_pattern_fails_compile() {
        let err = ExclusionSet::compile(vec!["[oops".to_string()]).unwrap_err();
        assert!(matches!(err, SelectError::InvalidPattern { .. }));
        assert!(err.to_string().contains("[oops"));
    }
}
