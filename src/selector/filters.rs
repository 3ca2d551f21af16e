//! Path qualification
//!
//! Every candidate entry produced by the walk is run through a
//! [`PathQualifier`]. The checks run in a fixed order: the cheap, side-effect
//! free ones first, then exclusion and size, which record the path as claimed
//! when the qualifier is in claiming mode.

use super::ClaimedPaths;
use super::exclusions::ExclusionSet;
use crate::formats::ResourceFormat;
use crate::shared::paths::relativize;
use std::ffi::OsStr;
use std::fs::Metadata;
use std::path::{Component, Path};

/// Directory names whose contents are never resources
///
/// Build outputs, tool caches and dependency folders.
pub const SKIP_DIRECTORIES: &[&str] = &[
    "target",
    "build",
    "out",
    ".gradle",
    "node_modules",
    ".metadata",
];

pub fn is_skip_directory(name: &OsStr) -> bool {
    SKIP_DIRECTORIES.iter().any(|skip| OsStr::new(skip) == name)
}

/// Decision for whether to process or skip a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// Select this path
    Process,
    /// Skip this path with a reason
    Skip(&'static str),
}

impl FilterDecision {
    pub fn is_process(self) -> bool {
        matches!(self, FilterDecision::Process)
    }
}

/// The metadata the qualifier looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMeta {
    pub is_dir: bool,
    pub len: u64,
}

impl From<&Metadata> for EntryMeta {
    fn from(metadata: &Metadata) -> Self {
        Self {
            is_dir: metadata.is_dir(),
            len: metadata.len(),
        }
    }
}

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Upper bound on selected file sizes
///
/// Configured in megabytes; zero or negative disables the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeThreshold {
    megabytes: i64,
    limit_bytes: Option<u64>,
}

impl SizeThreshold {
    pub fn from_megabytes(megabytes: i64) -> Self {
        let limit_bytes = u64::try_from(megabytes)
            .ok()
            .filter(|mb| *mb > 0)
            .map(|mb| mb.saturating_mul(BYTES_PER_MB));
        Self {
            megabytes,
            limit_bytes,
        }
    }

    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Byte ceiling, or `None` when unlimited
    pub fn limit_bytes(&self) -> Option<u64> {
        self.limit_bytes
    }

    /// Only strictly larger sizes exceed the threshold
    pub fn is_exceeded_by(&self, len: u64) -> bool {
        self.limit_bytes.is_some_and(|limit| len > limit)
    }

    pub fn megabytes(&self) -> i64 {
        self.megabytes
    }
}

/// Decides whether a walked entry is selected for one format
///
/// Built in one of two modes. [`PathQualifier::enumeration`] is pure: nothing
/// outside the qualifier changes. [`PathQualifier::claiming`] consults and
/// extends a claimed-path set so later format passes skip what this one
/// already settled.
pub struct PathQualifier<'a> {
    format: &'a dyn ResourceFormat,
    search_root: &'a Path,
    base_dir: &'a Path,
    exclusions: &'a ExclusionSet,
    size_threshold: SizeThreshold,
    claimed: Option<&'a mut ClaimedPaths>,
}

impl<'a> PathQualifier<'a> {
    pub fn enumeration(
        format: &'a dyn ResourceFormat,
        search_root: &'a Path,
        base_dir: &'a Path,
        exclusions: &'a ExclusionSet,
        size_threshold: SizeThreshold,
    ) -> Self {
        Self {
            format,
            search_root,
            base_dir,
            exclusions,
            size_threshold,
            claimed: None,
        }
    }

    pub fn claiming(
        format: &'a dyn ResourceFormat,
        search_root: &'a Path,
        base_dir: &'a Path,
        exclusions: &'a ExclusionSet,
        size_threshold: SizeThreshold,
        claimed: &'a mut ClaimedPaths,
    ) -> Self {
        Self {
            claimed: Some(claimed),
            ..Self::enumeration(format, search_root, base_dir, exclusions, size_threshold)
        }
    }

    /// Evaluate `path`; the order of the checks is significant
    pub fn evaluate(&mut self, path: &Path, meta: &EntryMeta) -> FilterDecision {
        if !self.format.accepts(path) {
            return FilterDecision::Skip("not recognized by format");
        }

        if self.in_skip_directory(path) {
            return self.skip(path, "inside a skipped directory");
        }

        if meta.is_dir || meta.len == 0 {
            return self.skip(path, "directory or empty file");
        }

        if self.claimed.as_deref().is_some_and(|claimed| claimed.contains(path)) {
            return self.skip(path, "already claimed");
        }

        if self.exclusions.is_excluded(&relativize(self.base_dir, path)) {
            self.claim(path);
            return self.skip(path, "matches an exclusion pattern");
        }

        if self.size_threshold.is_exceeded_by(meta.len) {
            if let Some(claimed) = self.claimed.as_deref_mut() {
                claimed.insert(path.to_path_buf());
                tracing::info!(
                    "Skipping parsing {} as its size {}Mb ({} bytes) exceeds size threshold {}Mb",
                    path.display(),
                    meta.len / BYTES_PER_MB,
                    meta.len,
                    self.size_threshold.megabytes()
                );
            }
            return self.skip(path, "exceeds size threshold");
        }

        FilterDecision::Process
    }

    fn in_skip_directory(&self, path: &Path) -> bool {
        relativize(self.search_root, path)
            .components()
            .any(|component| match component {
                Component::Normal(name) => is_skip_directory(name),
                _ => false,
            })
    }

    fn claim(&mut self, path: &Path) {
        if let Some(claimed) = self.claimed.as_deref_mut() {
            claimed.insert(path.to_path_buf());
        }
    }

    fn skip(&self, path: &Path, reason: &'static str) -> FilterDecision {
        tracing::trace!(
            "{} skipped {}: {}",
            self.format.kind(),
            path.display(),
            reason
        );
        FilterDecision::Skip(reason)
    }
}
