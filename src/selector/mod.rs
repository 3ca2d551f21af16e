//! Resource file selection
//!
//! The selector walks a search directory once per registered format, keeps
//! the paths that format accepts and that survive the skip-directory,
//! exclusion and size checks, and either returns them (enumeration) or hands
//! them to the format's parser (select-and-parse).
//!
//! Two anchors are in play. Skip-directory names are looked up in the path
//! relative to the *search* directory, exclusion patterns are matched against
//! the path relative to the *base* directory.

mod error;
pub mod exclusions;
pub mod filters;
pub mod walk;

pub use error::SelectError;
pub use exclusions::{ExclusionSet, merge_exclusions};
pub use filters::{EntryMeta, FilterDecision, PathQualifier, SKIP_DIRECTORIES, SizeThreshold};
pub use walk::MAX_DEPTH;

use crate::config::SelectorConfig;
use crate::formats::{Document, FormatKind, FormatRegistry, ParseContext, ResourceFormat};
use filters::is_skip_directory;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Paths already settled during one multi-format sweep
///
/// Owned by the caller. The selector only ever inserts into it.
pub type ClaimedPaths = HashSet<PathBuf>;

/// Selects resource files and dispatches them to their formats
pub struct ResourceSelector {
    exclusions: ExclusionSet,
    size_threshold: SizeThreshold,
    registry: FormatRegistry,
}

impl ResourceSelector {
    /// Build a selector over the built-in formats
    ///
    /// `patterns` is the complete exclusion list (see [`merge_exclusions`]).
    /// Fails if any pattern is not a valid glob.
    pub fn new(patterns: Vec<String>, size_threshold_mb: i64) -> Result<Self, SelectError> {
        Ok(Self {
            exclusions: ExclusionSet::compile(patterns)?,
            size_threshold: SizeThreshold::from_megabytes(size_threshold_mb),
            registry: FormatRegistry::builtin(),
        })
    }

    /// Build a selector from loaded configuration
    pub fn from_config(config: &SelectorConfig, base_dir: &Path) -> Result<Self, SelectError> {
        let patterns = merge_exclusions(base_dir, &config.subprojects, &config.exclusions);
        Self::new(patterns, config.size_threshold_mb)
    }

    /// Replace the format registry
    pub fn with_registry(mut self, registry: FormatRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn exclusion_patterns(&self) -> &[String] {
        self.exclusions.patterns()
    }

    pub fn size_threshold(&self) -> SizeThreshold {
        self.size_threshold
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// Every path that would be parsed, grouped by format in registry order
    ///
    /// Has no side effects; repeated calls over an unchanged tree give the
    /// same sequence.
    pub fn enumerate(&self, base_dir: &Path, search_dir: &Path) -> Result<Vec<PathBuf>, SelectError> {
        let mut paths = Vec::new();
        for format in self.registry.iter() {
            paths.extend(self.select(format, base_dir, search_dir, None)?);
        }
        Ok(paths)
    }

    /// Paths one format would be handed, without parsing
    ///
    /// Returns `None` when no registered format has this kind.
    pub fn list_sources(
        &self,
        kind: FormatKind,
        base_dir: &Path,
        search_dir: &Path,
    ) -> Result<Option<Vec<PathBuf>>, SelectError> {
        self.registry
            .iter()
            .find(|format| format.kind() == kind)
            .map(|format| self.select(format, base_dir, search_dir, None))
            .transpose()
    }

    /// Select files for every format and parse them
    ///
    /// Each format's selection is added to `claimed` before its parser runs,
    /// so a later format never picks up the same path and a failing parser
    /// still leaves its attempt on record. The first error ends the call.
    pub fn select_and_parse(
        &self,
        base_dir: &Path,
        search_dir: &Path,
        claimed: &mut ClaimedPaths,
        ctx: &mut ParseContext,
    ) -> Result<Vec<Document>, SelectError> {
        let mut documents = Vec::new();
        for format in self.registry.iter() {
            documents.extend(self.parse_format(format, base_dir, search_dir, claimed, ctx)?);
        }
        tracing::debug!(
            "Parsed {} resource documents under {}",
            documents.len(),
            search_dir.display()
        );
        Ok(documents)
    }

    fn parse_format(
        &self,
        format: &dyn ResourceFormat,
        base_dir: &Path,
        search_dir: &Path,
        claimed: &mut ClaimedPaths,
        ctx: &mut ParseContext,
    ) -> Result<Vec<Document>, SelectError> {
        let paths = self.select(format, base_dir, search_dir, Some(&mut *claimed))?;
        claimed.extend(paths.iter().cloned());

        tracing::debug!("Parsing {} {} files", paths.len(), format.kind());
        format
            .parse(&paths, base_dir, ctx)
            .map_err(|source| SelectError::Parse {
                format: format.kind(),
                source,
            })
    }

    fn select(
        &self,
        format: &dyn ResourceFormat,
        base_dir: &Path,
        search_dir: &Path,
        claimed: Option<&mut ClaimedPaths>,
    ) -> Result<Vec<PathBuf>, SelectError> {
        let mut qualifier = match claimed {
            Some(claimed) => PathQualifier::claiming(
                format,
                search_dir,
                base_dir,
                &self.exclusions,
                self.size_threshold,
                claimed,
            ),
            None => PathQualifier::enumeration(
                format,
                search_dir,
                base_dir,
                &self.exclusions,
                self.size_threshold,
            ),
        };

        walk::walk_matching(search_dir, MAX_DEPTH, is_skip_directory, |path, meta| {
            qualifier.evaluate(path, meta).is_process()
        })
    }
}
