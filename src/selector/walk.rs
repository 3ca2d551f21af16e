//! Depth-bounded directory walk
//!
//! Built on `ignore::WalkBuilder` with all of its ignore-file handling turned
//! off: what gets selected is decided by the caller's predicate, not by
//! `.gitignore`. Entries come back sorted by file name so results are stable
//! across runs and platforms.

use super::SelectError;
use super::filters::EntryMeta;
use ignore::WalkBuilder;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// How many levels below the search root are visited
pub const MAX_DEPTH: usize = 16;

/// Walk `root` and return every entry `accept` approves
///
/// Directories whose name satisfies `prune` are not descended into (the root
/// itself is never pruned). The first I/O error ends the walk.
pub fn walk_matching<F>(
    root: &Path,
    max_depth: usize,
    prune: fn(&OsStr) -> bool,
    mut accept: F,
) -> Result<Vec<PathBuf>, SelectError>
where
    F: FnMut(&Path, &EntryMeta) -> bool,
{
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .max_depth(Some(max_depth))
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            !(entry.depth() > 0 && is_dir && prune(entry.file_name()))
        })
        .build();

    let mut selected = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| walk_error(root, source))?;
        let metadata = entry.metadata().map_err(|source| walk_error(root, source))?;

        let path = entry.path();
        if accept(path, &EntryMeta::from(&metadata)) {
            selected.push(path.to_path_buf());
        }
    }

    Ok(selected)
}

fn walk_error(root: &Path, source: ignore::Error) -> SelectError {
    tracing::error!("Failed to walk {}: {}", root.display(), source);
    SelectError::Walk {
        root: root.to_path_buf(),
        source,
    }
}
