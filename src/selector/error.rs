use crate::formats::FormatKind;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that end an enumerate or select-and-parse call
///
/// Filtering decisions themselves never fail; every variant here is fatal for
/// the call that produced it.
#[derive(Error, Debug)]
pub enum SelectError {
    #[error("Invalid exclusion pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to walk {}: {source}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("Failed to parse {format} resources: {source:#}")]
    Parse {
        format: FormatKind,
        #[source]
        source: anyhow::Error,
    },
}
