//! # resource-selector
//!
//! Finds resource files (JSON, XML, YAML, properties, protobuf schemas and
//! HCL) in a project tree and parses them.
//!
//! Selection walks the tree once per format, in a fixed order, and skips:
//!
//! - anything below a build-output or dependency directory (`target`, `build`,
//!   `out`, `.gradle`, `node_modules`, `.metadata`),
//! - directories and empty files,
//! - paths matching an exclusion glob or lying inside a subproject,
//! - files larger than the configured size threshold.
//!
//! A caller-owned [`ClaimedPaths`] set guarantees each path is handed to at
//! most one format during a sweep.
//!
//! ```no_run
//! use resource_selector::{ClaimedPaths, ParseContext, ResourceSelector};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let base = Path::new("/repo");
//! let selector = ResourceSelector::new(vec!["**/secrets.yaml".into()], 1)?;
//!
//! let mut claimed = ClaimedPaths::new();
//! let mut ctx = ParseContext::default();
//! let documents = selector.select_and_parse(base, base, &mut claimed, &mut ctx)?;
//! println!("{} documents", documents.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod formats;
pub mod selector;
pub mod shared;

pub use cli::{Cli, Output};
pub use config::{ConfigOverrides, SelectorConfig};
pub use formats::{
    Document, DocumentBody, FormatKind, FormatRegistry, ParseContext, ParseIssue, ResourceFormat,
};
pub use selector::{ClaimedPaths, ResourceSelector, SelectError};

/// Result type alias for resource-selector operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
