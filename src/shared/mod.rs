//! Helpers shared by the selector, the formats and the CLI

pub mod glob;
pub mod paths;
