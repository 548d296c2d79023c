//! Content loaders for reading agent data from files.
//!
//! Every loader has a `load(path)` entry point for files on disk and a
//! `parse(text)` entry point for embedded data.

pub mod actions;
pub mod config;
pub mod facts;
pub mod goals;

pub use actions::ActionCatalogueLoader;
pub use config::{AgentConfig, ConfigLoader};
pub use facts::FactsLoader;
pub use goals::GoalCatalogueLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
