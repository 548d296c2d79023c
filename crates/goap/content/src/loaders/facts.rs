//! Initial knowledge base loader.

use std::path::Path;

use goap_core::FactStore;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Knowledge base structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactsFile {
    pub facts: FactStore,
}

/// Loader for an agent's starting facts from RON files.
pub struct FactsLoader;

impl FactsLoader {
    pub fn load(path: &Path) -> LoadResult<FactStore> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<FactStore> {
        let file: FactsFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse facts RON: {}", e))?;
        Ok(file.facts)
    }
}
