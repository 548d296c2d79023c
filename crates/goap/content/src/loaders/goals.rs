//! Goal catalogue loader.

use std::path::Path;

use goap_core::{GoalCatalogue, GoalSpec};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Goal catalogue structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalCatalogueFile {
    pub goals: Vec<GoalSpec>,
}

/// Loader for goal catalogues from RON files.
pub struct GoalCatalogueLoader;

impl GoalCatalogueLoader {
    /// Load a goal catalogue from a RON file.
    ///
    /// Fails if the file lists no goals or the same goal fact twice.
    pub fn load(path: &Path) -> LoadResult<GoalCatalogue> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a goal catalogue from RON text.
    pub fn parse(content: &str) -> LoadResult<GoalCatalogue> {
        let file: GoalCatalogueFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse goal catalogue RON: {}", e))?;

        Ok(GoalCatalogue::new(file.goals)?)
    }
}
