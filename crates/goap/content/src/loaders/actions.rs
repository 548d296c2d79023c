//! Action catalogue loader.

use std::collections::BTreeSet;
use std::path::Path;

use goap_core::ActionSpec;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Action catalogue structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionCatalogueFile {
    pub actions: Vec<ActionSpec>,
}

/// Loader for action catalogues from RON files.
pub struct ActionCatalogueLoader;

impl ActionCatalogueLoader {
    /// Load action specs from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing an ActionCatalogueFile
    ///
    /// # Returns
    ///
    /// Returns the specs in file order, which is the order the planner
    /// considers them in.
    pub fn load(path: &Path) -> LoadResult<Vec<ActionSpec>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse action specs from RON text.
    pub fn parse(content: &str) -> LoadResult<Vec<ActionSpec>> {
        let file: ActionCatalogueFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse action catalogue RON: {}", e))?;

        let mut seen = BTreeSet::new();
        for spec in &file.actions {
            if !seen.insert(spec.name.as_str()) {
                anyhow::bail!("Duplicate action `{}` in action catalogue", spec.name);
            }
        }

        Ok(file.actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults_for_omitted_fields() {
        let specs = ActionCatalogueLoader::parse(
            r#"(
                actions: [
                    (
                        name: "GetItem",
                        preconditions: {"hasItem": false},
                        effects: {"hasItem": true},
                        requires_proximity: true,
                    ),
                    (
                        name: "UseItem",
                        effects: {"hasUsedItem": true},
                        cost: -1.0,
                        enabled: false,
                        unlock_knowledge: Some(100),
                    ),
                ],
            )"#,
        )
        .unwrap();

        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].cost, ActionSpec::DEFAULT_COST);
        assert!(specs[0].enabled);
        assert!(specs[0].requires_proximity);
        assert_eq!(specs[0].preconditions.get("hasItem"), Some(false));
        assert_eq!(specs[1].cost, -1.0);
        assert!(!specs[1].enabled);
        assert_eq!(specs[1].unlock_knowledge, Some(100));
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = ActionCatalogueLoader::parse(
            r#"(actions: [(name: "PatrolToPoint"), (name: "PatrolToPoint")])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("PatrolToPoint"));
    }
}
