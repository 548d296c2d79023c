//! Agent content embedded in the crate.
//!
//! Presets are parsed from the same RON/TOML files the loaders read, compiled
//! into the binary so hosts and tests need no data directory.

use goap_core::{ActionSpec, FactStore, GoalCatalogue};

use crate::loaders::{
    ActionCatalogueLoader, AgentConfig, ConfigLoader, FactsLoader, GoalCatalogueLoader,
    LoadResult,
};

const ENEMY_ACTIONS: &str = include_str!("../data/enemy/actions.ron");
const ENEMY_GOALS: &str = include_str!("../data/enemy/goals.ron");
const ENEMY_FACTS: &str = include_str!("../data/enemy/facts.ron");
const ENEMY_CONFIG: &str = include_str!("../data/enemy/config.toml");

/// Everything needed to build one agent type.
#[derive(Clone, Debug)]
pub struct AgentPreset {
    pub facts: FactStore,
    pub actions: Vec<ActionSpec>,
    pub goals: GoalCatalogue,
    pub config: AgentConfig,
}

impl AgentPreset {
    /// Load a preset from a directory holding `actions.ron`, `goals.ron`,
    /// `facts.ron` and `config.toml`.
    ///
    /// A missing `config.toml` falls back to [`AgentConfig::default`].
    pub fn load_dir(dir: &std::path::Path) -> LoadResult<Self> {
        let config_path = dir.join("config.toml");
        let config = if config_path.exists() {
            ConfigLoader::load(&config_path)?
        } else {
            AgentConfig::default()
        };

        Ok(Self {
            facts: FactsLoader::load(&dir.join("facts.ron"))?,
            actions: ActionCatalogueLoader::load(&dir.join("actions.ron"))?,
            goals: GoalCatalogueLoader::load(&dir.join("goals.ron"))?,
            config,
        })
    }
}

/// The stock enemy: patrols by default, chases and attacks a sighted player,
/// and picks up items it notices.
pub fn enemy() -> LoadResult<AgentPreset> {
    Ok(AgentPreset {
        facts: FactsLoader::parse(ENEMY_FACTS)?,
        actions: ActionCatalogueLoader::parse(ENEMY_ACTIONS)?,
        goals: GoalCatalogueLoader::parse(ENEMY_GOALS)?,
        config: ConfigLoader::parse(ENEMY_CONFIG)?,
    })
}
