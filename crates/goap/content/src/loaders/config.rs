//! Agent configuration loader.

use std::env;
use std::path::Path;
use std::str::FromStr;

use goap_core::{ChaseConfig, MovementConfig, PlannerConfig};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Tunables for one agent type.
///
/// Every section may be omitted from the TOML file and falls back to its
/// defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub planner: PlannerConfig,
    pub movement: MovementConfig,
    pub chase: ChaseConfig,
}

impl AgentConfig {
    /// Default configuration with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply process environment variables on top of this configuration.
    ///
    /// Environment variables:
    /// - `GOAP_MAX_NODES` - Planner node cap
    /// - `GOAP_MAX_DEPTH` - Planner depth cap
    /// - `GOAP_MOVEMENT_RATE` - Movement cost accrued per second
    /// - `GOAP_CHASE_DURATION` - Seconds before a chase is given up
    /// - `GOAP_CHASE_COOLDOWN` - Seconds between chases
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides read through `lookup`. Unset or unparsable values leave
    /// the current setting alone.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(max_nodes) = read_var::<usize>(&lookup, "GOAP_MAX_NODES") {
            self.planner.max_nodes = Some(max_nodes);
        }
        if let Some(max_depth) = read_var::<usize>(&lookup, "GOAP_MAX_DEPTH") {
            self.planner.max_depth = Some(max_depth);
        }
        if let Some(rate) = read_var::<f32>(&lookup, "GOAP_MOVEMENT_RATE") {
            self.movement.rate = rate;
        }
        if let Some(duration) = read_var::<f32>(&lookup, "GOAP_CHASE_DURATION") {
            self.chase.duration = duration;
        }
        if let Some(cooldown) = read_var::<f32>(&lookup, "GOAP_CHASE_COOLDOWN") {
            self.chase.cooldown = cooldown;
        }
        self
    }
}

fn read_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key)?.trim().parse().ok()
}

/// Loader for agent configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing AgentConfig
    pub fn load(path: &Path) -> LoadResult<AgentConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<AgentConfig> {
        let config: AgentConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_sections_use_defaults() {
        let config = ConfigLoader::parse("[planner]\nmax_nodes = 128\n").unwrap();

        assert_eq!(config.planner.max_nodes, Some(128));
        assert_eq!(config.planner.max_depth, None);
        assert_eq!(config.movement, MovementConfig::default());
        assert_eq!(config.chase, ChaseConfig::default());
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chase]\nduration = 2.5\nfact = \"spotted\"").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.chase.duration, 2.5);
        assert_eq!(config.chase.cooldown, ChaseConfig::DEFAULT_COOLDOWN);
        assert_eq!(config.chase.fact, "spotted");
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigLoader::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn overrides_replace_only_valid_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("GOAP_MAX_NODES", "512"),
            ("GOAP_MAX_DEPTH", "not a number"),
            ("GOAP_CHASE_COOLDOWN", " 1.5 "),
        ]);

        let config = AgentConfig::default()
            .with_overrides(|key| vars.get(key).map(|value| value.to_string()));

        assert_eq!(config.planner.max_nodes, Some(512));
        assert_eq!(config.planner.max_depth, None);
        assert_eq!(config.chase.cooldown, 1.5);
        assert_eq!(config.chase.duration, ChaseConfig::DEFAULT_DURATION);
    }
}
