//! Data-driven agent content and loaders.
//!
//! This crate houses the static content agents are built from and provides
//! loaders for RON/TOML data files:
//! - Action catalogues (data-driven via RON)
//! - Goal catalogues with insistence rules (data-driven via RON)
//! - Initial knowledge bases (data-driven via RON)
//! - Agent configuration: planner limits, movement budget, chase timing (TOML)
//!
//! All loaders use goap-core types directly with serde for RON/TOML
//! deserialization. [`presets`] embeds the stock enemy agent.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub mod presets;

#[cfg(feature = "loaders")]
pub use loaders::{
    ActionCatalogueLoader, AgentConfig, ConfigLoader, FactsLoader, GoalCatalogueLoader,
    LoadResult,
};

#[cfg(feature = "loaders")]
pub use presets::AgentPreset;
