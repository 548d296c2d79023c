//! Goal-oriented action planning core.
//!
//! The crate is pure: it owns the data model (facts, actions, goals) and the
//! algorithms over it (insistence scoring and forward planning) and performs
//! no I/O. Hosts drive it from their own update loop; see the `runtime` crate
//! for the agent state machine that executes plans.
pub mod action;
pub mod config;
pub mod error;
pub mod fact;
pub mod goal;
pub mod planner;

pub use action::{
    Action, ActionCatalogue, ActionSpec, ActionState, BasicAction, BoxedAction, TargetId,
};
pub use config::{ChaseConfig, MovementConfig, PlannerConfig};
pub use error::{CatalogueError, PlanError};
pub use fact::{Fact, FactSet, FactStore};
pub use goal::{
    Goal, GoalCatalogue, GoalSelection, GoalSelector, GoalSpec, InsistenceRule, select_goal,
};
pub use planner::{Candidate, Plan, Planner, SearchStats};
