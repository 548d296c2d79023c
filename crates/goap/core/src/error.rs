//! Error types surfaced by the planning core.
//!
//! Planning failures are ordinary, recoverable outcomes: the caller keeps the
//! agent idle and plans again next cycle. Catalogue errors are construction
//! mistakes and should be fixed in content rather than retried.

use thiserror::Error;

use crate::fact::FactSet;

/// Outcome of a planning call that produced no plan.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PlanError {
    /// No chain of usable actions reaches the goal from the current facts.
    #[error("no action sequence reaches goal {{{goal}}}")]
    NoPlan { goal: FactSet },

    /// The search generated more nodes than the configured cap.
    #[error("plan search exceeded the limit of {limit} nodes")]
    SearchLimitExceeded { limit: usize },
}

impl PlanError {
    /// Both variants clear up once facts change, so retrying next cycle is
    /// always the right response.
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::NoPlan { .. } | Self::SearchLimitExceeded { .. } => true,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoPlan { .. } => "no_plan",
            Self::SearchLimitExceeded { .. } => "search_limit_exceeded",
        }
    }
}

/// Invalid action or goal catalogue construction.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogueError {
    #[error("action `{name}` is already in the catalogue")]
    DuplicateAction { name: String },

    #[error("action `{name}` is not in the catalogue")]
    UnknownAction { name: String },

    #[error("goal catalogue must contain at least one goal")]
    EmptyGoalCatalogue,

    #[error("goal `{fact}` appears more than once in the goal catalogue")]
    DuplicateGoal { fact: String },
}
