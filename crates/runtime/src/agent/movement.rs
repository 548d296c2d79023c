//! Movement-cost watchdog.
//!
//! While an agent walks toward an action's target, the elapsed movement cost
//! is compared with the cost the planner assumed. Far over budget the action
//! is abandoned; slightly over budget and close to the target, the elapsed
//! cost is relaxed a limited number of times.

use goap_core::{ActionState, MovementConfig};

/// What the watchdog decided for one movement step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BudgetVerdict {
    Within,
    /// Elapsed cost was reduced because the target is close.
    Relaxed,
    /// The action was flagged `cost_too_high` and must not be performed.
    Exceeded,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MovementBudget {
    config: MovementConfig,
}

impl MovementBudget {
    pub fn new(config: MovementConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Charges one movement step of `dt` seconds against `state`.
    ///
    /// `remaining` is the distance still to travel. While `exempt` (an active
    /// chase), or when the planned cost is not positive, the budget is never
    /// enforced.
    pub fn charge(
        &self,
        state: &mut ActionState,
        dt: f32,
        remaining: f32,
        exempt: bool,
    ) -> BudgetVerdict {
        state.movement_cost += dt * self.config.rate;

        let planned = state.cost;
        // A non-positive plan cost carries no travel estimate to hold against.
        if exempt || planned <= 0.0 || state.movement_cost <= planned {
            return BudgetVerdict::Within;
        }

        if state.movement_cost > planned * self.config.abort_factor {
            state.abort_movement();
            return BudgetVerdict::Exceeded;
        }

        if state.budget_resets < self.config.max_resets {
            let closeness = remaining / state.movement_cost;
            if closeness < planned / self.config.near_divisor {
                state.budget_resets += 1;
                state.movement_cost -= closeness;
                return BudgetVerdict::Relaxed;
            }
        }
        BudgetVerdict::Within
    }
}
