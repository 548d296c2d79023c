//! Seam between an agent and the world it lives in.

use goap_core::{ActionSpec, TargetId};

/// Result of one movement step toward a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveOutcome {
    /// The agent is close enough to perform the action.
    Arrived,
    /// Still travelling; `remaining` is the distance left.
    Moving { remaining: f32 },
    /// The target can no longer be reached.
    Unreachable,
}

/// World-side services an agent needs while planning and executing.
///
/// The host is the context type `C` threaded through [`goap_core::Action`]
/// calls, so actions can query and change the world through it.
pub trait AgentHost {
    /// Picks the target for an action that must be approached. Returning
    /// `None` makes the action infeasible for this planning cycle.
    fn find_target(&mut self, action: &ActionSpec) -> Option<TargetId>;

    /// Cost of the action for this planning cycle once `target` is chosen,
    /// typically the travel time to it. `None` keeps the base cost.
    fn estimate_cost(&mut self, _action: &ActionSpec, _target: TargetId) -> Option<f32> {
        None
    }

    /// Advances the agent toward `target` by one update of `dt` seconds.
    fn move_agent(&mut self, target: TargetId, dt: f32) -> MoveOutcome;

    /// Whether approaching `target` counts as chasing the player.
    fn is_chase_target(&self, _target: TargetId) -> bool {
        false
    }

    /// Applies an action's real-world effect. Returning `false` aborts the plan.
    fn perform(&mut self, _action: &ActionSpec, _target: Option<TargetId>) -> bool {
        true
    }
}
