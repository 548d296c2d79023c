//! Lifecycle callbacks for observing an agent's planning and execution.
//!
//! Listeners are informational: nothing they return feeds back into the
//! agent. They are dispatched in registration order by a [`ListenerRegistry`].
//!
//! # Callbacks
//!
//! - `on_goal_changed` when goal selection picks a different goal
//! - `on_plan_found` / `on_plan_failed` after every planning attempt
//! - `on_actions_finished` once the last action of a plan completes
//! - `on_plan_aborted` when an action fails or loses its target

mod logging;
mod registry;

pub use logging::TracingListener;
pub use registry::ListenerRegistry;

use goap_core::{Goal, Plan, PlanError};

/// Observer of one agent's planning lifecycle.
///
/// Every method has a no-op default so implementors only override what they
/// care about.
pub trait PlanListener: Send {
    /// Name used in diagnostics.
    fn name(&self) -> &'static str;

    fn on_goal_changed(&mut self, _agent: &str, _goal: &Goal) {}

    /// `steps` holds the action names in execution order.
    fn on_plan_found(&mut self, _agent: &str, _goal: &Goal, _plan: &Plan, _steps: &[&str]) {}

    fn on_plan_failed(&mut self, _agent: &str, _goal: &Goal, _error: &PlanError) {}

    fn on_actions_finished(&mut self, _agent: &str) {}

    /// `action` is the action that could not continue.
    fn on_plan_aborted(&mut self, _agent: &str, _action: &str) {}
}
