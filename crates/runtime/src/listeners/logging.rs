use goap_core::{Goal, Plan, PlanError};
use tracing::{debug, info, warn};

use super::PlanListener;

/// Logs every lifecycle callback through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingListener;

impl PlanListener for TracingListener {
    fn name(&self) -> &'static str {
        "tracing"
    }

    fn on_goal_changed(&mut self, agent: &str, goal: &Goal) {
        debug!(agent, goal = %goal, "goal changed");
    }

    fn on_plan_found(&mut self, agent: &str, goal: &Goal, plan: &Plan, steps: &[&str]) {
        info!(
            agent,
            goal = %goal,
            cost = plan.cost,
            nodes = plan.stats.nodes,
            "plan found: {}",
            plan_line(steps)
        );
    }

    fn on_plan_failed(&mut self, agent: &str, goal: &Goal, error: &PlanError) {
        warn!(agent, goal = %goal, reason = error.as_str(), "plan failed: {error}");
    }

    fn on_actions_finished(&mut self, agent: &str) {
        info!(agent, "actions completed");
    }

    fn on_plan_aborted(&mut self, agent: &str, action: &str) {
        warn!(agent, action, "plan aborted");
    }
}

/// Renders steps as `A-> B-> GOAL`.
fn plan_line(steps: &[&str]) -> String {
    let mut line: String = steps.iter().map(|step| format!("{step}-> ")).collect();
    line.push_str("GOAL");
    line
}
