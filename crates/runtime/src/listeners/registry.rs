//! Ordered collection of plan listeners.

use goap_core::{Goal, Plan, PlanError};

use super::PlanListener;

/// Dispatches lifecycle callbacks to every registered listener.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Vec<Box<dyn PlanListener>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with a single [`super::TracingListener`].
    pub fn with_tracing() -> Self {
        let mut registry = Self::new();
        registry.register(super::TracingListener);
        registry
    }

    pub fn register(&mut self, listener: impl PlanListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Listener names in dispatch order (for debugging).
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.listeners.iter().map(|listener| listener.name())
    }

    pub fn goal_changed(&mut self, agent: &str, goal: &Goal) {
        for listener in &mut self.listeners {
            listener.on_goal_changed(agent, goal);
        }
    }

    pub fn plan_found(&mut self, agent: &str, goal: &Goal, plan: &Plan, steps: &[&str]) {
        for listener in &mut self.listeners {
            listener.on_plan_found(agent, goal, plan, steps);
        }
    }

    pub fn plan_failed(&mut self, agent: &str, goal: &Goal, error: &PlanError) {
        for listener in &mut self.listeners {
            listener.on_plan_failed(agent, goal, error);
        }
    }

    pub fn actions_finished(&mut self, agent: &str) {
        for listener in &mut self.listeners {
            listener.on_actions_finished(agent);
        }
    }

    pub fn plan_aborted(&mut self, agent: &str, action: &str) {
        for listener in &mut self.listeners {
            listener.on_plan_aborted(agent, action);
        }
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
