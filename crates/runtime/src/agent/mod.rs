//! The agent shell around the planning core.
//!
//! An [`Agent`] owns everything one character needs to decide and act: its
//! facts, action and goal catalogues, the planner and its chase memory. Each
//! [`Agent::update`] runs one step of a three-phase state machine:
//!
//! - **Idle**: select the most insistent goal and plan for it.
//! - **Perform**: pop finished actions (writing their completion into the facts),
//!   then perform the next one or hand over to movement.
//! - **MoveTo**: walk toward the current action's target under the movement
//!   budget.
//!
//! A failed perform, a proximity action without a target, or a change of the
//! most insistent goal abandons the plan and returns the agent to Idle, where
//! it plans again on the next update.

mod action;
mod host;
mod memory;
mod movement;

pub use action::HostedAction;
pub use host::{AgentHost, MoveOutcome};
pub use memory::{AgentMemory, ChaseTick};
pub use movement::{BudgetVerdict, MovementBudget};

use std::collections::VecDeque;

use goap_core::{
    ActionCatalogue, ActionSpec, CatalogueError, ChaseConfig, FactStore, Goal, GoalCatalogue,
    GoalSelection, GoalSelector, MovementConfig, Plan, PlanError, Planner, PlannerConfig,
};
use tracing::{debug, info, warn};

use crate::listeners::{ListenerRegistry, PlanListener};

/// State machine phase of an agent.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AgentPhase {
    #[default]
    Idle,
    MoveTo,
    Perform,
}

#[derive(Clone, Debug)]
struct ActivePlan {
    goal: Goal,
    queue: VecDeque<usize>,
}

/// Read-only summary of an agent for diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentStatus {
    pub name: String,
    pub phase: AgentPhase,
    pub goal: Option<Goal>,
    /// Actions still to run, current one first.
    pub remaining: Vec<String>,
    pub facts: FactStore,
}

/// A planning agent driven by host context `C`.
pub struct Agent<C> {
    name: String,
    facts: FactStore,
    actions: ActionCatalogue<C>,
    goals: GoalCatalogue,
    selector: GoalSelector,
    planner: Planner,
    budget: MovementBudget,
    memory: AgentMemory,
    listeners: ListenerRegistry,
    phase: AgentPhase,
    active: Option<ActivePlan>,
}

impl<C> Agent<C> {
    pub fn new(
        name: impl Into<String>,
        facts: FactStore,
        actions: ActionCatalogue<C>,
        goals: GoalCatalogue,
    ) -> Self {
        Self {
            name: name.into(),
            facts,
            actions,
            goals,
            selector: GoalSelector::new(),
            planner: Planner::default(),
            budget: MovementBudget::default(),
            memory: AgentMemory::default(),
            listeners: ListenerRegistry::new(),
            phase: AgentPhase::Idle,
            active: None,
        }
    }

    #[must_use]
    pub fn with_planner(mut self, config: PlannerConfig) -> Self {
        self.planner = Planner::new(config);
        self
    }

    #[must_use]
    pub fn with_movement(mut self, config: MovementConfig) -> Self {
        self.budget = MovementBudget::new(config);
        self
    }

    #[must_use]
    pub fn with_chase(mut self, config: ChaseConfig) -> Self {
        self.memory = AgentMemory::new(config);
        self
    }

    #[must_use]
    pub fn with_listener(mut self, listener: impl PlanListener + 'static) -> Self {
        self.listeners.register(listener);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> AgentPhase {
        self.phase
    }

    /// The live facts.
    pub fn world_state(&self) -> &FactStore {
        &self.facts
    }

    /// Mutable access to the live facts. Changes take effect on the next update.
    pub fn world_state_mut(&mut self) -> &mut FactStore {
        &mut self.facts
    }

    pub fn actions(&self) -> &ActionCatalogue<C> {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut ActionCatalogue<C> {
        &mut self.actions
    }

    pub fn goals(&self) -> &GoalCatalogue {
        &self.goals
    }

    pub fn memory(&self) -> &AgentMemory {
        &self.memory
    }

    pub fn listeners_mut(&mut self) -> &mut ListenerRegistry {
        &mut self.listeners
    }

    /// Goal of the plan being executed.
    pub fn current_goal(&self) -> Option<&Goal> {
        self.active.as_ref().map(|active| &active.goal)
    }

    /// Names of the actions still to run, current one first.
    pub fn remaining_steps(&self) -> Vec<&str> {
        self.active
            .iter()
            .flat_map(|active| active.queue.iter())
            .filter_map(|&index| self.actions.get(index))
            .map(|action| action.name())
            .collect()
    }

    pub fn status(&self) -> AgentStatus {
        AgentStatus {
            name: self.name.clone(),
            phase: self.phase,
            goal: self.current_goal().cloned(),
            remaining: self
                .remaining_steps()
                .into_iter()
                .map(str::to_owned)
                .collect(),
            facts: self.facts.clone(),
        }
    }

    /// Scores the goal catalogue and returns the most insistent goal.
    pub fn create_goal_state(&mut self) -> GoalSelection {
        let selection = self.selector.select(&self.goals, &mut self.facts);
        if selection.changed {
            self.listeners.goal_changed(&self.name, &selection.goal);
        }
        debug!(
            agent = %self.name,
            goal = %selection.goal,
            "selected goal from {} candidates",
            selection.scores.len()
        );
        selection
    }

    /// Selects a goal and plans for it without starting execution.
    pub fn plan(&mut self, ctx: &mut C) -> Result<Plan, PlanError> {
        let goal = self.create_goal_state().goal;
        self.planner
            .plan(&mut self.actions, &self.facts, &goal.state(), ctx)
    }

    /// Adds knowledge to an action, enabling it once its threshold is reached.
    pub fn learn(&mut self, action: &str, amount: u32) -> Result<bool, CatalogueError> {
        let unlocked = self.actions.add_knowledge(action, amount)?;
        if unlocked {
            info!(agent = %self.name, action, "learned new behaviour");
        }
        Ok(unlocked)
    }

    /// Reports a player sighting.
    ///
    /// Starts a chase when the chase memory allows it: the chase fact is raised
    /// and the current action is interrupted so the agent replans. Returns
    /// whether a chase started.
    pub fn sight_player(&mut self) -> bool {
        if !self.memory.start_chase() {
            return false;
        }
        let fact = self.memory.chase_fact().to_owned();
        self.facts.set(fact, true);
        self.interrupt();
        info!(agent = %self.name, "player sighted, chase started");
        true
    }

    /// Abandons the current plan, if any.
    pub fn abort(&mut self) {
        if self.active.is_none() {
            return;
        }
        let action = self.current_action_name();
        self.abort_plan(&action);
    }

    fn front(&self) -> Option<usize> {
        self.active.as_ref()?.queue.front().copied()
    }

    fn current_action_name(&self) -> String {
        self.front()
            .and_then(|index| self.actions.get(index))
            .map(|action| action.name().to_owned())
            .unwrap_or_default()
    }

    /// Flags the current action so its next perform fails.
    fn interrupt(&mut self) {
        if let Some(index) = self.front()
            && let Some(action) = self.actions.get_mut(index)
        {
            action.state_mut().abort_movement();
        }
        if self.phase == AgentPhase::MoveTo {
            self.phase = AgentPhase::Perform;
        }
    }

    fn abort_plan(&mut self, action: &str) {
        self.active = None;
        self.phase = AgentPhase::Idle;
        self.listeners.plan_aborted(&self.name, action);
    }

    fn finish(&mut self) {
        self.phase = AgentPhase::Idle;
        if self.active.take().is_some() {
            self.listeners.actions_finished(&self.name);
        }
    }

    /// Pops the completed front action and writes its completion into the facts.
    fn complete_front(&mut self) {
        let Some(index) = self
            .active
            .as_mut()
            .and_then(|active| active.queue.pop_front())
        else {
            return;
        };
        let Some(action) = self.actions.get(index) else {
            return;
        };

        let spec = action.spec();
        spec.complete_into(&mut self.facts);
        if spec.completion_value(self.memory.chase_fact()) == Some(false)
            && self.memory.is_chasing()
        {
            self.memory.end_chase();
        }
        debug!(agent = %self.name, action = action.name(), "action completed");
    }

    /// Abandons the plan when a different goal has become most insistent.
    fn goal_changed(&mut self) -> bool {
        let Some(active) = &self.active else {
            return false;
        };
        let goal = self.goals.select(&mut self.facts);
        if goal.same_target(&active.goal) {
            return false;
        }
        debug!(
            agent = %self.name,
            from = %active.goal,
            to = %goal,
            "more insistent goal, abandoning plan"
        );
        self.abort();
        true
    }
}

impl<C: AgentHost> Agent<C> {
    /// Builds an agent whose actions are all [`HostedAction`]s.
    pub fn from_specs(
        name: impl Into<String>,
        facts: FactStore,
        specs: impl IntoIterator<Item = ActionSpec>,
        goals: GoalCatalogue,
    ) -> Result<Self, CatalogueError> {
        let mut actions = ActionCatalogue::new();
        for spec in specs {
            actions.add(HostedAction::boxed(spec))?;
        }
        Ok(Self::new(name, facts, actions, goals))
    }

    /// Runs one state machine step of `dt` seconds and returns the new phase.
    pub fn update(&mut self, ctx: &mut C, dt: f32) -> AgentPhase {
        self.advance_memory(ctx, dt);

        if self.phase != AgentPhase::Idle && self.goal_changed() {
            return self.phase;
        }

        match self.phase {
            AgentPhase::Idle => self.idle(ctx),
            AgentPhase::Perform => self.perform(ctx),
            AgentPhase::MoveTo => self.move_to(ctx, dt),
        }
        self.phase
    }

    fn advance_memory(&mut self, ctx: &C, dt: f32) {
        let pursuing = self.phase == AgentPhase::MoveTo
            && self
                .front()
                .and_then(|index| self.actions.get(index))
                .and_then(|action| action.target())
                .is_some_and(|target| ctx.is_chase_target(target));

        if self.memory.advance(dt, pursuing) == ChaseTick::Expired {
            let fact = self.memory.chase_fact().to_owned();
            self.facts.set(fact, false);
            self.interrupt();
            info!(agent = %self.name, "chase expired");
        }
    }

    fn idle(&mut self, ctx: &mut C) {
        let goal = self.create_goal_state().goal;
        match self
            .planner
            .plan(&mut self.actions, &self.facts, &goal.state(), ctx)
        {
            Ok(plan) => {
                let steps = plan.names(&self.actions);
                self.listeners.plan_found(&self.name, &goal, &plan, &steps);
                self.active = Some(ActivePlan {
                    goal,
                    queue: plan.steps.into_iter().collect(),
                });
                self.phase = AgentPhase::Perform;
            }
            Err(error) => {
                self.listeners.plan_failed(&self.name, &goal, &error);
            }
        }
    }

    fn perform(&mut self, ctx: &mut C) {
        let Some(mut index) = self.front() else {
            return self.finish();
        };

        if self
            .actions
            .get(index)
            .is_some_and(|action| action.is_done())
        {
            self.complete_front();
            match self.front() {
                Some(next) => index = next,
                None => return self.finish(),
            }
        }

        let Some(action) = self.actions.get_mut(index) else {
            warn!(agent = %self.name, index, "planned action left the catalogue");
            return self.abort_plan("");
        };

        if action.requires_proximity() && !action.is_in_range() {
            self.phase = AgentPhase::MoveTo;
            return;
        }

        if !action.perform(ctx) {
            let name = action.name().to_owned();
            self.abort_plan(&name);
        }
    }

    fn move_to(&mut self, ctx: &mut C, dt: f32) {
        let Some(index) = self.front() else {
            self.phase = AgentPhase::Perform;
            return;
        };
        let Some(action) = self.actions.get_mut(index) else {
            self.phase = AgentPhase::Perform;
            return;
        };

        let Some(target) = action.target() else {
            let name = action.name().to_owned();
            warn!(agent = %self.name, action = %name, "action requires a target but has none");
            return self.abort_plan(&name);
        };

        match ctx.move_agent(target, dt) {
            MoveOutcome::Arrived => {
                action.state_mut().in_range = true;
                self.phase = AgentPhase::Perform;
            }
            MoveOutcome::Moving { remaining } => {
                let verdict = self.budget.charge(
                    action.state_mut(),
                    dt,
                    remaining,
                    self.memory.is_chasing(),
                );
                match verdict {
                    BudgetVerdict::Exceeded => {
                        debug!(agent = %self.name, action = action.name(), "movement cost too high");
                        self.phase = AgentPhase::Perform;
                    }
                    BudgetVerdict::Relaxed => {
                        debug!(agent = %self.name, action = action.name(), "target close, budget relaxed");
                    }
                    BudgetVerdict::Within => {}
                }
            }
            MoveOutcome::Unreachable => {
                action.state_mut().abort_movement();
                self.phase = AgentPhase::Perform;
            }
        }
    }
}

impl<C> std::fmt::Debug for Agent<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("phase", &self.phase)
            .field("facts", &self.facts)
            .field("actions", &self.actions)
            .field("goal", &self.current_goal())
            .finish()
    }
}
