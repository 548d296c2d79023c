//! Forward state-space planner.
//!
//! Given the agent's actions, its current facts and a goal state, the planner
//! searches every ordering of usable actions whose preconditions hold along
//! the way and returns the cheapest sequence whose accumulated effects satisfy
//! the goal.
//!
//! # Search
//!
//! 1. Every enabled action is reset and asked for its procedural feasibility;
//!    the feasible ones form this cycle's usable set.
//! 2. The root node holds a snapshot of the live facts at zero cost.
//! 3. A node is expanded with every unused action whose preconditions hold in
//!    the node's simulated state. The child state is the parent state with the
//!    action's effects applied. A child that satisfies the goal is recorded as
//!    a leaf and not expanded further.
//! 4. An action appears at most once per branch, so the depth is bounded by
//!    the number of usable actions and the search always terminates.
//! 5. The cheapest leaf wins. Equal costs prefer the shallower plan, then the
//!    leaf discovered first (which follows catalogue order).
//!
//! Nodes live in a per-call arena and are dropped when the call returns; no
//! search state survives between cycles.

use crate::action::{Action, ActionCatalogue};
use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::fact::{FactSet, FactStore};

/// Planner-facing view of one usable action.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<'a> {
    /// Index of the action in its catalogue.
    pub index: usize,
    pub name: &'a str,
    pub preconditions: &'a FactSet,
    pub effects: &'a FactSet,
    pub cost: f32,
}

impl<'a> Candidate<'a> {
    pub fn from_action<C>(index: usize, action: &'a dyn Action<C>) -> Self {
        Self {
            index,
            name: action.name(),
            preconditions: action.preconditions(),
            effects: action.effects(),
            cost: action.cost(),
        }
    }
}

/// Counters describing one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Actions that passed the enabled and feasibility filters.
    pub usable_actions: usize,
    /// Nodes generated, excluding the root.
    pub nodes: usize,
    /// Nodes that satisfied the goal.
    pub leaves: usize,
}

/// An ordered action sequence that reaches a goal.
#[derive(Clone, Debug, PartialEq)]
pub struct Plan {
    /// Catalogue indices in execution order.
    pub steps: Vec<usize>,
    /// Sum of the step costs.
    pub cost: f32,
    pub goal: FactSet,
    pub stats: SearchStats,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Resolves step names against the catalogue the plan was made from.
    pub fn names<'c, C>(&self, catalogue: &'c ActionCatalogue<C>) -> Vec<&'c str> {
        self.steps
            .iter()
            .filter_map(|&index| catalogue.get(index))
            .map(|action| action.name())
            .collect()
    }

    /// Renders the plan as `A-> B-> GOAL`.
    pub fn describe<C>(&self, catalogue: &ActionCatalogue<C>) -> String {
        let mut out = String::new();
        for name in self.names(catalogue) {
            out.push_str(name);
            out.push_str("-> ");
        }
        out.push_str("GOAL");
        out
    }
}

#[derive(Debug)]
struct PlanNode {
    parent: Option<usize>,
    cost: f32,
    state: FactStore,
    /// Slot in the candidate list of the action that produced this node.
    step: Option<usize>,
    depth: usize,
}

/// Cost-ordered forward planner.
#[derive(Clone, Debug, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plans from `facts` to `goal` with the catalogue's usable actions.
    ///
    /// Resets every enabled action and runs its feasibility check against
    /// `ctx` before searching. `facts` is only read.
    pub fn plan<C>(
        &self,
        catalogue: &mut ActionCatalogue<C>,
        facts: &FactStore,
        goal: &FactSet,
        ctx: &mut C,
    ) -> Result<Plan, PlanError> {
        let usable = Self::prepare(catalogue, ctx);
        let candidates: Vec<Candidate<'_>> = usable
            .iter()
            .filter_map(|&index| {
                catalogue
                    .get(index)
                    .map(|action| Candidate::from_action(index, action))
            })
            .collect();
        self.search(&candidates, facts, goal)
    }

    /// Resets every enabled action and returns the indices of the feasible
    /// ones in catalogue order.
    pub fn prepare<C>(catalogue: &mut ActionCatalogue<C>, ctx: &mut C) -> Vec<usize> {
        let mut usable = Vec::new();
        for (index, action) in catalogue.entries_mut() {
            if !action.is_enabled() {
                continue;
            }
            action.reset();
            if action.check_feasible(ctx) {
                usable.push(index);
            }
        }
        usable
    }

    /// Searches for the cheapest plan over an already filtered usable set.
    pub fn search(
        &self,
        candidates: &[Candidate<'_>],
        facts: &FactStore,
        goal: &FactSet,
    ) -> Result<Plan, PlanError> {
        let mut search = Search {
            candidates,
            goal,
            config: self.config,
            arena: vec![PlanNode {
                parent: None,
                cost: 0.0,
                state: facts.snapshot(),
                step: None,
                depth: 0,
            }],
            leaves: Vec::new(),
            used: vec![false; candidates.len()],
        };
        search.expand(0)?;

        let Search { arena, leaves, .. } = search;
        let cheapest = leaves.iter().copied().min_by(|&a, &b| {
            arena[a]
                .cost
                .total_cmp(&arena[b].cost)
                .then(arena[a].depth.cmp(&arena[b].depth))
        });
        let Some(cheapest) = cheapest else {
            return Err(PlanError::NoPlan { goal: goal.clone() });
        };

        let mut steps = Vec::with_capacity(arena[cheapest].depth);
        let mut cursor = Some(cheapest);
        while let Some(node) = cursor {
            if let Some(slot) = arena[node].step {
                steps.push(candidates[slot].index);
            }
            cursor = arena[node].parent;
        }
        steps.reverse();

        Ok(Plan {
            steps,
            cost: arena[cheapest].cost,
            goal: goal.clone(),
            stats: SearchStats {
                usable_actions: candidates.len(),
                nodes: arena.len() - 1,
                leaves: leaves.len(),
            },
        })
    }
}

struct Search<'s, 'a> {
    candidates: &'s [Candidate<'a>],
    goal: &'s FactSet,
    config: PlannerConfig,
    arena: Vec<PlanNode>,
    leaves: Vec<usize>,
    /// Candidates already taken on the branch being expanded.
    used: Vec<bool>,
}

impl Search<'_, '_> {
    fn expand(&mut self, parent: usize) -> Result<(), PlanError> {
        let depth = self.arena[parent].depth + 1;
        if self.config.max_depth.is_some_and(|max| depth > max) {
            return Ok(());
        }

        let candidates = self.candidates;
        let goal = self.goal;

        for (slot, candidate) in candidates.iter().enumerate() {
            if self.used[slot] || !self.arena[parent].state.satisfies(candidate.preconditions) {
                continue;
            }
            if let Some(limit) = self.config.max_nodes
                && self.arena.len() > limit
            {
                return Err(PlanError::SearchLimitExceeded { limit });
            }

            let state = self.arena[parent].state.apply(candidate.effects);
            let reached = state.satisfies(goal);
            self.arena.push(PlanNode {
                parent: Some(parent),
                cost: self.arena[parent].cost + candidate.cost,
                state,
                step: Some(slot),
                depth,
            });
            let node = self.arena.len() - 1;

            if reached {
                self.leaves.push(node);
            } else {
                self.used[slot] = true;
                let result = self.expand(node);
                self.used[slot] = false;
                result?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionSpec, ActionState, BasicAction};

    fn catalogue(specs: Vec<ActionSpec>) -> ActionCatalogue<()> {
        let mut catalogue = ActionCatalogue::new();
        for spec in specs {
            catalogue.add(BasicAction::boxed(spec)).unwrap();
        }
        catalogue
    }

    /// Feasibility decided by the test context; records how often it is asked.
    struct Gated {
        spec: ActionSpec,
        state: ActionState,
        planning_cost: f32,
    }

    struct Gate {
        open: bool,
        checks: usize,
    }

    impl Action<Gate> for Gated {
        fn spec(&self) -> &ActionSpec {
            &self.spec
        }
        fn spec_mut(&mut self) -> &mut ActionSpec {
            &mut self.spec
        }
        fn state(&self) -> &ActionState {
            &self.state
        }
        fn state_mut(&mut self) -> &mut ActionState {
            &mut self.state
        }
        fn check_feasible(&mut self, ctx: &mut Gate) -> bool {
            ctx.checks += 1;
            self.state.cost = self.planning_cost;
            ctx.open
        }
        fn perform(&mut self, _ctx: &mut Gate) -> bool {
            self.state.done = true;
            true
        }
    }

    #[test]
    fn cheapest_leaf_wins() {
        let mut actions = catalogue(vec![
            ActionSpec::new("Expensive")
                .with_effect("done", true)
                .with_cost(5.0),
            ActionSpec::new("CheapA")
                .with_effect("halfway", true)
                .with_cost(1.0),
            ActionSpec::new("CheapB")
                .with_precondition("halfway", true)
                .with_effect("done", true)
                .with_cost(2.0),
        ]);
        let facts = FactStore::new();
        let goal = FactSet::single("done", true);

        let plan = Planner::default()
            .plan(&mut actions, &facts, &goal, &mut ())
            .unwrap();

        assert_eq!(plan.names(&actions), vec!["CheapA", "CheapB"]);
        assert_eq!(plan.cost, 3.0);
        assert_eq!(plan.describe(&actions), "CheapA-> CheapB-> GOAL");
    }

    #[test]
    fn equal_costs_prefer_shorter_plan() {
        let mut actions = catalogue(vec![
            ActionSpec::new("Prepare")
                .with_effect("ready", true)
                .with_cost(1.0),
            ActionSpec::new("Finish")
                .with_precondition("ready", true)
                .with_effect("done", true)
                .with_cost(1.0),
            ActionSpec::new("Direct")
                .with_effect("done", true)
                .with_cost(2.0),
        ]);
        let plan = Planner::default()
            .plan(
                &mut actions,
                &FactStore::new(),
                &FactSet::single("done", true),
                &mut (),
            )
            .unwrap();
        assert_eq!(plan.names(&actions), vec!["Direct"]);
    }

    #[test]
    fn equal_cost_and_depth_keep_catalogue_order() {
        let mut actions = catalogue(vec![
            ActionSpec::new("First").with_effect("done", true),
            ActionSpec::new("Second").with_effect("done", true),
        ]);
        let plan = Planner::default()
            .plan(
                &mut actions,
                &FactStore::new(),
                &FactSet::single("done", true),
                &mut (),
            )
            .unwrap();
        assert_eq!(plan.names(&actions), vec!["First"]);
        assert_eq!(plan.stats.leaves, 2);
    }

    #[test]
    fn unknown_facts_read_as_false() {
        let mut actions = catalogue(vec![
            ActionSpec::new("NeedsTrue")
                .with_precondition("armed", true)
                .with_effect("done", true),
            ActionSpec::new("NeedsFalse")
                .with_precondition("armed", false)
                .with_effect("done", true)
                .with_cost(9.0),
        ]);
        let plan = Planner::default()
            .plan(
                &mut actions,
                &FactStore::new(),
                &FactSet::single("done", true),
                &mut (),
            )
            .unwrap();
        assert_eq!(plan.names(&actions), vec!["NeedsFalse"]);
    }

    #[test]
    fn disabled_actions_are_not_planned() {
        let mut actions = catalogue(vec![
            ActionSpec::new("UseItem")
                .with_effect("done", true)
                .locked_until(100),
        ]);
        let err = Planner::default()
            .plan(
                &mut actions,
                &FactStore::new(),
                &FactSet::single("done", true),
                &mut (),
            )
            .unwrap_err();
        assert!(matches!(err, PlanError::NoPlan { .. }));
    }

    #[test]
    fn infeasible_actions_are_skipped_for_the_cycle() {
        let mut actions: ActionCatalogue<Gate> = ActionCatalogue::new();
        actions
            .add(Box::new(Gated {
                spec: ActionSpec::new("ChasePlayer").with_effect("caught", true),
                state: ActionState::new(1.0),
                planning_cost: 4.5,
            }))
            .unwrap();
        let goal = FactSet::single("caught", true);
        let facts = FactStore::new();
        let planner = Planner::default();

        let mut closed = Gate {
            open: false,
            checks: 0,
        };
        assert!(planner.plan(&mut actions, &facts, &goal, &mut closed).is_err());
        assert_eq!(closed.checks, 1);

        let mut open = Gate {
            open: true,
            checks: 0,
        };
        let plan = planner.plan(&mut actions, &facts, &goal, &mut open).unwrap();
        assert_eq!(plan.cost, 4.5);
        assert_eq!(plan.stats.usable_actions, 1);
    }

    #[test]
    fn planning_resets_action_state() {
        let mut actions = catalogue(vec![ActionSpec::new("GetItem").with_effect("hasItem", true)]);
        {
            let action = actions.get_mut(0).unwrap();
            action.state_mut().done = true;
            action.state_mut().cost = 100.0;
        }

        let plan = Planner::default()
            .plan(
                &mut actions,
                &FactStore::new(),
                &FactSet::single("hasItem", true),
                &mut (),
            )
            .unwrap();

        assert_eq!(plan.cost, 1.0);
        assert!(!actions.get(0).unwrap().is_done());
    }

    #[test]
    fn live_facts_are_not_modified() {
        let mut actions = catalogue(vec![ActionSpec::new("GetItem").with_effect("hasItem", true)]);
        let facts: FactStore = [("hasItem", false)].into_iter().collect();
        let before = facts.clone();

        Planner::default()
            .plan(&mut actions, &facts, &FactSet::single("hasItem", true), &mut ())
            .unwrap();

        assert_eq!(facts, before);
    }

    #[test]
    fn depth_cap_prunes_long_plans() {
        let mut actions = catalogue(vec![
            ActionSpec::new("Step1").with_effect("a", true),
            ActionSpec::new("Step2")
                .with_precondition("a", true)
                .with_effect("done", true),
        ]);
        let goal = FactSet::single("done", true);
        let planner = Planner::new(PlannerConfig::unbounded().with_max_depth(1));
        let err = planner
            .plan(&mut actions, &FactStore::new(), &goal, &mut ())
            .unwrap_err();
        assert_eq!(err, PlanError::NoPlan { goal });
    }
}
