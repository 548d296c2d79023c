//! Planning operators and the per-agent action catalogue.
//!
//! An action is described statically by an [`ActionSpec`] (preconditions,
//! effects, base cost) and carries per-cycle [`ActionState`] (current cost,
//! target, completion flags). Gameplay behaviour such as target discovery or
//! the real-world effect of performing the action lives in implementations of
//! the [`Action`] trait, which is generic over the host context `C`.

use crate::error::CatalogueError;
use crate::fact::{FactSet, FactStore};

/// Opaque handle to a host-side object an action is aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetId(pub u32);

/// Static description of an action.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionSpec {
    pub name: String,

    /// Facts that must hold before the action can be planned.
    #[cfg_attr(feature = "serde", serde(default))]
    pub preconditions: FactSet,

    /// Facts the action guarantees once it completes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: FactSet,

    /// Whether completing the action writes its effects into the live facts.
    /// Repeatable actions such as patrolling keep their effects planning-only
    /// so the goal they serve can be pursued again.
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub commit_effects: bool,

    /// Live fact edits applied after the effects when the action completes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_complete: FactSet,

    /// Cost restored by every reset. Feasibility checks may override it for
    /// the current cycle (e.g. travel time to the chosen target).
    #[cfg_attr(feature = "serde", serde(default = "default_cost"))]
    pub cost: f32,

    /// Disabled actions are never handed to the planner.
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub enabled: bool,

    /// Whether the agent must be next to the action's target to perform it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub requires_proximity: bool,

    /// Knowledge at which a disabled action becomes enabled.
    #[cfg_attr(feature = "serde", serde(default))]
    pub unlock_knowledge: Option<u32>,
}

#[cfg(feature = "serde")]
fn default_cost() -> f32 {
    ActionSpec::DEFAULT_COST
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

impl ActionSpec {
    pub const DEFAULT_COST: f32 = 1.0;

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            preconditions: FactSet::new(),
            effects: FactSet::new(),
            commit_effects: true,
            on_complete: FactSet::new(),
            cost: Self::DEFAULT_COST,
            enabled: true,
            requires_proximity: false,
            unlock_knowledge: None,
        }
    }

    #[must_use]
    pub fn with_precondition(mut self, name: impl Into<String>, value: bool) -> Self {
        self.preconditions.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_effect(mut self, name: impl Into<String>, value: bool) -> Self {
        self.effects.insert(name, value);
        self
    }

    /// Keeps the effects out of the live facts on completion.
    #[must_use]
    pub fn uncommitted(mut self) -> Self {
        self.commit_effects = false;
        self
    }

    #[must_use]
    pub fn with_completion_edit(mut self, name: impl Into<String>, value: bool) -> Self {
        self.on_complete.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: f32) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn with_proximity(mut self, requires_proximity: bool) -> Self {
        self.requires_proximity = requires_proximity;
        self
    }

    /// Starts the action disabled until `threshold` knowledge is gathered.
    #[must_use]
    pub fn locked_until(mut self, threshold: u32) -> Self {
        self.enabled = false;
        self.unlock_knowledge = Some(threshold);
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn remove_precondition(&mut self, name: &str) -> bool {
        self.preconditions.remove(name).is_some()
    }

    pub fn remove_effect(&mut self, name: &str) -> bool {
        self.effects.remove(name).is_some()
    }

    /// Writes a completed action into the live facts: the effects when they
    /// are committed, then the completion edits.
    pub fn complete_into(&self, facts: &mut FactStore) {
        if self.commit_effects {
            facts.apply_in_place(&self.effects);
        }
        facts.apply_in_place(&self.on_complete);
    }

    /// Value completing the action leaves `name` at, if it writes `name`.
    pub fn completion_value(&self, name: &str) -> Option<bool> {
        match self.on_complete.get(name) {
            Some(value) => Some(value),
            None if self.commit_effects => self.effects.get(name),
            None => None,
        }
    }
}

/// Mutable per-cycle state of an action.
///
/// Cleared by [`Action::reset`] before every planning attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionState {
    /// Planning cost for the current cycle.
    pub cost: f32,
    pub target: Option<TargetId>,
    pub in_range: bool,
    pub done: bool,
    /// Movement cost spent so far while approaching the target.
    pub movement_cost: f32,
    /// Set when approaching the target took too long; performing then fails.
    pub cost_too_high: bool,
    /// How many times the movement cost was relaxed near the target.
    pub budget_resets: u32,
}

impl ActionState {
    pub fn new(base_cost: f32) -> Self {
        Self {
            cost: base_cost,
            target: None,
            in_range: false,
            done: false,
            movement_cost: 0.0,
            cost_too_high: false,
            budget_resets: 0,
        }
    }

    pub fn reset(&mut self, base_cost: f32) {
        *self = Self::new(base_cost);
    }

    /// Marks the action as unable to continue and releases the movement phase.
    pub fn abort_movement(&mut self) {
        self.cost_too_high = true;
        self.in_range = true;
    }
}

/// A planning operator the agent can execute.
///
/// Implementors provide the static [`ActionSpec`], the per-cycle
/// [`ActionState`], and the two host-facing behaviours: the procedural
/// feasibility check and the real-world effect. The planner only ever calls
/// [`Action::reset`] and [`Action::check_feasible`].
pub trait Action<C>: Send {
    fn spec(&self) -> &ActionSpec;

    fn spec_mut(&mut self) -> &mut ActionSpec;

    fn state(&self) -> &ActionState;

    fn state_mut(&mut self) -> &mut ActionState;

    /// Evaluates procedural preconditions against live context.
    ///
    /// May set the action's cost and target for this cycle. Returning `false`
    /// only removes the action from the current planning cycle.
    fn check_feasible(&mut self, ctx: &mut C) -> bool;

    /// Applies the action in the world. Returns `false` to abort the plan.
    ///
    /// Implementations set [`ActionState::done`] once the effect is achieved.
    fn perform(&mut self, ctx: &mut C) -> bool;

    /// Hook for implementation-specific state cleared on every reset.
    fn on_reset(&mut self) {}

    fn name(&self) -> &str {
        &self.spec().name
    }

    fn preconditions(&self) -> &FactSet {
        &self.spec().preconditions
    }

    fn effects(&self) -> &FactSet {
        &self.spec().effects
    }

    fn cost(&self) -> f32 {
        self.state().cost
    }

    fn is_enabled(&self) -> bool {
        self.spec().enabled
    }

    fn requires_proximity(&self) -> bool {
        self.spec().requires_proximity
    }

    fn target(&self) -> Option<TargetId> {
        self.state().target
    }

    fn is_in_range(&self) -> bool {
        self.state().in_range
    }

    fn is_done(&self) -> bool {
        self.state().done
    }

    /// Clears completion flags, target and movement bookkeeping, and restores
    /// the base cost.
    fn reset(&mut self) {
        let base_cost = self.spec().cost;
        self.state_mut().reset(base_cost);
        self.on_reset();
    }
}

/// Blanket implementation so boxed actions can be used wherever an action is
/// expected.
impl<C> Action<C> for Box<dyn Action<C>> {
    fn spec(&self) -> &ActionSpec {
        (**self).spec()
    }

    fn spec_mut(&mut self) -> &mut ActionSpec {
        (**self).spec_mut()
    }

    fn state(&self) -> &ActionState {
        (**self).state()
    }

    fn state_mut(&mut self) -> &mut ActionState {
        (**self).state_mut()
    }

    fn check_feasible(&mut self, ctx: &mut C) -> bool {
        (**self).check_feasible(ctx)
    }

    fn perform(&mut self, ctx: &mut C) -> bool {
        (**self).perform(ctx)
    }

    fn on_reset(&mut self) {
        (**self).on_reset()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// An always-feasible action that completes on its first perform.
///
/// Useful for purely symbolic steps and for exercising the planner.
#[derive(Clone, Debug)]
pub struct BasicAction {
    spec: ActionSpec,
    state: ActionState,
}

impl BasicAction {
    pub fn new(spec: ActionSpec) -> Self {
        let state = ActionState::new(spec.cost);
        Self { spec, state }
    }

    /// Boxes the action for insertion into a catalogue.
    pub fn boxed<C>(spec: ActionSpec) -> Box<dyn Action<C>> {
        Box::new(Self::new(spec))
    }
}

impl<C> Action<C> for BasicAction {
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

    fn check_feasible(&mut self, _ctx: &mut C) -> bool {
        true
    }

    fn perform(&mut self, _ctx: &mut C) -> bool {
        if self.state.cost_too_high {
            return false;
        }
        self.state.done = true;
        true
    }
}

/// Boxed action stored in a catalogue.
pub type BoxedAction<C> = Box<dyn Action<C>>;

struct CatalogueEntry<C> {
    action: BoxedAction<C>,
    knowledge: u32,
}

/// Ordered, name-unique set of actions owned by one agent.
///
/// Catalogue order is the order in which the planner considers actions and
/// therefore decides between otherwise equal plans.
pub struct ActionCatalogue<C> {
    entries: Vec<CatalogueEntry<C>>,
}

impl<C> Default for ActionCatalogue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ActionCatalogue<C> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an action. Returns its catalogue index.
    pub fn add(&mut self, action: BoxedAction<C>) -> Result<usize, CatalogueError> {
        if self.position(action.name()).is_some() {
            return Err(CatalogueError::DuplicateAction {
                name: action.name().to_owned(),
            });
        }
        self.entries.push(CatalogueEntry {
            action,
            knowledge: 0,
        });
        Ok(self.entries.len() - 1)
    }

    /// Removes an action by name, shifting later indices down.
    pub fn remove(&mut self, name: &str) -> Option<BoxedAction<C>> {
        let index = self.position(name)?;
        Some(self.entries.remove(index).action)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.action.name() == name)
    }

    pub fn get(&self, index: usize) -> Option<&dyn Action<C>> {
        self.entries.get(index).map(|entry| entry.action.as_ref())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut BoxedAction<C>> {
        self.entries.get_mut(index).map(|entry| &mut entry.action)
    }

    pub fn by_name(&self, name: &str) -> Option<&dyn Action<C>> {
        self.position(name).and_then(|index| self.get(index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates every action in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Action<C>> {
        self.entries.iter().map(|entry| entry.action.as_ref())
    }

    /// Iterates `(index, action)` for enabled actions in catalogue order.
    pub fn iter_enabled(&self) -> impl Iterator<Item = (usize, &dyn Action<C>)> {
        self.iter()
            .enumerate()
            .filter(|(_, action)| action.is_enabled())
    }

    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = (usize, &mut BoxedAction<C>)> {
        self.entries
            .iter_mut()
            .enumerate()
            .map(|(index, entry)| (index, &mut entry.action))
    }

    /// Enables or disables an action by name.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<(), CatalogueError> {
        let index = self.require(name)?;
        self.entries[index].action.spec_mut().enabled = enabled;
        Ok(())
    }

    /// Adds learned knowledge to an action.
    ///
    /// A disabled action with an unlock threshold becomes enabled once its
    /// accumulated knowledge reaches the threshold. Returns `true` only when
    /// this call enabled it.
    pub fn add_knowledge(&mut self, name: &str, amount: u32) -> Result<bool, CatalogueError> {
        let index = self.require(name)?;
        let entry = &mut self.entries[index];
        entry.knowledge = entry.knowledge.saturating_add(amount);

        let spec = entry.action.spec_mut();
        match spec.unlock_knowledge {
            Some(threshold) if !spec.enabled && entry.knowledge >= threshold => {
                spec.enabled = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Knowledge accumulated for an action so far.
    pub fn knowledge(&self, name: &str) -> Option<u32> {
        self.position(name).map(|index| self.entries[index].knowledge)
    }

    fn require(&self, name: &str) -> Result<usize, CatalogueError> {
        self.position(name)
            .ok_or_else(|| CatalogueError::UnknownAction {
                name: name.to_owned(),
            })
    }
}

impl<C> std::fmt::Debug for ActionCatalogue<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| entry.action.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogue() -> ActionCatalogue<()> {
        let mut catalogue = ActionCatalogue::new();
        catalogue
            .add(BasicAction::boxed(
                ActionSpec::new("GetItem")
                    .with_precondition("hasItem", false)
                    .with_effect("hasItem", true)
                    .with_proximity(true),
            ))
            .unwrap();
        catalogue
            .add(BasicAction::boxed(
                ActionSpec::new("DodgeProjectile")
                    .with_precondition("incomingProjectile", true)
                    .with_effect("incomingProjectile", false)
                    .locked_until(200),
            ))
            .unwrap();
        catalogue
    }

    #[test]
    fn completion_writes_committed_effects_then_edits() {
        let chase = ActionSpec::new("ChasePlayer")
            .with_effect("foundPlayer", false)
            .with_effect("attackPlayer", true)
            .with_completion_edit("attackPlayer", false);
        let mut facts = FactStore::new();
        facts.set("foundPlayer", true);

        chase.complete_into(&mut facts);
        assert_eq!(facts.peek("foundPlayer"), Some(false));
        assert_eq!(facts.peek("attackPlayer"), Some(false));
        assert_eq!(chase.completion_value("foundPlayer"), Some(false));
        assert_eq!(chase.completion_value("attackPlayer"), Some(false));
    }

    #[test]
    fn uncommitted_effects_stay_out_of_live_facts() {
        let patrol = ActionSpec::new("PatrolToPoint")
            .with_precondition("isPatrolling", false)
            .with_effect("isPatrolling", true)
            .uncommitted();
        let mut facts = FactStore::new();
        facts.set("isPatrolling", false);

        patrol.complete_into(&mut facts);
        assert_eq!(facts.peek("isPatrolling"), Some(false));
        assert_eq!(patrol.completion_value("isPatrolling"), None);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut catalogue = catalogue();
        let err = catalogue
            .add(BasicAction::boxed(ActionSpec::new("GetItem")))
            .unwrap_err();
        assert_eq!(
            err,
            CatalogueError::DuplicateAction {
                name: "GetItem".into()
            }
        );
        assert_eq!(catalogue.len(), 2);
    }

    #[test]
    fn iter_enabled_skips_disabled() {
        let catalogue = catalogue();
        let enabled: Vec<_> = catalogue
            .iter_enabled()
            .map(|(index, action)| (index, action.name().to_owned()))
            .collect();
        assert_eq!(enabled, vec![(0, "GetItem".to_owned())]);
    }

    #[test]
    fn knowledge_unlocks_at_threshold() {
        let mut catalogue = catalogue();

        assert!(!catalogue.add_knowledge("DodgeProjectile", 150).unwrap());
        assert!(!catalogue.by_name("DodgeProjectile").unwrap().is_enabled());

        assert!(catalogue.add_knowledge("DodgeProjectile", 50).unwrap());
        assert!(catalogue.by_name("DodgeProjectile").unwrap().is_enabled());
        assert_eq!(catalogue.knowledge("DodgeProjectile"), Some(200));

        // Already enabled: further knowledge does not report a new unlock.
        assert!(!catalogue.add_knowledge("DodgeProjectile", 10).unwrap());
    }

    #[test]
    fn knowledge_for_unknown_action_errors() {
        let mut catalogue = catalogue();
        assert!(matches!(
            catalogue.add_knowledge("Fly", 1),
            Err(CatalogueError::UnknownAction { .. })
        ));
    }

    #[test]
    fn reset_restores_base_cost_and_flags() {
        let mut action = BasicAction::new(ActionSpec::new("ChasePlayer").with_cost(1.0));
        {
            let state = Action::<()>::state_mut(&mut action);
            state.cost = 42.0;
            state.target = Some(TargetId(7));
            state.in_range = true;
            state.done = true;
            state.abort_movement();
        }

        Action::<()>::reset(&mut action);

        assert_eq!(Action::<()>::state(&action), &ActionState::new(1.0));
    }

    #[test]
    fn basic_action_refuses_after_budget_exceeded() {
        let mut action = BasicAction::new(ActionSpec::new("PatrolToPoint"));
        Action::<()>::state_mut(&mut action).abort_movement();
        assert!(!action.perform(&mut ()));
        assert!(!Action::<()>::is_done(&action));
    }

    #[test]
    fn remove_shifts_positions() {
        let mut catalogue = catalogue();
        assert!(catalogue.remove("GetItem").is_some());
        assert_eq!(catalogue.position("DodgeProjectile"), Some(0));
        assert!(catalogue.remove("GetItem").is_none());
    }

    #[test]
    fn spec_builder_removes_conditions() {
        let mut spec = ActionSpec::new("TurnBlue")
            .with_precondition("isRed", true)
            .with_effect("isBlue", true);
        assert!(spec.remove_precondition("isRed"));
        assert!(!spec.remove_precondition("isRed"));
        assert!(spec.remove_effect("isBlue"));
        assert!(spec.preconditions.is_empty() && spec.effects.is_empty());
    }
}
