//! Goal catalogue and insistence-based goal selection.
//!
//! Every planning cycle each goal in the agent's fixed catalogue is scored
//! against the current facts and the most insistent one becomes the goal
//! handed to the planner.
//!
//! # Selection rules
//!
//! - Scores are integers; the strictly highest score wins.
//! - Ties keep the goal that appears first in catalogue order.
//! - A [`InsistenceRule::Fallback`] goal looks at the scores of the other goals
//!   so it only fires when nothing more urgent applies.
//! - The catalogue is never empty, so selection always returns a goal.

use crate::error::CatalogueError;
use crate::fact::{FactSet, FactStore};

/// How a goal's insistence is computed from facts.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InsistenceRule {
    /// Always the same score.
    Constant { score: i32 },

    /// `base + bonus` when every fact in `when` holds, otherwise `base`.
    ///
    /// Facts are read with auto-creation, so a name unknown to the store is
    /// created as `false`.
    Conditional { when: FactSet, base: i32, bonus: i32 },

    /// `base + bonus` when the lowest score among the non-fallback goals is at
    /// or below `threshold`, otherwise `base`.
    ///
    /// With no other goals the bonus never applies.
    Fallback {
        threshold: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        base: i32,
        bonus: i32,
    },
}

impl InsistenceRule {
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Catalogue entry: the fact a goal wants and how urgent it is.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GoalSpec {
    pub fact: String,
    #[cfg_attr(feature = "serde", serde(default = "default_desired"))]
    pub desired: bool,
    pub rule: InsistenceRule,
}

#[cfg(feature = "serde")]
fn default_desired() -> bool {
    true
}

impl GoalSpec {
    pub fn new(fact: impl Into<String>, desired: bool, rule: InsistenceRule) -> Self {
        Self {
            fact: fact.into(),
            desired,
            rule,
        }
    }
}

/// A scored goal for one planning cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Goal {
    pub fact: String,
    pub desired: bool,
    pub insistence: i32,
}

impl Goal {
    /// The desired state handed to the planner.
    pub fn state(&self) -> FactSet {
        FactSet::single(self.fact.clone(), self.desired)
    }

    /// True if both goals want the same fact value, whatever their scores.
    pub fn same_target(&self, other: &Goal) -> bool {
        self.fact == other.fact && self.desired == other.desired
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} ({})", self.fact, self.desired, self.insistence)
    }
}

/// Ordered, non-empty list of goals an agent type can pursue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalCatalogue {
    goals: Vec<GoalSpec>,
}

impl GoalCatalogue {
    pub fn new(goals: Vec<GoalSpec>) -> Result<Self, CatalogueError> {
        if goals.is_empty() {
            return Err(CatalogueError::EmptyGoalCatalogue);
        }
        for (i, goal) in goals.iter().enumerate() {
            if goals[..i].iter().any(|earlier| earlier.fact == goal.fact) {
                return Err(CatalogueError::DuplicateGoal {
                    fact: goal.fact.clone(),
                });
            }
        }
        Ok(Self { goals })
    }

    pub fn goals(&self) -> &[GoalSpec] {
        &self.goals
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Scores every goal in catalogue order.
    ///
    /// Non-fallback rules are evaluated first so fallback rules can see the
    /// full set of scores from this cycle.
    pub fn evaluate(&self, facts: &mut FactStore) -> Vec<Goal> {
        let mut scores: Vec<Option<i32>> = self
            .goals
            .iter()
            .map(|goal| match &goal.rule {
                InsistenceRule::Constant { score } => Some(*score),
                InsistenceRule::Conditional { when, base, bonus } => {
                    let holds = when.iter().all(|(name, value)| facts.get(name) == value);
                    Some(if holds { base.saturating_add(*bonus) } else { *base })
                }
                InsistenceRule::Fallback { .. } => None,
            })
            .collect();

        let lowest_other = scores.iter().flatten().copied().min().unwrap_or(i32::MAX);

        for (goal, score) in self.goals.iter().zip(scores.iter_mut()) {
            if let InsistenceRule::Fallback {
                threshold,
                base,
                bonus,
            } = goal.rule
            {
                *score = Some(if lowest_other <= threshold {
                    base.saturating_add(bonus)
                } else {
                    base
                });
            }
        }

        self.goals
            .iter()
            .zip(scores)
            .map(|(goal, score)| Goal {
                fact: goal.fact.clone(),
                desired: goal.desired,
                insistence: score.unwrap_or(i32::MIN),
            })
            .collect()
    }

    /// Returns the most insistent goal; the first one wins ties.
    pub fn select(&self, facts: &mut FactStore) -> Goal {
        let scores = self.evaluate(facts);
        pick_most_insistent(&scores).clone()
    }
}

/// Selects the most insistent goal from `goals` against `facts`.
pub fn select_goal(facts: &mut FactStore, goals: &GoalCatalogue) -> Goal {
    goals.select(facts)
}

fn pick_most_insistent(scores: &[Goal]) -> &Goal {
    let mut best = &scores[0];
    for goal in &scores[1..] {
        if goal.insistence > best.insistence {
            best = goal;
        }
    }
    best
}

/// Result of one selection cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalSelection {
    pub goal: Goal,
    /// Every goal with its score this cycle, in catalogue order.
    pub scores: Vec<Goal>,
    /// True when the chosen goal differs from the previous cycle's.
    pub changed: bool,
}

/// Remembers the last chosen goal so callers can detect goal changes.
///
/// Nothing else survives between cycles; scores are recomputed every call.
#[derive(Clone, Debug, Default)]
pub struct GoalSelector {
    current: Option<Goal>,
}

impl GoalSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, catalogue: &GoalCatalogue, facts: &mut FactStore) -> GoalSelection {
        let scores = catalogue.evaluate(facts);
        let goal = pick_most_insistent(&scores).clone();
        let changed = self
            .current
            .as_ref()
            .is_none_or(|previous| !previous.same_target(&goal));
        self.current = Some(goal.clone());

        GoalSelection {
            goal,
            scores,
            changed,
        }
    }

    /// Goal chosen by the most recent selection.
    pub fn current(&self) -> Option<&Goal> {
        self.current.as_ref()
    }

    /// Forgets the current goal so the next selection reports a change.
    pub fn clear(&mut self) {
        self.current = None;
    }
}
