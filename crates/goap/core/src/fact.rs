//! Boolean world facts and the agent's belief store.
//!
//! A [`FactStore`] is the agent's knowledge of the world: a name-unique map of
//! boolean propositions. A [`FactSet`] is the same shape used for action
//! preconditions, action effects and goal states.
//!
//! Both are backed by `BTreeMap` so iteration, rendering and therefore the
//! planner's search order are deterministic.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

/// A single named boolean proposition.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fact {
    pub name: String,
    pub value: bool,
}

impl Fact {
    pub fn new(name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.value)
    }
}

/// Name-unique set of facts used for preconditions, effects and goal states.
///
/// Inserting a name that is already present replaces its value, so a set can
/// never demand both `x:true` and `x:false`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FactSet(BTreeMap<String, bool>);

impl FactSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set holding exactly one fact.
    pub fn single(name: impl Into<String>, value: bool) -> Self {
        let mut set = Self::new();
        set.insert(name, value);
        set
    }

    /// Inserts or replaces a fact. Returns the previous value, if any.
    pub fn insert(&mut self, name: impl Into<String>, value: bool) -> Option<bool> {
        self.0.insert(name.into(), value)
    }

    /// Removes a fact by name. Returns the removed value, if any.
    pub fn remove(&mut self, name: &str) -> Option<bool> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.0.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Returns true if every fact in this set holds in `store`.
    ///
    /// Absent facts in `store` read as `false` and `store` is not modified.
    pub fn is_satisfied_by(&self, store: &FactStore) -> bool {
        store.satisfies(self)
    }
}

impl<N: Into<String>> FromIterator<(N, bool)> for FactSet {
    fn from_iter<I: IntoIterator<Item = (N, bool)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }
}

impl fmt::Display for FactSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_pairs(f, self.iter())
    }
}

/// The agent's belief about the world state.
///
/// # Read semantics
///
/// [`FactStore::get`] creates unknown facts as `false` on first read. Goal
/// rules and action logic rely on this, so it is kept even though it means a
/// misspelt fact name silently becomes a new `false` fact. Use
/// [`FactStore::peek`] for a side-effect free lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FactStore {
    facts: BTreeMap<String, bool>,
}

impl FactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with every listed fact initialised to `false`.
    pub fn with_defaults<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        Self {
            facts: names.into_iter().map(|name| (name.into(), false)).collect(),
        }
    }

    /// Returns the value of `name`, creating it as `false` if unknown.
    pub fn get(&mut self, name: &str) -> bool {
        if let Some(value) = self.facts.get(name) {
            return *value;
        }
        self.facts.insert(name.to_owned(), false);
        false
    }

    /// Returns the value of `name` without creating it.
    pub fn peek(&self, name: &str) -> Option<bool> {
        self.facts.get(name).copied()
    }

    /// Returns the value of `name`, reading unknown facts as `false`.
    pub fn value_or_false(&self, name: &str) -> bool {
        self.peek(name).unwrap_or(false)
    }

    /// Sets `name` to `value`.
    ///
    /// Returns `true` if the fact already existed (its value was replaced) and
    /// `false` if it was newly created. The write itself always happens.
    pub fn set(&mut self, name: impl Into<String>, value: bool) -> bool {
        self.facts.insert(name.into(), value).is_some()
    }

    /// Removes `entry` if the store holds exactly that name/value pair.
    pub fn remove(&mut self, entry: &Fact) -> bool {
        match self.facts.get(&entry.name) {
            Some(value) if *value == entry.value => {
                self.facts.remove(&entry.name);
                true
            }
            _ => false,
        }
    }

    /// Returns a deep copy for simulation.
    pub fn snapshot(&self) -> FactStore {
        self.clone()
    }

    /// Returns a new store with every effect written over this one.
    ///
    /// The receiver is left untouched.
    #[must_use]
    pub fn apply(&self, effects: &FactSet) -> FactStore {
        let mut next = self.clone();
        next.apply_in_place(effects);
        next
    }

    /// Writes every effect into this store.
    pub fn apply_in_place(&mut self, effects: &FactSet) {
        for (name, value) in effects.iter() {
            self.set(name, value);
        }
    }

    /// Returns true if every condition holds, reading absent facts as `false`.
    pub fn satisfies(&self, conditions: &FactSet) -> bool {
        conditions
            .iter()
            .all(|(name, value)| self.value_or_false(name) == value)
    }

    /// Removes every fact.
    pub fn clear(&mut self) {
        self.facts.clear();
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.facts.contains_key(name)
    }

    /// Iterates facts in name order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.facts.iter(),
        }
    }
}

/// Name-ordered iterator over a [`FactStore`].
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, bool>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, bool);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(name, value)| (name.as_str(), *value))
    }
}

impl<'a> IntoIterator for &'a FactStore {
    type Item = (&'a str, bool);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<N: Into<String>> FromIterator<(N, bool)> for FactStore {
    fn from_iter<I: IntoIterator<Item = (N, bool)>>(iter: I) -> Self {
        Self {
            facts: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

impl fmt::Display for FactStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_pairs(f, self.iter())
    }
}

fn write_pairs<'a>(
    f: &mut fmt::Formatter<'_>,
    pairs: impl Iterator<Item = (&'a str, bool)>,
) -> fmt::Result {
    for (i, (name, value)) in pairs.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{name}:{value}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_creates_unknown_fact_as_false() {
        let mut store = FactStore::new();
        assert!(!store.contains("foundPlayer"));

        assert!(!store.get("foundPlayer"));

        assert!(store.contains("foundPlayer"));
        assert_eq!(store.peek("foundPlayer"), Some(false));
    }

    #[test]
    fn peek_does_not_create() {
        let store = FactStore::new();
        assert_eq!(store.peek("hasItem"), None);
        assert!(!store.value_or_false("hasItem"));
        assert!(store.is_empty());
    }

    #[test]
    fn set_reports_preexisting() {
        let mut store = FactStore::new();
        assert!(!store.set("hasItem", true));
        assert!(store.set("hasItem", true));
        assert_eq!(store.len(), 1);
        assert!(store.get("hasItem"));

        let before = store.clone();
        assert!(store.set("hasItem", true));
        assert_eq!(store, before);
    }

    #[test]
    fn set_replaces_value_keeping_one_entry() {
        let mut store = FactStore::with_defaults(["isPatrolling"]);
        assert!(store.set("isPatrolling", true));
        assert_eq!(store.len(), 1);
        assert_eq!(store.peek("isPatrolling"), Some(true));
    }

    #[test]
    fn remove_matches_exact_pair() {
        let mut store = FactStore::new();
        store.set("hasItem", true);

        assert!(!store.remove(&Fact::new("hasItem", false)));
        assert!(store.contains("hasItem"));

        assert!(store.remove(&Fact::new("hasItem", true)));
        assert!(!store.contains("hasItem"));

        assert!(!store.remove(&Fact::new("hasItem", true)));
    }

    #[test]
    fn apply_is_pure() {
        let store: FactStore = [("hasItem", false), ("aimingAtPlayer", true)]
            .into_iter()
            .collect();
        let before = store.clone();
        let effects: FactSet = [("hasItem", true), ("hasUsedItem", false)]
            .into_iter()
            .collect();

        let next = store.apply(&effects);

        assert_eq!(store, before);
        assert_eq!(next.peek("hasItem"), Some(true));
        assert_eq!(next.peek("hasUsedItem"), Some(false));
        assert_eq!(next.peek("aimingAtPlayer"), Some(true));
    }

    #[test]
    fn snapshot_is_independent() {
        let mut store = FactStore::with_defaults(["foundPlayer"]);
        let snapshot = store.snapshot();
        store.set("foundPlayer", true);
        assert_eq!(snapshot.peek("foundPlayer"), Some(false));
    }

    #[test]
    fn satisfies_requires_exact_conjunction() {
        let goal: FactSet = [("a", true), ("b", false)].into_iter().collect();

        let matching: FactStore = [("a", true), ("b", false), ("c", true)]
            .into_iter()
            .collect();
        assert!(matching.satisfies(&goal));

        let absent_b: FactStore = [("a", true)].into_iter().collect();
        assert!(absent_b.satisfies(&goal));

        let wrong_b: FactStore = [("a", true), ("b", true)].into_iter().collect();
        assert!(!wrong_b.satisfies(&goal));

        let absent_a = FactStore::new();
        assert!(!absent_a.satisfies(&goal));
    }

    #[test]
    fn fact_set_insert_replaces() {
        let mut set = FactSet::single("hasItem", true);
        assert_eq!(set.insert("hasItem", false), Some(true));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("hasItem"), Some(false));
    }

    #[test]
    fn display_is_name_ordered() {
        let store: FactStore = [("b", true), ("a", false)].into_iter().collect();
        assert_eq!(store.to_string(), "a:false, b:true");
        assert_eq!(FactSet::new().to_string(), "");
    }
}
