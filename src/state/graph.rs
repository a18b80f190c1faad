//! Enumerated state space of one block type.
//!
//! Every combination of property values becomes a [`State`] in a single arena
//! owned by the [`StateGraph`]. States link to each other through a neighbor
//! table so that changing one property is a table lookup.

use super::property::Property;
use crate::error::{BakeryError, Result};
use std::collections::HashMap;

/// Upper bound on the number of states one block type may enumerate.
pub const MAX_STATES: usize = 1 << 16;

/// Index of a state inside its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

impl StateId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a property inside its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(usize);

impl PropertyId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One concrete combination of property values.
#[derive(Debug, Clone)]
pub struct State {
    /// Value index per property, in property order.
    values: Vec<u16>,
    /// `neighbors[p][v]`: the state with property `p` set to value `v`.
    /// The entry for the current value points back at this state.
    neighbors: Vec<Vec<StateId>>,
}

impl State {
    /// Value index of a property in this state.
    pub fn value_index(&self, property: PropertyId) -> usize {
        self.values[property.0] as usize
    }

    /// Value indices in property order.
    pub fn value_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.values.iter().map(|&v| v as usize)
    }
}

/// All states of one block type and the transitions between them.
#[derive(Debug, Clone)]
pub struct StateGraph {
    owner: String,
    properties: Vec<Property>,
    states: Vec<State>,
}

impl StateGraph {
    /// Enumerate every state of `owner` and link the neighbor tables.
    ///
    /// Enumeration is the Cartesian product in declaration order with the
    /// first property varying slowest; `states[0]` is the default state.
    pub fn build(owner: impl Into<String>, properties: Vec<Property>) -> Result<Self> {
        let owner = owner.into();

        for (i, property) in properties.iter().enumerate() {
            if properties[..i].iter().any(|p| p.name() == property.name()) {
                return Err(BakeryError::StateGraph(format!(
                    "{} declares property '{}' twice",
                    owner,
                    property.name()
                )));
            }
            if property.len() > u16::MAX as usize {
                return Err(BakeryError::StateGraph(format!(
                    "{}: property '{}' has too many values",
                    owner,
                    property.name()
                )));
            }
        }

        let total = properties
            .iter()
            .try_fold(1usize, |acc, p| acc.checked_mul(p.len()))
            .filter(|&n| n <= MAX_STATES)
            .ok_or_else(|| {
                BakeryError::StateGraph(format!(
                    "{} would enumerate more than {} states",
                    owner, MAX_STATES
                ))
            })?;

        let mut assignments: Vec<Vec<u16>> = vec![Vec::with_capacity(properties.len())];
        for property in &properties {
            let mut expanded = Vec::with_capacity(assignments.len() * property.len());
            for partial in &assignments {
                for value in 0..property.len() {
                    let mut next = partial.clone();
                    next.push(value as u16);
                    expanded.push(next);
                }
            }
            assignments = expanded;
        }
        debug_assert_eq!(assignments.len(), total);

        // Construction-only lookup; dropped once neighbors are linked.
        let lookup: HashMap<Vec<u16>, StateId> = assignments
            .iter()
            .enumerate()
            .map(|(i, values)| (values.clone(), StateId(i as u32)))
            .collect();

        let mut states = Vec::with_capacity(assignments.len());
        for values in assignments {
            let mut neighbors = Vec::with_capacity(properties.len());
            let mut key = values.clone();
            for (p, property) in properties.iter().enumerate() {
                let mut row = Vec::with_capacity(property.len());
                for value in 0..property.len() {
                    key[p] = value as u16;
                    let id = lookup.get(&key).copied().ok_or_else(|| {
                        BakeryError::StateGraph(format!(
                            "{}: no state for {}={}",
                            owner,
                            property.name(),
                            property.values()[value]
                        ))
                    })?;
                    row.push(id);
                }
                key[p] = values[p];
                neighbors.push(row);
            }
            states.push(State { values, neighbors });
        }

        Ok(Self {
            owner,
            properties,
            states,
        })
    }

    /// Block type this graph enumerates.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Properties in declaration order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<PropertyId> {
        self.properties
            .iter()
            .position(|p| p.name() == name)
            .map(PropertyId)
    }

    /// Property definition for an id.
    pub fn property_at(&self, id: PropertyId) -> &Property {
        &self.properties[id.0]
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the graph has no states.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The first enumerated state.
    pub fn default_state(&self) -> StateId {
        StateId(0)
    }

    /// All state ids in enumeration order.
    pub fn states(&self) -> impl Iterator<Item = StateId> {
        (0..self.states.len() as u32).map(StateId)
    }

    /// State data for an id.
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.index()]
    }

    /// Current value of `property` in `state`.
    pub fn value(&self, state: StateId, property: PropertyId) -> &str {
        let index = self.state(state).value_index(property);
        &self.properties[property.0].values()[index]
    }

    /// `(property, value)` pairs of a state in declaration order.
    pub fn values(&self, state: StateId) -> Vec<(&str, &str)> {
        self.properties
            .iter()
            .zip(self.state(state).value_indices())
            .map(|(p, v)| (p.name(), p.values()[v].as_str()))
            .collect()
    }

    /// Variant key of a state: `key=value` pairs sorted by key, comma joined.
    pub fn variant_key(&self, state: StateId) -> String {
        let mut pairs = self.values(state);
        pairs.sort_by_key(|(k, _)| *k);
        pairs
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Human-readable `owner[key=value,...]` description.
    pub fn describe(&self, state: StateId) -> String {
        let key = self.variant_key(state);
        if key.is_empty() {
            self.owner.clone()
        } else {
            format!("{}[{}]", self.owner, key)
        }
    }

    /// The state reached by setting `property` to its `value`-th value.
    pub fn neighbor(&self, state: StateId, property: PropertyId, value: usize) -> Option<StateId> {
        self.state(state)
            .neighbors
            .get(property.0)
            .and_then(|row| row.get(value))
            .copied()
    }

    /// Change one property of a state.
    ///
    /// Returns `state` itself when the value is already current.
    pub fn set_value(&self, state: StateId, property: &str, value: &str) -> Result<StateId> {
        let id = self
            .property(property)
            .ok_or_else(|| BakeryError::UnknownProperty {
                block: self.owner.clone(),
                property: property.to_string(),
            })?;
        let unknown = || BakeryError::UnknownTransition {
            block: self.owner.clone(),
            property: property.to_string(),
            value: value.to_string(),
        };
        let index = self.properties[id.0].index_of(value).ok_or_else(unknown)?;

        if self.state(state).value_index(id) == index {
            return Ok(state);
        }
        self.neighbor(state, id, index).ok_or_else(unknown)
    }

    /// Find the state matching `values`, starting from the default state.
    /// Properties not mentioned keep their default value.
    pub fn find<'v, I>(&self, values: I) -> Result<StateId>
    where
        I: IntoIterator<Item = (&'v str, &'v str)>,
    {
        values
            .into_iter()
            .try_fold(self.default_state(), |state, (property, value)| {
                self.set_value(state, property, value)
            })
    }
}
