//! Predicates over block states.
//!
//! Variant keys and multipart `when` clauses are compiled once per state
//! graph into [`Condition`] trees of property and value indices, so
//! matching a state never touches strings.

use crate::error::{BakeryError, Result};
use crate::resource_pack::block::scalar_to_string;
use crate::state::{PropertyId, StateGraph, StateId};
use serde_json::Value;

/// A compiled state predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Matches every state.
    Always,
    /// Matches states whose `property` holds one of `values` (value indices).
    Property {
        property: PropertyId,
        values: Vec<usize>,
    },
    /// Matches when any sub-condition matches.
    Any(Vec<Condition>),
    /// Matches when every sub-condition matches.
    All(Vec<Condition>),
}

impl Condition {
    /// Compile a multipart `when` clause. A missing clause always matches.
    pub fn compile(when: Option<&Value>, graph: &StateGraph) -> Result<Self> {
        match when {
            None => Ok(Condition::Always),
            Some(value) => Self::compile_object(value, graph),
        }
    }

    fn compile_object(value: &Value, graph: &StateGraph) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(BakeryError::ConfigParse(format!(
                "{}: condition must be an object, got {}",
                graph.owner(),
                value
            )));
        };

        let mut terms = Vec::with_capacity(map.len());
        for (key, value) in map {
            let term = match (key.as_str(), value) {
                ("OR", Value::Array(items)) => Condition::Any(
                    items
                        .iter()
                        .map(|item| Self::compile_object(item, graph))
                        .collect::<Result<_>>()?,
                ),
                ("AND", Value::Array(items)) => Condition::All(
                    items
                        .iter()
                        .map(|item| Self::compile_object(item, graph))
                        .collect::<Result<_>>()?,
                ),
                _ => {
                    let text = scalar_to_string(value).ok_or_else(|| {
                        BakeryError::ConfigParse(format!(
                            "{}: condition on '{}' has a non-scalar value {}",
                            graph.owner(),
                            key,
                            value
                        ))
                    })?;
                    Self::property(graph, key, text.split('|'))?
                }
            };
            terms.push(term);
        }

        Ok(Self::all_of(terms))
    }

    /// Compile a variant key such as `"facing=north,lit=true"`.
    /// The empty key matches every state.
    pub fn from_variant_key(key: &str, graph: &StateGraph) -> Result<Self> {
        let mut terms = Vec::new();
        for pair in key.split(',').filter(|p| !p.is_empty()) {
            let (name, value) = pair.split_once('=').ok_or_else(|| {
                BakeryError::ConfigParse(format!(
                    "{}: malformed variant key '{}'",
                    graph.owner(),
                    key
                ))
            })?;
            terms.push(Self::property(graph, name.trim(), [value.trim()])?);
        }
        Ok(Self::all_of(terms))
    }

    /// An equality test against any of `alternatives`. Values the property
    /// does not declare can never match and are dropped.
    fn property<'v>(
        graph: &StateGraph,
        name: &str,
        alternatives: impl IntoIterator<Item = &'v str>,
    ) -> Result<Self> {
        let property = graph
            .property(name)
            .ok_or_else(|| BakeryError::UnknownProperty {
                block: graph.owner().to_string(),
                property: name.to_string(),
            })?;

        let declared = graph.property_at(property);
        let mut values = Vec::new();
        for alternative in alternatives {
            match declared.index_of(alternative) {
                Some(index) => {
                    if !values.contains(&index) {
                        values.push(index);
                    }
                }
                None => log::debug!(
                    "{}: ignoring undeclared value {}={}",
                    graph.owner(),
                    name,
                    alternative
                ),
            }
        }

        Ok(Condition::Property { property, values })
    }

    fn all_of(mut terms: Vec<Condition>) -> Self {
        match terms.len() {
            0 => Condition::Always,
            1 => terms.remove(0),
            _ => Condition::All(terms),
        }
    }

    /// Evaluate against a state of `graph`.
    pub fn matches(&self, graph: &StateGraph, state: StateId) -> bool {
        match self {
            Condition::Always => true,
            Condition::Property { property, values } => {
                let current = graph.state(state).value_index(*property);
                values.contains(&current)
            }
            Condition::Any(terms) => terms.iter().any(|t| t.matches(graph, state)),
            Condition::All(terms) => terms.iter().all(|t| t.matches(graph, state)),
        }
    }
}
