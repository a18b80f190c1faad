//! Block state to model variant resolution.

use super::condition::Condition;
use crate::error::Result;
use crate::resource_pack::{BlockstateDefinition, ModelVariant};
use crate::state::{StateGraph, StateId};

/// Models chosen for one state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<'a> {
    /// The weighted list of the first matching variant entry.
    Variant(&'a [ModelVariant]),
    /// The apply list of every matching multipart case, in document order.
    MultiPart(Vec<&'a [ModelVariant]>),
}

impl Selection<'_> {
    /// Every model variant in the selection.
    pub fn variants(&self) -> Vec<&ModelVariant> {
        match self {
            Selection::Variant(list) => list.iter().collect(),
            Selection::MultiPart(parts) => parts.iter().flat_map(|list| list.iter()).collect(),
        }
    }
}

#[derive(Debug, Clone)]
enum Entries {
    Variants(Vec<(Condition, Vec<ModelVariant>)>),
    Multipart(Vec<(Condition, Vec<ModelVariant>)>),
}

/// A blockstate definition compiled against one block type's state graph.
#[derive(Debug, Clone)]
pub struct VariantSelector {
    entries: Entries,
}

impl VariantSelector {
    /// Compile every variant key or multipart condition, in document order.
    pub fn compile(definition: &BlockstateDefinition, graph: &StateGraph) -> Result<Self> {
        let entries = match definition {
            BlockstateDefinition::Variants(variants) => Entries::Variants(
                variants
                    .iter()
                    .map(|(key, list)| Ok((Condition::from_variant_key(key, graph)?, list.clone())))
                    .collect::<Result<_>>()?,
            ),
            BlockstateDefinition::Multipart(cases) => Entries::Multipart(
                cases
                    .iter()
                    .map(|case| {
                        Ok((
                            Condition::compile(case.when.as_ref(), graph)?,
                            case.apply.to_vec(),
                        ))
                    })
                    .collect::<Result<_>>()?,
            ),
        };
        Ok(Self { entries })
    }

    /// Choose the models for `state`. `None` when nothing matches.
    pub fn select(&self, graph: &StateGraph, state: StateId) -> Option<Selection<'_>> {
        match &self.entries {
            Entries::Variants(entries) => entries
                .iter()
                .find(|(condition, list)| !list.is_empty() && condition.matches(graph, state))
                .map(|(_, list)| Selection::Variant(list.as_slice())),
            Entries::Multipart(cases) => {
                let parts: Vec<&[ModelVariant]> = cases
                    .iter()
                    .filter(|(condition, list)| !list.is_empty() && condition.matches(graph, state))
                    .map(|(_, list)| list.as_slice())
                    .collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(Selection::MultiPart(parts))
                }
            }
        }
    }
}
