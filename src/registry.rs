//! Registry of block types and their declared properties.
//!
//! The registry is an explicit value handed to the bakery. It is normally
//! built from a resource pack: `blocks/*.json` definitions when present,
//! otherwise properties inferred from the blockstate document.

use crate::error::{BakeryError, Result};
use crate::resource_pack::block::scalar_to_string;
use crate::resource_pack::{BlockstateDefinition, ResourcePack};
use crate::state::{Property, StateGraph};
use crate::types::normalize_location;
use serde_json::Value;
use std::collections::HashMap;

/// One registered block type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockType {
    /// Full resource location, e.g. `minecraft:furnace`.
    pub name: String,
    /// Declared properties, in declaration order.
    pub properties: Vec<Property>,
}

impl BlockType {
    /// Enumerate the state graph of this block type.
    pub fn state_graph(&self) -> Result<StateGraph> {
        StateGraph::build(self.name.clone(), self.properties.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    blocks: Vec<BlockType>,
    by_name: HashMap<String, usize>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block type. Names are normalized to `namespace:path`;
    /// registering the same name twice is a configuration error.
    pub fn register(&mut self, name: &str, properties: Vec<Property>) -> Result<()> {
        let name = normalize_location(name);
        if self.by_name.contains_key(&name) {
            return Err(BakeryError::ConfigParse(format!(
                "block type {} registered twice",
                name
            )));
        }
        self.by_name.insert(name.clone(), self.blocks.len());
        self.blocks.push(BlockType { name, properties });
        Ok(())
    }

    /// Build a registry covering every block in `pack` that has a blockstate
    /// or a block definition.
    pub fn from_pack(pack: &ResourcePack) -> Result<Self> {
        let mut names = pack.block_names();
        names.extend(pack.blocks.locations());
        names.sort();
        names.dedup();

        let mut registry = Self::new();
        for name in names {
            let properties = match pack_properties(pack, &name) {
                Ok(properties) => properties,
                Err(e) => {
                    // Registered bare so its states still bake, as missing.
                    log::warn!("{}: {}, registering without properties", name, e);
                    Vec::new()
                }
            };
            registry.register(&name, properties)?;
        }

        log::debug!("registered {} block types", registry.len());
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Option<&BlockType> {
        self.by_name
            .get(&normalize_location(name))
            .and_then(|&i| self.blocks.get(i))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block types sorted by name.
    pub fn iter_sorted(&self) -> Vec<&BlockType> {
        let mut blocks: Vec<&BlockType> = self.blocks.iter().collect();
        blocks.sort_by(|a, b| a.name.cmp(&b.name));
        blocks
    }
}

fn pack_properties(pack: &ResourcePack, name: &str) -> Result<Vec<Property>> {
    match pack.get_block(name) {
        Some(def) => def
            .properties
            .iter()
            .map(|(prop, values)| Property::new(prop.as_str(), values.iter().cloned()))
            .collect(),
        None => match pack.get_blockstate(name) {
            Some(blockstate) => infer_properties(blockstate),
            None => Ok(Vec::new()),
        },
    }
}

/// Infer properties from the keys a blockstate document tests.
///
/// Properties and values appear in the order they are first mentioned.
pub fn infer_properties(definition: &BlockstateDefinition) -> Result<Vec<Property>> {
    let mut seen: Vec<(String, Vec<String>)> = Vec::new();
    let mut note = |name: &str, value: &str| {
        let index = match seen.iter().position(|(n, _)| n == name) {
            Some(i) => i,
            None => {
                seen.push((name.to_string(), Vec::new()));
                seen.len() - 1
            }
        };
        let values = &mut seen[index].1;
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    };

    match definition {
        BlockstateDefinition::Variants(entries) => {
            for (key, _) in entries {
                for pair in key.split(',').filter(|p| !p.is_empty()) {
                    match pair.split_once('=') {
                        Some((name, value)) => note(name.trim(), value.trim()),
                        None => {
                            return Err(BakeryError::ConfigParse(format!(
                                "malformed variant key '{}'",
                                key
                            )))
                        }
                    }
                }
            }
        }
        BlockstateDefinition::Multipart(cases) => {
            for case in cases {
                if let Some(when) = &case.when {
                    collect_when(when, &mut note)?;
                }
            }
        }
    }

    seen.into_iter()
        .map(|(name, values)| Property::new(name, values))
        .collect()
}

fn collect_when(when: &Value, note: &mut impl FnMut(&str, &str)) -> Result<()> {
    let Value::Object(map) = when else {
        return Err(BakeryError::ConfigParse(format!(
            "multipart condition must be an object, got {}",
            when
        )));
    };

    for (key, value) in map {
        match (key.as_str(), value) {
            ("OR" | "AND", Value::Array(terms)) => {
                for term in terms {
                    collect_when(term, note)?;
                }
            }
            _ => {
                let text = scalar_to_string(value).ok_or_else(|| {
                    BakeryError::ConfigParse(format!(
                        "condition on '{}' has a non-scalar value {}",
                        key, value
                    ))
                })?;
                for alternative in text.split('|') {
                    note(key, alternative);
                }
            }
        }
    }
    Ok(())
}
