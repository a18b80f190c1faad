//! Blockstate definition parsing.
//!
//! Blockstates define how block properties map to model variants.
//! There are two formats: "variants" and "multipart". Both keep the order
//! entries appear in the document, since selection is first-match.

use crate::types::{normalize_location, BlockTransform};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A blockstate definition from blockstates/*.json.
#[derive(Debug, Clone)]
pub enum BlockstateDefinition {
    /// Variant keys (`"facing=north,lit=true"`) mapped to weighted models,
    /// in document order.
    Variants(Vec<(String, Vec<ModelVariant>)>),
    /// Multipart: conditional model application.
    Multipart(Vec<MultipartCase>),
}

impl BlockstateDefinition {
    /// Every model variant the definition can produce, in document order.
    pub fn all_variants(&self) -> Vec<&ModelVariant> {
        match self {
            BlockstateDefinition::Variants(entries) => {
                entries.iter().flat_map(|(_, list)| list.iter()).collect()
            }
            BlockstateDefinition::Multipart(cases) => {
                cases.iter().flat_map(|case| case.apply.variants()).collect()
            }
        }
    }

    /// Weighted model list for an exact variant key.
    pub fn variant(&self, key: &str) -> Option<&[ModelVariant]> {
        match self {
            BlockstateDefinition::Variants(entries) => entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, list)| list.as_slice()),
            BlockstateDefinition::Multipart(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for BlockstateDefinition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawBlockstate {
            variants: Option<serde_json::Map<String, Value>>,
            multipart: Option<Vec<MultipartCase>>,
        }

        let raw = RawBlockstate::deserialize(deserializer)?;

        if let Some(variants) = raw.variants {
            let parsed = variants
                .into_iter()
                .map(|(key, value)| {
                    let list = serde_json::from_value::<ApplyValue>(value)
                        .map_err(|e| de::Error::custom(format!("variant '{}': {}", key, e)))?;
                    Ok((key, list.into_vec()))
                })
                .collect::<Result<Vec<_>, D::Error>>()?;
            Ok(BlockstateDefinition::Variants(parsed))
        } else if let Some(multipart) = raw.multipart {
            Ok(BlockstateDefinition::Multipart(multipart))
        } else {
            Ok(BlockstateDefinition::Variants(Vec::new()))
        }
    }
}

/// A model variant reference with optional rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelVariant {
    /// Model resource location (e.g., "block/stone" or "minecraft:block/stone").
    pub model: String,
    /// X rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub x: i32,
    /// Y rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub y: i32,
    /// If true, UV coordinates don't rotate with the block. Parsed but not
    /// applied when baking.
    #[serde(default)]
    pub uvlock: bool,
    /// Weight for random selection (default 1).
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

impl ModelVariant {
    /// Get the full resource location for the model.
    pub fn model_location(&self) -> String {
        normalize_location(&self.model)
    }

    /// The variant rotation.
    pub fn transform(&self) -> BlockTransform {
        BlockTransform::new(self.x, self.y)
    }
}

/// A multipart case with optional condition.
///
/// The condition stays raw JSON; it is compiled against a block's state
/// graph by the selector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultipartCase {
    /// Condition for when this case applies.
    #[serde(default)]
    pub when: Option<Value>,
    /// Model(s) to apply when condition is met.
    pub apply: ApplyValue,
}

/// One model or a weighted list of them, as found under a variant key or
/// a multipart `apply`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ApplyValue {
    Single(ModelVariant),
    Multiple(Vec<ModelVariant>),
}

impl ApplyValue {
    pub fn variants(&self) -> Vec<&ModelVariant> {
        match self {
            ApplyValue::Single(v) => vec![v],
            ApplyValue::Multiple(v) => v.iter().collect(),
        }
    }

    pub fn to_vec(&self) -> Vec<ModelVariant> {
        self.clone().into_vec()
    }

    pub fn into_vec(self) -> Vec<ModelVariant> {
        match self {
            ApplyValue::Single(v) => vec![v],
            ApplyValue::Multiple(v) => v,
        }
    }
}
