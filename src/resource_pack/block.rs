//! Block definition parsing.
//!
//! A block definition from blocks/*.json declares the block's properties
//! and their values, both in declaration order:
//!
//! ```json
//! { "properties": { "facing": ["north", "south"], "lit": [false, true] } }
//! ```

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

/// Declared properties of one block type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockDefinition {
    /// `(property name, values)` in declaration order.
    pub properties: Vec<(String, Vec<String>)>,
}

impl<'de> Deserialize<'de> for BlockDefinition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawDefinition {
            #[serde(default)]
            properties: serde_json::Map<String, Value>,
        }

        let raw = RawDefinition::deserialize(deserializer)?;
        let mut properties = Vec::with_capacity(raw.properties.len());
        for (name, values) in raw.properties {
            let Value::Array(values) = values else {
                return Err(de::Error::custom(format!(
                    "property '{}' must list its values in an array",
                    name
                )));
            };
            let values = values
                .iter()
                .map(|v| {
                    scalar_to_string(v).ok_or_else(|| {
                        de::Error::custom(format!(
                            "property '{}' has a non-scalar value {}",
                            name, v
                        ))
                    })
                })
                .collect::<Result<Vec<_>, D::Error>>()?;
            properties.push((name, values));
        }
        Ok(Self { properties })
    }
}

/// String form of a JSON scalar as it appears in variant keys.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
