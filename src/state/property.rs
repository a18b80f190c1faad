//! Named, ordered enumerations of block property values.

use crate::error::{BakeryError, Result};

/// A block property such as `facing` with its possible values.
///
/// Values keep declaration order; the first value is the property's default
/// and enumeration order of the state graph follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    name: String,
    values: Vec<String>,
}

impl Property {
    /// Create a property. Duplicate values are dropped (first occurrence wins);
    /// an empty value list is rejected.
    pub fn new<N, I, V>(name: N, values: I) -> Result<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let name = name.into();
        let mut unique: Vec<String> = Vec::new();
        for value in values {
            let value = value.into();
            if !unique.contains(&value) {
                unique.push(value);
            }
        }

        if name.is_empty() {
            return Err(BakeryError::ConfigParse(
                "property with an empty name".to_string(),
            ));
        }
        if unique.is_empty() {
            return Err(BakeryError::ConfigParse(format!(
                "property '{}' declares no values",
                name
            )));
        }

        Ok(Self {
            name,
            values: unique,
        })
    }

    /// Property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Values in declaration order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the property has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Position of `value` in the declaration order.
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }

    /// Value at `index`.
    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(|s| s.as_str())
    }
}
