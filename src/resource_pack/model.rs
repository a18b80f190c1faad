//! Block model parsing.
//!
//! Block models define the geometry of blocks using cuboid elements.

use crate::types::{Direction, ElementRotation};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A parsed block model from models/*.json.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockModel {
    /// Parent model to inherit from.
    #[serde(default)]
    pub parent: Option<String>,

    /// Whether to use ambient occlusion.
    #[serde(default = "default_ao", rename = "ambientocclusion")]
    pub ambient_occlusion: bool,

    /// Texture variable definitions: a literal texture or `#other`.
    #[serde(default)]
    pub textures: HashMap<String, String>,

    /// Model elements (cuboids).
    #[serde(default)]
    pub elements: Vec<ModelElement>,
}

fn default_ao() -> bool {
    true
}

impl BlockModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self {
            ambient_occlusion: true,
            ..Self::default()
        }
    }
}

/// A cuboid element within a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelElement {
    /// Minimum corner (0-16 range).
    pub from: [f32; 3],
    /// Maximum corner (0-16 range).
    pub to: [f32; 3],
    /// Optional rotation.
    #[serde(default)]
    pub rotation: Option<ElementRotation>,
    /// Whether this element receives shade.
    #[serde(default = "default_shade")]
    pub shade: bool,
    /// Face definitions, iterated in direction order.
    #[serde(default)]
    pub faces: BTreeMap<Direction, ModelFace>,
}

fn default_shade() -> bool {
    true
}

impl ModelElement {
    /// UV rectangle a face gets when the model does not specify one.
    ///
    /// Top and bottom project onto X/Z; the sides project onto their
    /// horizontal axis and Y, mirrored so the texture reads upright from
    /// outside the block.
    pub fn default_uv(&self, direction: Direction) -> [f32; 4] {
        let [x1, y1, z1] = self.from;
        let [x2, y2, z2] = self.to;
        match direction {
            Direction::Down => [x1, 16.0 - z2, x2, 16.0 - z1],
            Direction::Up => [x1, z1, x2, z2],
            Direction::North => [16.0 - x2, 16.0 - y2, 16.0 - x1, 16.0 - y1],
            Direction::South => [x1, 16.0 - y2, x2, 16.0 - y1],
            Direction::West => [z1, 16.0 - y2, z2, 16.0 - y1],
            Direction::East => [16.0 - z2, 16.0 - y2, 16.0 - z1, 16.0 - y1],
        }
    }

    /// Minimum corner in block-local (0-1) coordinates.
    pub fn normalized_from(&self) -> [f32; 3] {
        self.from.map(|c| c / 16.0)
    }

    /// Maximum corner in block-local (0-1) coordinates.
    pub fn normalized_to(&self) -> [f32; 3] {
        self.to.map(|c| c / 16.0)
    }
}

/// A face of a model element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFace {
    /// UV coordinates [u1, v1, u2, v2] in 0-16 range.
    #[serde(default)]
    pub uv: Option<[f32; 4]>,
    /// Texture reference (e.g., "#side" or "block/stone").
    pub texture: String,
    /// Neighbor direction that hides this face when occupied.
    #[serde(default)]
    pub cullface: Option<Direction>,
    /// UV rotation as a quadrant shift (0-3); written in degrees in JSON.
    #[serde(default, rename = "rotation", deserialize_with = "deserialize_quadrant")]
    pub quadrant: u8,
    /// Tint index for biome coloring (-1 = no tint).
    #[serde(default = "default_tint_index")]
    pub tintindex: i32,
}

fn default_tint_index() -> i32 {
    -1
}

fn deserialize_quadrant<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let degrees = i32::deserialize(deserializer)?;
    match degrees {
        0 | 90 | 180 | 270 => Ok((degrees / 90) as u8),
        other => Err(serde::de::Error::custom(format!(
            "face rotation must be 0, 90, 180 or 270, got {}",
            other
        ))),
    }
}

impl ModelFace {
    /// A face with the given texture and no optional settings.
    pub fn new(texture: impl Into<String>) -> Self {
        Self {
            uv: None,
            texture: texture.into(),
            cullface: None,
            quadrant: 0,
            tintindex: -1,
        }
    }

    /// UV rectangle of this face on `element`, in 0-16 range.
    pub fn uv_on(&self, element: &ModelElement, direction: Direction) -> [f32; 4] {
        self.uv.unwrap_or_else(|| element.default_uv(direction))
    }

    /// Check if this face has a tint.
    pub fn has_tint(&self) -> bool {
        self.tintindex >= 0
    }
}
