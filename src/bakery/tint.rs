//! Tint colors for faces with a `tintindex`.
//!
//! Grass, foliage and water take a fixed per-biome color; redstone wire
//! and stems read their color from the state being baked.

use crate::state::{StateGraph, StateId};
use crate::types::split_location;

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Tint colors for different block categories.
#[derive(Debug, Clone, PartialEq)]
pub struct TintColors {
    pub grass: [f32; 4],
    pub foliage: [f32; 4],
    pub water: [f32; 4],
    /// Redstone dust colors by power level (0-15).
    pub redstone: [[f32; 4]; 16],
    /// Stem colors by growth stage (0-7).
    pub stem: [[f32; 4]; 8],
    pub lily_pad: [f32; 4],
}

impl Default for TintColors {
    fn default() -> Self {
        Self {
            // Plains biome.
            grass: [0.56, 0.74, 0.35, 1.0],
            foliage: [0.47, 0.66, 0.23, 1.0],
            water: [0.247, 0.463, 0.894, 1.0],
            redstone: Self::default_redstone_colors(),
            stem: Self::default_stem_colors(),
            lily_pad: [0.13, 0.55, 0.13, 1.0],
        }
    }
}

impl TintColors {
    /// Colors for a biome name, with or without namespace. Unknown biomes
    /// keep the plains colors.
    pub fn for_biome(biome: &str) -> Self {
        let mut colors = Self::default();

        match split_location(biome).1 {
            "swamp" | "mangrove_swamp" => {
                colors.grass = [0.41, 0.55, 0.27, 1.0];
                colors.foliage = [0.41, 0.55, 0.27, 1.0];
                colors.water = [0.38, 0.48, 0.27, 1.0];
            }
            "badlands" | "wooded_badlands" | "eroded_badlands" => {
                colors.grass = [0.56, 0.50, 0.30, 1.0];
                colors.foliage = [0.62, 0.56, 0.35, 1.0];
            }
            "jungle" | "bamboo_jungle" | "sparse_jungle" => {
                colors.grass = [0.35, 0.75, 0.15, 1.0];
                colors.foliage = [0.30, 0.72, 0.20, 1.0];
            }
            "dark_forest" => {
                colors.grass = [0.31, 0.55, 0.20, 1.0];
                colors.foliage = [0.31, 0.55, 0.20, 1.0];
            }
            "desert" => {
                colors.grass = [0.75, 0.72, 0.45, 1.0];
                colors.foliage = [0.68, 0.68, 0.40, 1.0];
            }
            "frozen_ocean" | "deep_frozen_ocean" => {
                colors.water = [0.24, 0.30, 0.60, 1.0];
            }
            _ => {}
        }

        colors
    }

    fn default_redstone_colors() -> [[f32; 4]; 16] {
        let mut colors = [[0.0; 4]; 16];
        for (power, color) in colors.iter_mut().enumerate() {
            let brightness = power as f32 / 15.0;
            *color = [0.3 + brightness * 0.7, brightness * 0.1, brightness * 0.1, 1.0];
        }
        colors
    }

    fn default_stem_colors() -> [[f32; 4]; 8] {
        let mut colors = [[0.0; 4]; 8];
        for (stage, color) in colors.iter_mut().enumerate() {
            let t = stage as f32 / 7.0;
            *color = [0.2 + t * 0.6, 0.7 - t * 0.2, 0.1, 1.0];
        }
        colors
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TintCategory {
    Grass,
    Foliage,
    Water,
    Redstone,
    Stem,
    LilyPad,
    None,
}

/// Picks the tint color of a face from its block type and state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TintProvider {
    colors: TintColors,
}

impl TintProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_colors(colors: TintColors) -> Self {
        Self { colors }
    }

    pub fn for_biome(biome: &str) -> Self {
        Self {
            colors: TintColors::for_biome(biome),
        }
    }

    pub fn colors(&self) -> &TintColors {
        &self.colors
    }

    /// Color for a face of `state`. White when `tint_index` is negative or
    /// the block type is not tinted.
    pub fn get_tint(&self, graph: &StateGraph, state: StateId, tint_index: i32) -> [f32; 4] {
        if tint_index < 0 {
            return WHITE;
        }

        let block_id = split_location(graph.owner()).1;
        match categorize_block(block_id) {
            TintCategory::Grass => self.colors.grass,
            TintCategory::Foliage => self.colors.foliage,
            TintCategory::Water => self.colors.water,
            TintCategory::Redstone => {
                let power = numeric_value(graph, state, "power").min(15);
                self.colors.redstone[power]
            }
            TintCategory::Stem if block_id.starts_with("attached_") => self.colors.stem[7],
            TintCategory::Stem => {
                let age = numeric_value(graph, state, "age").min(7);
                self.colors.stem[age]
            }
            TintCategory::LilyPad => self.colors.lily_pad,
            TintCategory::None => WHITE,
        }
    }
}

fn categorize_block(block_id: &str) -> TintCategory {
    match block_id {
        "grass_block" | "grass" | "short_grass" | "tall_grass" | "fern" | "large_fern"
        | "potted_fern" | "sugar_cane" => TintCategory::Grass,
        "vine" => TintCategory::Foliage,
        id if id.ends_with("_leaves") && !id.starts_with("azalea") => TintCategory::Foliage,
        "water" | "bubble_column" | "water_cauldron" => TintCategory::Water,
        "redstone_wire" => TintCategory::Redstone,
        "melon_stem" | "pumpkin_stem" | "attached_melon_stem" | "attached_pumpkin_stem" => {
            TintCategory::Stem
        }
        "lily_pad" => TintCategory::LilyPad,
        _ => TintCategory::None,
    }
}

/// Integer value of a property in `state`, 0 when absent or not a number.
fn numeric_value(graph: &StateGraph, state: StateId, property: &str) -> usize {
    graph
        .property(property)
        .and_then(|id| graph.value(state, id).parse().ok())
        .unwrap_or(0)
}
