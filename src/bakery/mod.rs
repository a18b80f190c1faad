//! Turning registered block types into drawable geometry.
//!
//! [`ModelBakery::bake`] runs the whole pipeline: state graphs, selector
//! compilation, model loading, atlas packing and quad baking. Everything it
//! builds is owned by the returned [`BakedBlocks`]; reloading means baking
//! again.

pub mod element;
pub mod quad;
pub mod tint;

pub use element::{bake_model, missing_model, FACE_CORNERS};
pub use quad::{BakedModel, BakedQuad, BakedVertex, WeightedModel};
pub use tint::{TintColors, TintProvider};

use crate::atlas::{TextureAtlas, DEFAULT_MAX_ATLAS_SIZE};
use crate::error::Result;
use crate::registry::BlockRegistry;
use crate::resolver::{ModelCache, ModelId, Selection, VariantSelector};
use crate::resource_pack::{ModelVariant, ResourcePack};
use crate::state::{StateGraph, StateId};
use crate::types::{normalize_location, BlockTransform};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

/// Configuration for a bake.
#[derive(Debug, Clone)]
pub struct BakeryConfig {
    /// Largest atlas width or height, in pixels.
    pub atlas_max_size: u32,
    pub tint_provider: TintProvider,
}

impl Default for BakeryConfig {
    fn default() -> Self {
        Self {
            atlas_max_size: DEFAULT_MAX_ATLAS_SIZE,
            tint_provider: TintProvider::default(),
        }
    }
}

impl BakeryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_atlas_max_size(mut self, size: u32) -> Self {
        self.atlas_max_size = size;
        self
    }

    pub fn with_tint_provider(mut self, provider: TintProvider) -> Self {
        self.tint_provider = provider;
        self
    }

    /// Use the tint colors of a biome.
    pub fn with_biome(self, biome: &str) -> Self {
        self.with_tint_provider(TintProvider::for_biome(biome))
    }
}

/// A variant whose model has been loaded (or failed to load).
#[derive(Debug, Clone, Copy)]
struct UnbakedVariant {
    model: Option<ModelId>,
    transform: BlockTransform,
    weight: u32,
}

#[derive(Debug, Clone)]
enum Unbaked {
    Missing,
    Variant(Vec<UnbakedVariant>),
    MultiPart(Vec<Vec<UnbakedVariant>>),
}

/// Baked models of every state of one block type.
#[derive(Debug, Clone)]
pub struct BakedBlock {
    pub graph: StateGraph,
    models: Vec<Arc<BakedModel>>,
}

impl BakedBlock {
    /// Model for a state, indexed like the graph's states.
    pub fn model(&self, state: StateId) -> Option<&Arc<BakedModel>> {
        self.models.get(state.index())
    }
}

/// Result of a bake: the atlas plus a model for every registered state.
#[derive(Debug, Clone)]
pub struct BakedBlocks {
    pub atlas: TextureAtlas,
    blocks: BTreeMap<String, BakedBlock>,
    missing: Arc<BakedModel>,
    missing_states: usize,
    distinct_models: usize,
}

impl BakedBlocks {
    /// Baked data for a block type (`stone` or `minecraft:stone`).
    pub fn block(&self, name: &str) -> Option<&BakedBlock> {
        self.blocks.get(&normalize_location(name))
    }

    /// Model for a state, or the missing model if the block or state is unknown.
    pub fn model(&self, block: &str, state: StateId) -> &BakedModel {
        self.block(block)
            .and_then(|b| b.model(state))
            .unwrap_or(&self.missing)
    }

    /// The full-cube placeholder model.
    pub fn missing_model(&self) -> &BakedModel {
        &self.missing
    }

    /// Block type names in bake order.
    pub fn block_names(&self) -> impl Iterator<Item = &str> {
        self.blocks.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Total number of states across all block types.
    pub fn state_count(&self) -> usize {
        self.blocks.values().map(|b| b.graph.len()).sum()
    }

    /// States that bake to the missing model because nothing was selected.
    pub fn missing_state_count(&self) -> usize {
        self.missing_states
    }

    /// Distinct `(model, rotation, tint)` combinations that were baked.
    pub fn distinct_model_count(&self) -> usize {
        self.distinct_models
    }
}

/// Bakes every block type of a registry against one resource pack.
pub struct ModelBakery<'a> {
    pack: &'a ResourcePack,
    config: BakeryConfig,
}

impl<'a> ModelBakery<'a> {
    pub fn new(pack: &'a ResourcePack, config: BakeryConfig) -> Self {
        Self { pack, config }
    }

    pub fn config(&self) -> &BakeryConfig {
        &self.config
    }

    /// Bake every block type in `registry`.
    ///
    /// State graph and atlas failures abort the bake. A block type whose
    /// blockstate is absent or does not compile bakes every state as the
    /// missing model; a model that fails to load does the same for the
    /// variants that use it.
    pub fn bake(&self, registry: &BlockRegistry) -> Result<BakedBlocks> {
        let mut cache = ModelCache::new(self.pack);
        let mut loaded: HashMap<String, Option<ModelId>> = HashMap::new();
        let mut collected: HashSet<ModelId> = HashSet::new();
        let mut textures: BTreeSet<String> = BTreeSet::new();
        let mut missing_states = 0;

        let mut unbaked: Vec<(StateGraph, Vec<Unbaked>)> = Vec::with_capacity(registry.len());
        for block in registry.iter_sorted() {
            let graph = block.state_graph()?;
            let selector = self.compile_selector(&graph);

            let mut states = Vec::with_capacity(graph.len());
            for state in graph.states() {
                let selection = selector.as_ref().and_then(|s| s.select(&graph, state));
                let entry = match selection {
                    None => {
                        if selector.is_some() {
                            log::debug!("no variant matches {}", graph.describe(state));
                        }
                        missing_states += 1;
                        Unbaked::Missing
                    }
                    Some(Selection::Variant(list)) => {
                        Unbaked::Variant(self.load_variants(list, &mut cache, &mut loaded))
                    }
                    Some(Selection::MultiPart(parts)) => Unbaked::MultiPart(
                        parts
                            .into_iter()
                            .map(|list| self.load_variants(list, &mut cache, &mut loaded))
                            .collect(),
                    ),
                };
                states.push(entry);
            }
            unbaked.push((graph, states));
        }

        for id in loaded.values().flatten() {
            if collected.insert(*id) {
                textures.extend(cache.model(*id).texture_dependencies());
            }
        }
        log::info!(
            "resolved {} block types, {} models, {} textures",
            unbaked.len(),
            cache.len(),
            textures.len()
        );

        let atlas = TextureAtlas::pack(&textures, self.pack, self.config.atlas_max_size)?;
        log::info!(
            "packed atlas {}x{} with {} sprites",
            atlas.width,
            atlas.height,
            atlas.sprite_count()
        );

        let missing = Arc::new(missing_model(&atlas));
        let mut baked: HashMap<(ModelId, BlockTransform, [u32; 4]), Arc<BakedModel>> =
            HashMap::new();
        let mut blocks = BTreeMap::new();

        for (graph, states) in unbaked {
            let mut models = Vec::with_capacity(states.len());
            for (state, entry) in graph.states().zip(states) {
                let tint = self.config.tint_provider.get_tint(&graph, state, 0);
                let mut bake_variant = |variant: &UnbakedVariant| -> Arc<BakedModel> {
                    let Some(id) = variant.model else {
                        return missing.clone();
                    };
                    baked
                        .entry((id, variant.transform, tint.map(f32::to_bits)))
                        .or_insert_with(|| {
                            Arc::new(bake_model(cache.model(id), variant.transform, &atlas, tint))
                        })
                        .clone()
                };

                let model = match entry {
                    Unbaked::Missing => missing.clone(),
                    Unbaked::Variant(list) => assemble(&list, &mut bake_variant),
                    Unbaked::MultiPart(parts) => Arc::new(BakedModel::MultiPart(
                        parts
                            .iter()
                            .map(|list| assemble(list, &mut bake_variant))
                            .collect(),
                    )),
                };
                models.push(model);
            }
            blocks.insert(graph.owner().to_string(), BakedBlock { graph, models });
        }

        let result = BakedBlocks {
            atlas,
            blocks,
            missing,
            missing_states,
            distinct_models: baked.len(),
        };
        log::info!(
            "baked {} states of {} block types ({} distinct models, {} missing)",
            result.state_count(),
            result.len(),
            result.distinct_model_count(),
            result.missing_state_count()
        );
        Ok(result)
    }

    fn compile_selector(&self, graph: &StateGraph) -> Option<VariantSelector> {
        let Some(definition) = self.pack.get_blockstate(graph.owner()) else {
            log::warn!("no blockstate for {}, using missing model", graph.owner());
            return None;
        };
        match VariantSelector::compile(definition, graph) {
            Ok(selector) => Some(selector),
            Err(e) => {
                log::warn!("{}: {}, using missing model", graph.owner(), e);
                None
            }
        }
    }

    fn load_variants(
        &self,
        list: &[ModelVariant],
        cache: &mut ModelCache<'_>,
        loaded: &mut HashMap<String, Option<ModelId>>,
    ) -> Vec<UnbakedVariant> {
        list.iter()
            .map(|variant| {
                let location = variant.model_location();
                let model = *loaded.entry(location).or_insert_with_key(|location| {
                    match cache.get_model(location) {
                        Ok(id) => Some(id),
                        Err(e) => {
                            log::warn!("{}, using missing model", e);
                            None
                        }
                    }
                });
                UnbakedVariant {
                    model,
                    transform: variant.transform(),
                    weight: variant.weight,
                }
            })
            .collect()
    }
}

/// One variant bakes to its model directly; several become a weighted set.
fn assemble<F>(list: &[UnbakedVariant], bake_variant: &mut F) -> Arc<BakedModel>
where
    F: FnMut(&UnbakedVariant) -> Arc<BakedModel>,
{
    if let [single] = list {
        return bake_variant(single);
    }
    Arc::new(BakedModel::Weighted(
        list.iter()
            .map(|variant| WeightedModel {
                weight: variant.weight,
                model: bake_variant(variant),
            })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource_pack::{BlockModel, BlockstateDefinition, TextureData};
    use crate::state::Property;
    use crate::types::Direction;

    fn add_json_model(pack: &mut ResourcePack, path: &str, json: &str) {
        let model: BlockModel = serde_json::from_str(json).unwrap();
        pack.add_model("minecraft", path, model);
    }

    fn add_blockstate(pack: &mut ResourcePack, id: &str, json: &str) {
        let def: BlockstateDefinition = serde_json::from_str(json).unwrap();
        pack.add_blockstate("minecraft", id, def);
    }

    fn test_pack() -> ResourcePack {
        let mut pack = ResourcePack::new();
        add_json_model(
            &mut pack,
            "block/cube_all",
            r##"{
                "elements": [{
                    "from": [0, 0, 0], "to": [16, 16, 16],
                    "faces": {
                        "down":  { "texture": "#all", "cullface": "down" },
                        "up":    { "texture": "#all", "cullface": "up", "tintindex": 0 },
                        "north": { "texture": "#all", "cullface": "north" },
                        "south": { "texture": "#all", "cullface": "south" },
                        "west":  { "texture": "#all", "cullface": "west" },
                        "east":  { "texture": "#all", "cullface": "east" }
                    }
                }]
            }"##,
        );
        add_json_model(
            &mut pack,
            "block/stone",
            r#"{ "parent": "block/cube_all", "textures": { "all": "block/stone" } }"#,
        );
        add_json_model(
            &mut pack,
            "block/stone_mirrored",
            r#"{ "parent": "block/cube_all", "textures": { "all": "block/stone" } }"#,
        );
        add_json_model(
            &mut pack,
            "block/grass_block",
            r#"{ "parent": "block/cube_all", "textures": { "all": "block/grass" } }"#,
        );
        pack.add_texture("minecraft", "block/stone", TextureData::placeholder());
        pack.add_texture("minecraft", "block/grass", TextureData::placeholder());

        add_blockstate(
            &mut pack,
            "stone",
            r#"{ "variants": { "": [
                { "model": "block/stone", "weight": 3 },
                { "model": "block/stone_mirrored", "weight": 1 }
            ] } }"#,
        );
        add_blockstate(
            &mut pack,
            "furnace",
            r#"{ "variants": {
                "facing=north": { "model": "block/stone" },
                "facing=east": { "model": "block/stone", "y": 90 },
                "facing=south": { "model": "block/nonexistent" }
            } }"#,
        );
        add_blockstate(
            &mut pack,
            "grass_block",
            r#"{ "variants": { "": { "model": "block/grass_block" } } }"#,
        );
        add_blockstate(
            &mut pack,
            "post",
            r#"{ "multipart": [
                { "apply": { "model": "block/stone" } },
                { "when": { "lit": "true" }, "apply": { "model": "block/grass_block" } }
            ] }"#,
        );
        add_blockstate(
            &mut pack,
            "broken",
            r#"{ "variants": { "power=1": { "model": "block/stone" } } }"#,
        );
        pack
    }

    fn test_registry() -> BlockRegistry {
        let mut registry = BlockRegistry::new();
        registry.register("stone", vec![]).unwrap();
        registry.register("grass_block", vec![]).unwrap();
        registry
            .register(
                "furnace",
                vec![Property::new("facing", ["north", "south", "west", "east"]).unwrap()],
            )
            .unwrap();
        registry
            .register("post", vec![Property::new("lit", ["false", "true"]).unwrap()])
            .unwrap();
        // Declares no `power`, so its blockstate does not compile.
        registry.register("broken", vec![]).unwrap();
        registry
    }

    fn bake() -> BakedBlocks {
        let pack = test_pack();
        ModelBakery::new(&pack, BakeryConfig::default())
            .bake(&test_registry())
            .unwrap()
    }

    fn is_missing(blocks: &BakedBlocks, model: &BakedModel) -> bool {
        std::ptr::eq(model, blocks.missing_model())
    }

    #[test]
    fn test_every_state_has_a_model() {
        let blocks = bake();
        assert_eq!(blocks.len(), 5);
        assert_eq!(blocks.state_count(), 1 + 1 + 4 + 2 + 1);
        let names: Vec<_> = blocks.block_names().collect();
        assert_eq!(
            names,
            vec![
                "minecraft:broken",
                "minecraft:furnace",
                "minecraft:grass_block",
                "minecraft:post",
                "minecraft:stone"
            ]
        );
    }

    #[test]
    fn test_weighted_variants() {
        let blocks = bake();
        let block = blocks.block("stone").unwrap();
        let model = blocks.model("stone", block.graph.default_state());
        match model {
            BakedModel::Weighted(entries) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].weight, 3);
                assert_eq!(entries[1].weight, 1);
            }
            other => panic!("expected weighted model, got {:?}", other),
        }
        assert_eq!(model.quads(Some(Direction::Up)).len(), 1);
    }

    #[test]
    fn test_rotated_variant_and_missing_states() {
        let blocks = bake();
        let graph = &blocks.block("furnace").unwrap().graph;

        let east = graph.find([("facing", "east")]).unwrap();
        let model = blocks.model("furnace", east);
        assert!(!is_missing(&blocks, model));
        assert_eq!(model.quads(Some(Direction::East))[0].direction, Direction::East);

        // A model that fails to load and a state with no variant both bake as missing.
        let south = graph.find([("facing", "south")]).unwrap();
        assert!(is_missing(&blocks, blocks.model("furnace", south)));
        let west = graph.find([("facing", "west")]).unwrap();
        assert!(is_missing(&blocks, blocks.model("furnace", west)));
    }

    #[test]
    fn test_failed_selector_is_isolated() {
        let blocks = bake();
        let graph = &blocks.block("broken").unwrap().graph;
        assert!(is_missing(&blocks, blocks.model("broken", graph.default_state())));
        // Other blocks still bake.
        let stone = blocks.block("stone").unwrap().graph.default_state();
        assert!(!is_missing(&blocks, blocks.model("stone", stone)));
    }

    #[test]
    fn test_unknown_block_falls_back() {
        let blocks = bake();
        let state = blocks.block("stone").unwrap().graph.default_state();
        assert!(is_missing(&blocks, blocks.model("nope", state)));
    }

    #[test]
    fn test_multipart_parts() {
        let blocks = bake();
        let graph = &blocks.block("post").unwrap().graph;

        match blocks.model("post", graph.default_state()) {
            BakedModel::MultiPart(parts) => assert_eq!(parts.len(), 1),
            other => panic!("expected multipart, got {:?}", other),
        }
        let lit = graph.find([("lit", "true")]).unwrap();
        let model = blocks.model("post", lit);
        match model {
            BakedModel::MultiPart(parts) => assert_eq!(parts.len(), 2),
            other => panic!("expected multipart, got {:?}", other),
        }
        assert_eq!(model.quads(Some(Direction::Down)).len(), 2);
    }

    #[test]
    fn test_tint_applied_to_grass() {
        let blocks = bake();
        let state = blocks.block("grass_block").unwrap().graph.default_state();
        let model = blocks.model("grass_block", state);
        let up = model.quads(Some(Direction::Up))[0];
        assert_eq!(up.vertices[0].color, TintColors::default().grass);
        let down = model.quads(Some(Direction::Down))[0];
        assert_eq!(down.vertices[0].color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_shared_models_are_memoized() {
        let blocks = bake();
        let state = blocks.block("stone").unwrap().graph.default_state();
        let stone = match blocks.model("stone", state) {
            BakedModel::Weighted(entries) => entries[0].model.clone(),
            other => panic!("expected weighted model, got {:?}", other),
        };
        let graph = &blocks.block("furnace").unwrap().graph;
        let north = graph.find([("facing", "north")]).unwrap();
        let furnace = blocks.block("furnace").unwrap().model(north).unwrap();
        assert!(Arc::ptr_eq(&stone, furnace));
    }

    #[test]
    fn test_atlas_contains_dependencies() {
        let blocks = bake();
        assert!(blocks.atlas.contains("minecraft:block/stone"));
        assert!(blocks.atlas.contains("minecraft:block/grass"));
        assert_eq!(blocks.atlas.sprite_count(), 3);
    }

    #[test]
    fn test_atlas_limit_is_fatal() {
        let pack = test_pack();
        let config = BakeryConfig::default().with_atlas_max_size(16);
        let result = ModelBakery::new(&pack, config).bake(&test_registry());
        assert!(matches!(
            result,
            Err(crate::error::BakeryError::PackingFailed(_))
        ));
    }
}
