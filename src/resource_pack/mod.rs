//! Resource pack contents.
//!
//! A pack is four namespaced asset maps: block property declarations,
//! blockstates, models and textures. [`loader`] fills them from a ZIP
//! archive or a directory.

pub mod block;
pub mod blockstate;
pub mod loader;
pub mod model;
pub mod texture;

pub use block::BlockDefinition;
pub use blockstate::{ApplyValue, BlockstateDefinition, ModelVariant, MultipartCase};
pub use model::{BlockModel, ModelElement, ModelFace};
pub use texture::TextureData;

use crate::types::split_location;
use std::collections::HashMap;

/// Assets of one kind keyed by namespace, then by path within it.
#[derive(Debug, Clone)]
pub struct AssetMap<T> {
    entries: HashMap<String, HashMap<String, T>>,
}

impl<T> Default for AssetMap<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> AssetMap<T> {
    /// Look up `namespace:path`; a bare path means the `minecraft` namespace.
    pub fn get(&self, resource_location: &str) -> Option<&T> {
        let (namespace, path) = split_location(resource_location);
        self.entries.get(namespace)?.get(path)
    }

    pub fn get_mut(&mut self, resource_location: &str) -> Option<&mut T> {
        let (namespace, path) = split_location(resource_location);
        self.entries.get_mut(namespace)?.get_mut(path)
    }

    /// Insert an asset, replacing any previous one at the same location.
    pub fn insert(&mut self, namespace: &str, path: &str, asset: T) {
        self.entries
            .entry(namespace.to_string())
            .or_default()
            .insert(path.to_string(), asset);
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Full `namespace:path` locations, sorted.
    pub fn locations(&self) -> Vec<String> {
        let mut locations: Vec<String> = self
            .entries
            .iter()
            .flat_map(|(ns, assets)| assets.keys().map(move |path| format!("{}:{}", ns, path)))
            .collect();
        locations.sort();
        locations
    }

    fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// A loaded resource pack.
#[derive(Debug, Default, Clone)]
pub struct ResourcePack {
    /// `blocks/*.json` property declarations.
    pub blocks: AssetMap<BlockDefinition>,
    /// `blockstates/*.json`, keyed by block id.
    pub blockstates: AssetMap<BlockstateDefinition>,
    /// `models/**.json`, keyed by path without extension.
    pub models: AssetMap<BlockModel>,
    /// `textures/**.png`, keyed by path without extension.
    pub textures: AssetMap<TextureData>,
}

impl ResourcePack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_block(&self, resource_location: &str) -> Option<&BlockDefinition> {
        self.blocks.get(resource_location)
    }

    pub fn get_blockstate(&self, resource_location: &str) -> Option<&BlockstateDefinition> {
        self.blockstates.get(resource_location)
    }

    pub fn get_model(&self, resource_location: &str) -> Option<&BlockModel> {
        self.models.get(resource_location)
    }

    pub fn get_texture(&self, resource_location: &str) -> Option<&TextureData> {
        self.textures.get(resource_location)
    }

    pub fn add_block(&mut self, namespace: &str, block_id: &str, definition: BlockDefinition) {
        self.blocks.insert(namespace, block_id, definition);
    }

    pub fn add_blockstate(
        &mut self,
        namespace: &str,
        block_id: &str,
        definition: BlockstateDefinition,
    ) {
        self.blockstates.insert(namespace, block_id, definition);
    }

    pub fn add_model(&mut self, namespace: &str, model_path: &str, model: BlockModel) {
        self.models.insert(namespace, model_path, model);
    }

    pub fn add_texture(&mut self, namespace: &str, texture_path: &str, texture: TextureData) {
        self.textures.insert(namespace, texture_path, texture);
    }

    /// Full resource locations of every block with a blockstate, sorted.
    pub fn block_names(&self) -> Vec<String> {
        self.blockstates.locations()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn blockstate_count(&self) -> usize {
        self.blockstates.len()
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Every namespace that contributes at least one asset, sorted.
    pub fn namespaces(&self) -> Vec<&str> {
        let mut namespaces: Vec<&str> = self
            .blocks
            .namespaces()
            .chain(self.blockstates.namespaces())
            .chain(self.models.namespaces())
            .chain(self.textures.namespaces())
            .collect();
        namespaces.sort_unstable();
        namespaces.dedup();
        namespaces
    }
}
