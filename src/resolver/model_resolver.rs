//! Model inheritance resolution.
//!
//! Models are loaded into an arena owned by [`ModelCache`]. A document
//! refers to its parent by [`ModelId`]; parents are always loaded before
//! their children, so the arena never contains a cycle. Inherited values
//! are looked up through [`ModelRef`] rather than merged eagerly.

use crate::error::{BakeryError, Result};
use crate::resource_pack::{ModelElement, ResourcePack};
use crate::types::{normalize_location, split_location, MISSING_TEXTURE};
use std::collections::{HashMap, HashSet};

/// Index of a model document inside its cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(usize);

impl ModelId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One loaded model, with its parent linked by id.
#[derive(Debug, Clone)]
pub struct ModelDocument {
    /// Normalized resource location.
    pub name: String,
    pub ambient_occlusion: bool,
    pub parent: Option<ModelId>,
    pub elements: Vec<ModelElement>,
    pub textures: HashMap<String, String>,
}

/// Memoized arena of model documents.
pub struct ModelCache<'a> {
    pack: &'a ResourcePack,
    documents: Vec<ModelDocument>,
    by_name: HashMap<String, ModelId>,
}

impl<'a> ModelCache<'a> {
    pub fn new(pack: &'a ResourcePack) -> Self {
        Self {
            pack,
            documents: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Load a model and its parent chain, returning the cached id.
    pub fn get_model(&mut self, name: &str) -> Result<ModelId> {
        let mut loading = Vec::new();
        self.load(&normalize_location(name), &mut loading)
    }

    fn load(&mut self, location: &str, loading: &mut Vec<String>) -> Result<ModelId> {
        if let Some(&id) = self.by_name.get(location) {
            return Ok(id);
        }
        if loading.iter().any(|l| l == location) {
            return Err(BakeryError::ModelResolution(format!(
                "parent cycle: {} -> {}",
                loading.join(" -> "),
                location
            )));
        }

        let pack = self.pack;
        let model = pack.get_model(location).ok_or_else(|| {
            BakeryError::ModelResolution(format!("model not found: {}", location))
        })?;

        let parent = match &model.parent {
            Some(parent) if !is_builtin(parent) => {
                loading.push(location.to_string());
                let parent = self.load(&normalize_location(parent), loading);
                loading.pop();
                Some(parent?)
            }
            _ => None,
        };

        let id = ModelId(self.documents.len());
        self.documents.push(ModelDocument {
            name: location.to_string(),
            ambient_occlusion: model.ambient_occlusion,
            parent,
            elements: model.elements.clone(),
            textures: model.textures.clone(),
        });
        self.by_name.insert(location.to_string(), id);
        Ok(id)
    }

    /// View a loaded model with inheritance applied.
    pub fn model(&self, id: ModelId) -> ModelRef<'_> {
        ModelRef { cache: self, id }
    }

    pub fn document(&self, id: ModelId) -> &ModelDocument {
        &self.documents[id.0]
    }

    /// Number of loaded documents, parents included.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn is_builtin(location: &str) -> bool {
    split_location(location).1.starts_with("builtin/")
}

/// A cached model viewed through its parent chain.
#[derive(Clone, Copy)]
pub struct ModelRef<'c> {
    cache: &'c ModelCache<'c>,
    id: ModelId,
}

impl<'c> ModelRef<'c> {
    pub fn id(&self) -> ModelId {
        self.id
    }

    pub fn name(&self) -> &'c str {
        &self.document().name
    }

    pub fn document(&self) -> &'c ModelDocument {
        self.cache.document(self.id)
    }

    pub fn parent(&self) -> Option<ModelRef<'c>> {
        self.document().parent.map(|id| self.cache.model(id))
    }

    /// Own elements when present, otherwise the nearest ancestor's.
    pub fn elements(&self) -> &'c [ModelElement] {
        let document = self.document();
        if !document.elements.is_empty() {
            return &document.elements;
        }
        match self.parent() {
            Some(parent) => parent.elements(),
            None => &[],
        }
    }

    /// Ambient occlusion flag. Whenever a parent exists its value is used,
    /// even if this document sets the flag itself.
    pub fn ambient_occlusion(&self) -> bool {
        match self.parent() {
            Some(parent) => parent.ambient_occlusion(),
            None => self.document().ambient_occlusion,
        }
    }

    /// Resolve a face texture to a resource location.
    ///
    /// `#all` is followed through the variable chain, looking each hop up
    /// on this model first, then its ancestors. A name without `#` is
    /// already a texture location. Cycles and dangling references resolve
    /// to [`MISSING_TEXTURE`].
    pub fn texture(&self, name: &str) -> String {
        let Some(mut key) = name.strip_prefix('#') else {
            return normalize_location(name);
        };
        let mut visited: HashSet<&str> = HashSet::new();

        loop {
            if !visited.insert(key) {
                log::warn!(
                    "{}: texture reference cycle through '#{}'",
                    self.name(),
                    key
                );
                return MISSING_TEXTURE.to_string();
            }

            match self.lookup_variable(key) {
                Some(value) => match value.strip_prefix('#') {
                    Some(next) => key = next,
                    None => return normalize_location(value),
                },
                None => {
                    log::warn!("{}: unresolved texture '#{}'", self.name(), key);
                    return MISSING_TEXTURE.to_string();
                }
            }
        }
    }

    fn lookup_variable(&self, key: &str) -> Option<&'c str> {
        let mut current = Some(*self);
        while let Some(model) = current {
            if let Some(value) = model.document().textures.get(key) {
                return Some(value.as_str());
            }
            current = model.parent();
        }
        None
    }

    /// Resolved texture of every face of every element, first use first.
    pub fn texture_dependencies(&self) -> Vec<String> {
        let mut textures: Vec<String> = Vec::new();
        for element in self.elements() {
            for face in element.faces.values() {
                let texture = self.texture(&face.texture);
                if !textures.contains(&texture) {
                    textures.push(texture);
                }
            }
        }
        textures
    }
}

impl std::fmt::Debug for ModelRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}
