//! # Block Bakery
//!
//! Turns the block definitions of a Minecraft-style resource pack into
//! render-ready geometry.
//!
//! ## Overview
//!
//! Every registered block type declares properties; their combinations form
//! a state graph. Each state is matched against the block's blockstate
//! document, the selected models are resolved through their parent chains,
//! all referenced textures are packed into one atlas, and each state gets a
//! baked model of textured quads bucketed by cull direction.
//!
//! ## Quick Start
//!
//! ```ignore
//! use block_bakery::{load_resource_pack, BakeryConfig, BlockRegistry, ModelBakery};
//!
//! let pack = load_resource_pack("path/to/pack.zip")?;
//! let registry = BlockRegistry::from_pack(&pack)?;
//!
//! let baked = ModelBakery::new(&pack, BakeryConfig::default()).bake(&registry)?;
//!
//! let furnace = baked.block("furnace").unwrap();
//! let lit = furnace.graph.find([("facing", "east"), ("lit", "true")])?;
//! for quad in baked.model("furnace", lit).quads(None) {
//!     // upload quad.vertices
//! }
//! std::fs::write("atlas.png", baked.atlas.to_png()?)?;
//! ```

pub mod atlas;
pub mod bakery;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod resource_pack;
pub mod state;
pub mod types;

// Re-export main types for convenience
pub use atlas::{Sprite, TextureAtlas};
pub use bakery::{
    BakedBlock, BakedBlocks, BakedModel, BakedQuad, BakedVertex, BakeryConfig, ModelBakery,
    TintColors, TintProvider,
};
pub use error::{BakeryError, Result};
pub use registry::{BlockRegistry, BlockType};
pub use resource_pack::{BlockModel, BlockstateDefinition, ModelElement, ResourcePack};
pub use state::{Property, PropertyId, StateGraph, StateId};
pub use types::{Axis, BlockTransform, Direction};

/// Load a resource pack from a file path (ZIP or directory).
pub fn load_resource_pack<P: AsRef<std::path::Path>>(path: P) -> Result<ResourcePack> {
    resource_pack::loader::load_from_path(path)
}

/// Load a resource pack from the bytes of a ZIP archive.
pub fn load_resource_pack_from_bytes(data: &[u8]) -> Result<ResourcePack> {
    resource_pack::loader::load_from_bytes(data)
}
