//! Texture atlas building.
//!
//! This module packs textures into a single power-of-two atlas and maps
//! sprite-local UV coordinates into it.

mod builder;
pub mod packer;

pub use builder::{AtlasBuilder, Sprite, TextureAtlas, DEFAULT_MAX_ATLAS_SIZE};
pub use packer::{PackedRect, Packing, Rectangle, RectanglePacker};
