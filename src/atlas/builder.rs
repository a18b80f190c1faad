//! Texture atlas building on top of the rectangle packer.

use super::packer::{Rectangle, RectanglePacker};
use crate::error::{BakeryError, Result};
use crate::resource_pack::{ResourcePack, TextureData};
use crate::types::MISSING_TEXTURE;
use image::ImageEncoder;
use std::collections::{HashMap, HashSet};

/// Default upper bound for either atlas dimension.
pub const DEFAULT_MAX_ATLAS_SIZE: u32 = 16384;

/// Location of one texture inside the atlas.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub name: String,
    /// Left edge in pixels.
    pub origin_x: u32,
    /// Top edge in pixels.
    pub origin_y: u32,
    pub size_x: u32,
    pub size_y: u32,
    /// Atlas width in pixels.
    pub texture_size_x: u32,
    /// Atlas height in pixels.
    pub texture_size_y: u32,
}

impl Sprite {
    pub fn min_u(&self) -> f32 {
        self.origin_x as f32 / self.texture_size_x as f32
    }

    pub fn max_u(&self) -> f32 {
        (self.origin_x + self.size_x) as f32 / self.texture_size_x as f32
    }

    pub fn min_v(&self) -> f32 {
        self.origin_y as f32 / self.texture_size_y as f32
    }

    pub fn max_v(&self) -> f32 {
        (self.origin_y + self.size_y) as f32 / self.texture_size_y as f32
    }

    /// Map a sprite-local UV (0-1) into atlas space.
    pub fn interpolate(&self, u: f32, v: f32) -> [f32; 2] {
        [
            self.min_u() + (self.max_u() - self.min_u()) * u,
            self.min_v() + (self.max_v() - self.min_v()) * v,
        ]
    }
}

/// A built texture atlas.
#[derive(Debug, Clone)]
pub struct TextureAtlas {
    /// Width of the atlas in pixels.
    pub width: u32,
    /// Height of the atlas in pixels.
    pub height: u32,
    /// RGBA pixel data, row-major.
    pub pixels: Vec<u8>,
    sprites: HashMap<String, Sprite>,
    missing: Sprite,
}

impl TextureAtlas {
    /// Build an atlas holding the named textures from `pack`.
    ///
    /// Names missing from the pack are logged; lookups for them return the
    /// missing sprite.
    pub fn pack<I, S>(names: I, pack: &ResourcePack, max_size: u32) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = AtlasBuilder::new().with_max_size(max_size);
        let mut seen = HashSet::new();
        for name in names {
            let name = name.as_ref();
            if name == MISSING_TEXTURE || !seen.insert(name.to_string()) {
                continue;
            }
            match pack.get_texture(name) {
                Some(texture) => builder.add_texture(name, texture.clone()),
                None => log::warn!("texture {} not found, using {}", name, MISSING_TEXTURE),
            }
        }
        builder.build()
    }

    /// Sprite for a texture, or the missing sprite if the atlas lacks it.
    pub fn sprite(&self, name: &str) -> &Sprite {
        match self.sprites.get(name) {
            Some(sprite) => sprite,
            None => {
                if name != MISSING_TEXTURE {
                    log::warn!("no sprite for {}, using {}", name, MISSING_TEXTURE);
                }
                &self.missing
            }
        }
    }

    /// The placeholder sprite.
    pub fn missing_sprite(&self) -> &Sprite {
        &self.missing
    }

    /// Check if the atlas contains a texture.
    pub fn contains(&self, name: &str) -> bool {
        self.sprites.contains_key(name)
    }

    /// Number of sprites, the placeholder included.
    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    /// Export the atlas as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let cursor = std::io::Cursor::new(&mut bytes);
        let encoder = image::codecs::png::PngEncoder::new(cursor);

        encoder.write_image(
            &self.pixels,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )?;

        Ok(bytes)
    }
}

/// Builder for creating texture atlases.
pub struct AtlasBuilder {
    max_size: u32,
    textures: Vec<(String, TextureData)>,
}

impl Default for AtlasBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AtlasBuilder {
    /// Create a builder that already holds the placeholder texture.
    pub fn new() -> Self {
        Self {
            max_size: DEFAULT_MAX_ATLAS_SIZE,
            textures: vec![(MISSING_TEXTURE.to_string(), TextureData::placeholder())],
        }
    }

    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Add a texture. A name that was already added keeps its first image.
    pub fn add_texture(&mut self, name: impl Into<String>, texture: TextureData) {
        let name = name.into();
        if self.textures.iter().any(|(n, _)| *n == name) {
            log::debug!("atlas already holds {}, ignoring duplicate", name);
            return;
        }
        self.textures.push((name, texture));
    }

    /// Pack, composite and index every texture.
    pub fn build(self) -> Result<TextureAtlas> {
        let mut textures: Vec<(String, TextureData)> = self
            .textures
            .into_iter()
            .map(|(name, texture)| (name, texture.first_frame()))
            .collect();
        textures.sort_by(|a, b| a.0.cmp(&b.0));

        let rectangles = textures
            .iter()
            .map(|(name, t)| Rectangle::new(name.clone(), t.width, t.height))
            .collect();
        let packing = RectanglePacker::with_max_size(self.max_size).pack(rectangles)?;

        let (width, height) = (packing.width, packing.height);
        let mut pixels = vec![0u8; (width as usize) * (height as usize) * 4];
        let mut sprites = HashMap::with_capacity(textures.len());

        for (name, texture) in &textures {
            let Some(placed) = packing.get(name) else {
                continue;
            };
            let row_bytes = (texture.width * 4) as usize;
            for row in 0..texture.height {
                let src = (row * texture.width * 4) as usize;
                let dst = (((placed.y + row) * width + placed.x) * 4) as usize;
                pixels[dst..dst + row_bytes].copy_from_slice(&texture.pixels[src..src + row_bytes]);
            }

            sprites.insert(
                name.clone(),
                Sprite {
                    name: name.clone(),
                    origin_x: placed.x,
                    origin_y: placed.y,
                    size_x: placed.width,
                    size_y: placed.height,
                    texture_size_x: width,
                    texture_size_y: height,
                },
            );
        }

        let missing = sprites
            .get(MISSING_TEXTURE)
            .cloned()
            .ok_or_else(|| {
                BakeryError::PackingFailed(format!("{} was not placed", MISSING_TEXTURE))
            })?;

        log::debug!("atlas {}x{} with {} sprites", width, height, sprites.len());
        Ok(TextureAtlas {
            width,
            height,
            pixels,
            sprites,
            missing,
        })
    }
}
