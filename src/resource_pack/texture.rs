//! Decoded block textures.

use serde::Deserialize;

/// Decoded RGBA8 texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
    /// RGBA8 pixel data (4 bytes per pixel).
    pub pixels: Vec<u8>,
    /// Animation frame count (1 if not animated).
    pub frame_count: u32,
    /// Animation metadata from the sibling `.png.mcmeta`, if any.
    pub animation: Option<AnimationMeta>,
}

/// The `animation` section of a `.png.mcmeta` file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct AnimationMeta {
    /// Ticks per frame.
    #[serde(default)]
    pub frametime: Option<u32>,
    #[serde(default)]
    pub interpolate: bool,
    /// Explicit frame order; entries are indices or `{index, time}` objects.
    #[serde(default)]
    pub frames: Option<Vec<serde_json::Value>>,
    /// Frame width in pixels; defaults to the texture width.
    #[serde(default, rename = "width")]
    pub frame_width: Option<u32>,
    /// Frame height in pixels; defaults to the frame width.
    #[serde(default, rename = "height")]
    pub frame_height: Option<u32>,
}

#[derive(Deserialize)]
struct McMeta {
    animation: Option<AnimationMeta>,
}

/// Parse a `.png.mcmeta` file. Returns `None` without an `animation` section.
pub fn parse_mcmeta(contents: &str) -> Option<AnimationMeta> {
    match serde_json::from_str::<McMeta>(contents) {
        Ok(meta) => meta.animation,
        Err(e) => {
            log::warn!("ignoring malformed mcmeta: {}", e);
            None
        }
    }
}

impl TextureData {
    /// Create a new texture from RGBA data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
            frame_count: 1,
            animation: None,
        }
    }

    /// Mark the texture as a vertical strip of frames described by `meta`.
    pub fn apply_mcmeta(&mut self, meta: AnimationMeta) {
        let frame_height = meta
            .frame_height
            .or(meta.frame_width)
            .unwrap_or(self.width)
            .min(self.height);
        self.frame_count = if frame_height > 0 {
            (self.height / frame_height).max(1)
        } else {
            1
        };
        self.animation = Some(meta);
    }

    /// The 16x16 magenta/black checkerboard used for anything missing.
    pub fn placeholder() -> Self {
        let image = image::RgbaImage::from_fn(16, 16, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                image::Rgba([248, 0, 248, 255])
            } else {
                image::Rgba([0, 0, 0, 255])
            }
        });
        Self::new(16, 16, image.into_raw())
    }

    /// Whether the texture holds more than one animation frame.
    pub fn is_animated(&self) -> bool {
        self.frame_count > 1
    }

    /// RGBA value at (x, y); row-major from the top left.
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let start = ((y * self.width + x) * 4) as usize;
        let mut pixel = [0u8; 4];
        pixel.copy_from_slice(&self.pixels[start..start + 4]);
        pixel
    }

    /// Get the first frame of an animated texture (or the whole texture if not animated).
    pub fn first_frame(&self) -> TextureData {
        if !self.is_animated() {
            return self.clone();
        }

        let frame_width = self
            .animation
            .as_ref()
            .and_then(|meta| meta.frame_width)
            .unwrap_or(self.width)
            .min(self.width);
        let frame_height = self.height / self.frame_count;
        let row = (self.width * 4) as usize;
        let pixels = self.pixels[..row * frame_height as usize]
            .chunks(row)
            .flat_map(|line| &line[..(frame_width * 4) as usize])
            .copied()
            .collect();

        Self::new(frame_width, frame_height, pixels)
    }
}

/// Decode a texture from PNG bytes.
///
/// The result is a single frame; animation comes only from [`TextureData::apply_mcmeta`].
pub fn load_texture_from_bytes(data: &[u8]) -> Result<TextureData, image::ImageError> {
    let img = image::load_from_memory(data)?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(TextureData::new(width, height, rgba.into_raw()))
}
