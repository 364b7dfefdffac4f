//! Texture records and the loading seam used by the orchestrator.
//!
//! Slot ids come from an allocator owned by the loader session, never from
//! module state: two independent load sessions each start at slot 0.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;

/// Texture data in CPU-friendly format before GPU upload.
#[derive(Clone, Debug)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// Supported texture formats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextureFormat {
    Rgba8,
}

impl TextureData {
    /// Create a new texture with given dimensions and RGBA8 format.
    pub fn new_rgba8(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 4) as usize,
            "Data size doesn't match RGBA8 format"
        );
        Self {
            data,
            width,
            height,
            format: TextureFormat::Rgba8,
        }
    }

    /// Decode an image file (PNG or JPEG) into RGBA8.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading texture from {:?}", path);

        let img = image::open(path)
            .map_err(|e| anyhow::anyhow!("Failed to open image {:?}: {}", path, e))?;

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let data = rgba.into_raw();

        log::info!("Loaded texture {}x{} with {} bytes", width, height, data.len());

        Ok(Self::new_rgba8(width, height, data))
    }

    /// Get the number of bytes per pixel for the format.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self.format {
            TextureFormat::Rgba8 => 4,
        }
    }

    /// Check if the texture data is valid.
    pub fn is_valid(&self) -> bool {
        let expected_size = (self.width * self.height * self.bytes_per_pixel()) as usize;
        self.data.len() == expected_size && self.width > 0 && self.height > 0
    }
}

/// Monotonic texture-slot ids for one loader session.
#[derive(Debug, Default)]
pub struct SlotAllocator {
    next: u32,
}

impl SlotAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// What a successful texture load hands back: the logical name (file-name
/// stem) and the slot the texture was bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureHandle {
    pub name: String,
    pub slot: u32,
}

/// Texture-loading seam consumed by the orchestrator. Loads are requested
/// strictly one at a time, in enqueue order, so slot assignment stays
/// deterministic across runs.
pub trait TextureLoader {
    fn load_texture(&mut self, name: &str, path: &Path) -> Result<TextureHandle>;
}

/// Decodes image files via [`TextureData::from_path`] and keeps them keyed
/// by name, assigning slots in load order.
#[derive(Debug, Default)]
pub struct ImageTextureLoader {
    slots: SlotAllocator,
    textures: HashMap<String, LoadedTexture>,
}

#[derive(Debug)]
pub struct LoadedTexture {
    pub slot: u32,
    pub data: TextureData,
}

impl ImageTextureLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&LoadedTexture> {
        self.textures.get(name)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl TextureLoader for ImageTextureLoader {
    fn load_texture(&mut self, name: &str, path: &Path) -> Result<TextureHandle> {
        let data = TextureData::from_path(path)?;
        // Slots only advance on successful decode.
        let slot = self.slots.allocate();
        self.textures.insert(name.to_string(), LoadedTexture { slot, data });
        Ok(TextureHandle {
            name: name.to_string(),
            slot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba8_texture_is_valid() {
        let tex = TextureData::new_rgba8(2, 2, vec![255; 16]);
        assert!(tex.is_valid());
        assert_eq!(tex.bytes_per_pixel(), 4);
    }

    #[test]
    fn slots_are_monotonic_from_zero() {
        let mut slots = SlotAllocator::new();
        assert_eq!(slots.allocate(), 0);
        assert_eq!(slots.allocate(), 1);
        assert_eq!(slots.allocate(), 2);
    }

    #[test]
    fn sessions_do_not_share_slots() {
        let mut a = SlotAllocator::new();
        let mut b = SlotAllocator::new();
        a.allocate();
        assert_eq!(b.allocate(), 0);
    }

    #[test]
    fn missing_image_file_fails() {
        let mut loader = ImageTextureLoader::new();
        assert!(loader.load_texture("nope", Path::new("no/such/image.png")).is_err());
        assert!(loader.is_empty());
    }
}
