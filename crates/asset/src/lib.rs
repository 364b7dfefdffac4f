//! Asset loading/parsers for OBJ scenes.
//! L1: line scanners + OBJ/MTL tokenizers.
//! L2: geometry/material parsers, fan triangulation, flat vertex buffers.
//! L3: load orchestrator with material resolution and sequential texture slots.

pub mod loader;
pub mod mesh;
pub mod mtl;
pub mod obj;
pub mod scan;
pub mod source;
pub mod texture;

pub use loader::{DEFAULT_MATERIAL, Model, load_model};
pub use mesh::MeshBuffers;
pub use mtl::{MtlFile, MtlMaterial, PendingTexture};
pub use obj::{ObjFile, ObjScene};
pub use source::{AssetSource, FsSource};
pub use texture::{ImageTextureLoader, SlotAllocator, TextureData, TextureHandle, TextureLoader};
