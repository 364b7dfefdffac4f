//! MTL material file parser: named material records plus the queue of
//! textures those records reference.

pub mod material;
pub mod tokenizer;

use std::path::{Path, PathBuf};

use corelib::ParseResult;
use glam::vec3;

pub use material::MtlMaterial;
use tokenizer::MtlToken;

/// A texture referenced by a map directive: the file-name stem the material
/// fields point at, and the full path to fetch it from.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingTexture {
    pub name: String,
    pub path: PathBuf,
}

/// Parser state for one material file. Materials keep their encounter
/// order; `drain_pending_textures` hands out each queued texture exactly
/// once.
#[derive(Debug, Default)]
pub struct MtlFile {
    base_dir: PathBuf,
    materials: Vec<MtlMaterial>,
    pending_textures: Vec<PendingTexture>,
    current: Option<usize>,
}

impl MtlFile {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    /// Run the line scan over the whole file text. Fatal errors abort the
    /// scan and leave the file contents undefined.
    pub fn parse_lines(&mut self, text: &str) -> ParseResult<()> {
        for line in text.lines() {
            let tokens = tokenizer::tokenize(line)?;
            let Some(first) = tokens.first() else { continue };
            match first {
                MtlToken::NewMaterial => {
                    if let Some(MtlToken::Text(name)) = tokens.get(1) {
                        self.current = Some(self.select_or_insert(name));
                    }
                }
                MtlToken::Ambient => {
                    if let Some(mat) = self.current_material() {
                        mat.ambient = color_operands(&tokens);
                    }
                }
                MtlToken::Diffuse => {
                    if let Some(mat) = self.current_material() {
                        mat.diffuse = color_operands(&tokens);
                    }
                }
                MtlToken::Specular => {
                    if let Some(mat) = self.current_material() {
                        mat.specular = color_operands(&tokens);
                    }
                }
                MtlToken::Emissive => {
                    if let Some(mat) = self.current_material() {
                        mat.emissive = color_operands(&tokens);
                    }
                }
                MtlToken::Dissolve => {
                    if let (Some(MtlToken::Number(value)), Some(mat)) =
                        (tokens.get(1), self.current_material())
                    {
                        mat.opacity = *value as f32;
                    }
                }
                MtlToken::AlbedoMap => {
                    self.set_map(&tokens, |mat, stem| mat.albedo_texture = Some(stem));
                }
                MtlToken::SpecularMap => {
                    self.set_map(&tokens, |mat, stem| mat.specular_texture = Some(stem));
                }
                MtlToken::NormalMap => {
                    self.set_map(&tokens, |mat, stem| mat.normal_texture = Some(stem));
                }
                MtlToken::Number(_) | MtlToken::Text(_) => {}
            }
        }
        Ok(())
    }

    /// Materials in encounter order.
    pub fn materials(&self) -> &[MtlMaterial] {
        &self.materials
    }

    /// Return and clear the queued texture references. Safe to call again:
    /// later calls only see entries queued since this one.
    pub fn drain_pending_textures(&mut self) -> Vec<PendingTexture> {
        std::mem::take(&mut self.pending_textures)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// `newmtl` with a name seen before resets that record in place,
    /// keeping its position in the enumeration order.
    fn select_or_insert(&mut self, name: &str) -> usize {
        match self.materials.iter().position(|m| m.name == name) {
            Some(idx) => {
                self.materials[idx] = MtlMaterial::new(name);
                idx
            }
            None => {
                self.materials.push(MtlMaterial::new(name));
                self.materials.len() - 1
            }
        }
    }

    fn current_material(&mut self) -> Option<&mut MtlMaterial> {
        self.current.map(|idx| &mut self.materials[idx])
    }

    /// Store the file-name stem on the current material and queue the
    /// texture for loading under the file's base directory.
    fn set_map(&mut self, tokens: &[MtlToken], apply: impl FnOnce(&mut MtlMaterial, String)) {
        let Some(MtlToken::Text(file)) = tokens.get(1) else {
            return;
        };
        let path = self.base_dir.join(file);
        let stem = file.split('.').next().unwrap_or(file).to_string();
        let Some(mat) = self.current_material() else {
            return;
        };
        apply(mat, stem.clone());
        self.pending_textures.push(PendingTexture { name: stem, path });
    }
}

/// Three numeric operands as an RGB color; missing or non-numeric fields
/// read as zero.
fn color_operands(tokens: &[MtlToken]) -> glam::Vec3 {
    vec3(
        number_at(tokens, 1),
        number_at(tokens, 2),
        number_at(tokens, 3),
    )
}

fn number_at(tokens: &[MtlToken], index: usize) -> f32 {
    match tokens.get(index) {
        Some(MtlToken::Number(value)) => *value as f32,
        _ => 0.0,
    }
}
