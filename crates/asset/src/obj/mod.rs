//! OBJ geometry file parser: attribute pools, named objects and their
//! faces, plus resolution of the material libraries the file references.

pub mod face;
pub mod tokenizer;

use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context, Result};
use corelib::ParseResult;
use glam::{DVec2, DVec3, dvec2, dvec3};

use crate::mesh::MeshBuffers;
use crate::mtl::{MtlFile, MtlMaterial};
use crate::source::AssetSource;
pub use face::{Face, FaceVertex, Triangle};
use tokenizer::ObjToken;

/// One `o` block: a named object, its optional `usemtl` material name and
/// the faces declared while it was current.
#[derive(Clone, Debug, Default)]
pub struct ObjObject {
    pub name: String,
    pub material: Option<String>,
    pub faces: Vec<Face>,
}

impl ObjObject {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            material: None,
            faces: Vec::new(),
        }
    }

    /// Flatten every triangle of every face into per-attribute arrays.
    pub fn buffers(&self) -> MeshBuffers {
        let mut buffers = MeshBuffers::default();
        for face in &self.faces {
            for tri in &face.triangles {
                buffers.positions.extend_from_slice(&tri.positions());
                buffers.uvs.extend_from_slice(&tri.tex_coords());
                buffers.normals.extend_from_slice(&tri.normals());
            }
        }
        buffers
    }
}

/// One object's parse output: flat buffers plus the material name its
/// `usemtl` directive asked for (resolved later, at model assembly).
#[derive(Clone, Debug)]
pub struct MeshRecord {
    pub name: String,
    pub material: Option<String>,
    pub buffers: MeshBuffers,
}

/// Everything a geometry file produces once its material libraries have
/// been resolved: per-object mesh records in encounter order, and the
/// parsed material files (kept whole so their texture queues can still be
/// drained in file order).
#[derive(Debug, Default)]
pub struct ObjScene {
    pub meshes: Vec<MeshRecord>,
    pub material_files: Vec<MtlFile>,
}

impl ObjScene {
    /// All parsed materials, in library-encounter then declaration order.
    pub fn materials(&self) -> impl Iterator<Item = &MtlMaterial> {
        self.material_files.iter().flat_map(|f| f.materials().iter())
    }
}

/// Parser state for one geometry file.
///
/// The line scan is synchronous and single-threaded; faces resolve against
/// the pools exactly as they stand when the face line is reached (OBJ files
/// only reference data declared earlier in the file).
#[derive(Debug, Default)]
pub struct ObjFile {
    positions: Vec<DVec3>,
    tex_coords: Vec<DVec2>,
    normals: Vec<DVec3>,
    objects: Vec<ObjObject>,
    current: Option<usize>,
    mtl_libs: Vec<PathBuf>,
    base_dir: PathBuf,
    smooth_shading: bool,
}

impl ObjFile {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    /// Forward triangle normals get averaged per triangle when enabled.
    /// Off by default.
    pub fn set_smooth_shading(&mut self, enabled: bool) {
        self.smooth_shading = enabled;
    }

    /// Run the line scan over the whole file text. Fatal errors abort the
    /// scan; nothing parsed so far is usable afterwards.
    pub fn parse_lines(&mut self, text: &str) -> ParseResult<()> {
        for line in text.lines() {
            let tokens = tokenizer::tokenize(line)?;
            let Some(first) = tokens.first() else { continue };
            match first {
                ObjToken::Vertex => self.positions.push(dvec3(
                    number_at(&tokens, 1),
                    number_at(&tokens, 2),
                    number_at(&tokens, 3),
                )),
                ObjToken::Normal => self.normals.push(dvec3(
                    number_at(&tokens, 1),
                    number_at(&tokens, 2),
                    number_at(&tokens, 3),
                )),
                ObjToken::TexCoord => self
                    .tex_coords
                    .push(dvec2(number_at(&tokens, 1), number_at(&tokens, 2))),
                ObjToken::Face => {
                    let refs: Vec<&str> = tokens
                        .iter()
                        .filter_map(|t| match t {
                            ObjToken::FaceRef(chunk) => Some(chunk.as_str()),
                            _ => None,
                        })
                        .collect();
                    let face = Face::parse(
                        &refs,
                        &self.positions,
                        &self.tex_coords,
                        &self.normals,
                        line,
                        self.smooth_shading,
                    )?;
                    match self.current {
                        Some(idx) => self.objects[idx].faces.push(face),
                        // No `o` directive yet: there is nothing to attach
                        // the face to.
                        None => log::warn!("Dropping face declared before any object: {line}"),
                    }
                }
                ObjToken::Object => {
                    if let Some(ObjToken::Text(name)) = tokens.get(1) {
                        self.current = Some(self.select_or_replace(name));
                    }
                }
                ObjToken::MtlLib => {
                    if let Some(ObjToken::Text(file)) = tokens.get(1) {
                        self.mtl_libs.push(self.base_dir.join(file));
                    }
                }
                ObjToken::UseMtl => {
                    if let (Some(idx), Some(ObjToken::Text(name))) = (self.current, tokens.get(1)) {
                        self.objects[idx].material = Some(name.clone());
                    }
                }
                ObjToken::Number(_) | ObjToken::FaceRef(_) | ObjToken::Text(_) => {}
            }
        }
        Ok(())
    }

    /// Fetch and parse every referenced material library. Fetches fan out
    /// across scoped threads (each library gets an independent parser over
    /// independent state) and all must finish before the results merge, in
    /// encounter order.
    pub fn resolve_materials<S: AssetSource + ?Sized>(&self, source: &S) -> Result<Vec<MtlFile>> {
        thread::scope(|scope| {
            let handles: Vec<_> = self
                .mtl_libs
                .iter()
                .map(|path| {
                    let base_dir = &self.base_dir;
                    scope.spawn(move || -> Result<MtlFile> {
                        let text = source.fetch_text(path).with_context(|| {
                            format!("Failed to fetch material library {}", path.display())
                        })?;
                        let mut mtl = MtlFile::new(base_dir);
                        mtl.parse_lines(&text).with_context(|| {
                            format!("Failed to parse material library {}", path.display())
                        })?;
                        Ok(mtl)
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("material library thread panicked"))
                .collect()
        })
    }

    /// Flatten every object into its mesh record, in encounter order.
    pub fn assemble(&self) -> Vec<MeshRecord> {
        self.objects
            .iter()
            .map(|obj| MeshRecord {
                name: obj.name.clone(),
                material: obj.material.clone(),
                buffers: obj.buffers(),
            })
            .collect()
    }

    /// Resolve material libraries and assemble mesh records in one go.
    pub fn into_scene<S: AssetSource + ?Sized>(self, source: &S) -> Result<ObjScene> {
        let material_files = self.resolve_materials(source)?;
        log::debug!(
            "Assembled {} object(s) from {} material file(s)",
            self.objects.len(),
            material_files.len()
        );
        Ok(ObjScene {
            meshes: self.assemble(),
            material_files,
        })
    }

    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    pub fn tex_coords(&self) -> &[DVec2] {
        &self.tex_coords
    }

    pub fn normals(&self) -> &[DVec3] {
        &self.normals
    }

    pub fn objects(&self) -> &[ObjObject] {
        &self.objects
    }

    pub fn material_libraries(&self) -> &[PathBuf] {
        &self.mtl_libs
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// An `o` directive reusing a name replaces that object, keeping its
    /// position in the enumeration order.
    fn select_or_replace(&mut self, name: &str) -> usize {
        match self.objects.iter().position(|o| o.name == name) {
            Some(idx) => {
                self.objects[idx] = ObjObject::new(name);
                idx
            }
            None => {
                self.objects.push(ObjObject::new(name));
                self.objects.len() - 1
            }
        }
    }
}

fn number_at(tokens: &[ObjToken], index: usize) -> f64 {
    match tokens.get(index) {
        Some(ObjToken::Number(value)) => *value,
        _ => 0.0,
    }
}
