//! Load orchestrator: drives the geometry parse, material resolution and
//! texture loading end to end and hands back render-ready models.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::mesh::MeshBuffers;
use crate::mtl::MtlMaterial;
use crate::obj::{ObjFile, ObjScene};
use crate::source::AssetSource;
use crate::texture::TextureLoader;

/// Name of the material substituted when an object's `usemtl` name is
/// absent from the merged material set.
pub const DEFAULT_MATERIAL: &str = "default";

/// One renderable object: flat buffers paired with its resolved material.
/// A multi-object file loads as the first object with the rest attached as
/// children (a grouping convention, not a transform hierarchy).
#[derive(Clone, Debug)]
pub struct Model {
    pub name: String,
    pub material: MtlMaterial,
    pub buffers: MeshBuffers,
    pub children: Vec<Model>,
}

impl Model {
    /// This model plus all children.
    pub fn count(&self) -> usize {
        1 + self.children.len()
    }
}

/// Load `file` from `dir`: parse the geometry, resolve its material
/// libraries, request every referenced texture and pair each object with
/// its material. Any I/O or decode failure aborts the whole load.
pub fn load_model<S, T>(source: &S, textures: &mut T, dir: impl AsRef<Path>, file: &str) -> Result<Model>
where
    S: AssetSource + ?Sized,
    T: TextureLoader + ?Sized,
{
    let base_dir = dir.as_ref();
    let path = base_dir.join(file);
    log::info!("Loading OBJ scene from {}", path.display());

    let text = source
        .fetch_text(&path)
        .with_context(|| format!("Failed to fetch geometry file {}", path.display()))?;
    let mut obj = ObjFile::new(base_dir);
    obj.parse_lines(&text)
        .with_context(|| format!("Failed to parse geometry file {}", path.display()))?;
    let ObjScene {
        meshes,
        mut material_files,
    } = obj.into_scene(source)?;

    // Texture loads stay sequential, in file-encounter then enqueue order:
    // slot ids are one monotonic sequence per session and must come out the
    // same on every run.
    for mtl in &mut material_files {
        for pending in mtl.drain_pending_textures() {
            let handle = textures
                .load_texture(&pending.name, &pending.path)
                .with_context(|| format!("Failed to load texture {}", pending.path.display()))?;
            log::info!("Texture '{}' bound to slot {}", handle.name, handle.slot);
        }
    }

    // Merged material set; a name declared in a later library wins.
    let mut materials: HashMap<&str, &MtlMaterial> = HashMap::new();
    for mtl in &material_files {
        for mat in mtl.materials() {
            materials.insert(mat.name.as_str(), mat);
        }
    }

    let fallback = MtlMaterial::new(DEFAULT_MATERIAL);
    let mut models: Vec<Model> = meshes
        .into_iter()
        .map(|mesh| {
            let material = mesh
                .material
                .as_deref()
                .and_then(|name| materials.get(name).copied())
                .unwrap_or(&fallback)
                .clone();
            Model {
                name: mesh.name,
                material,
                buffers: mesh.buffers,
                children: Vec::new(),
            }
        })
        .collect();

    if models.is_empty() {
        anyhow::bail!("Geometry file {} contained no objects", path.display());
    }
    let mut root = models.remove(0);
    root.children = models;
    log::info!(
        "Loaded '{}': {} model(s), {} triangle(s) in root",
        root.name,
        root.count(),
        root.buffers.triangle_count()
    );
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::TextureHandle;
    use std::collections::HashMap;
    use std::path::PathBuf;

    struct MapSource(HashMap<PathBuf, String>);

    impl MapSource {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(path, text)| (PathBuf::from(path), text.to_string()))
                    .collect(),
            )
        }
    }

    impl AssetSource for MapSource {
        fn fetch_text(&self, path: &Path) -> Result<String> {
            self.0
                .get(path)
                .cloned()
                .with_context(|| format!("no such asset: {}", path.display()))
        }
    }

    /// Records requests instead of decoding files; slots still come from a
    /// real allocator.
    #[derive(Default)]
    struct RecordingLoader {
        slots: crate::texture::SlotAllocator,
        requests: Vec<(String, PathBuf, u32)>,
    }

    impl TextureLoader for RecordingLoader {
        fn load_texture(&mut self, name: &str, path: &Path) -> Result<TextureHandle> {
            let slot = self.slots.allocate();
            self.requests.push((name.to_string(), path.to_path_buf(), slot));
            Ok(TextureHandle {
                name: name.to_string(),
                slot,
            })
        }
    }

    const TWO_OBJECTS: &str = "\
mtllib scene.mtl
o First
v 0 0 0
v 1 0 0
v 0 1 0
usemtl Red
f 1 2 3
o Second
v 0 0 1
f 2 3 4
";

    const SCENE_MTL: &str = "\
newmtl Red
Kd 1 0 0
map_Kd red.png
newmtl Blue
Kd 0 0 1
map_Kd blue.png
";

    #[test]
    fn two_objects_group_as_root_and_child() {
        let source = MapSource::new(&[
            ("assets/scene.obj", TWO_OBJECTS),
            ("assets/scene.mtl", SCENE_MTL),
        ]);
        let mut textures = RecordingLoader::default();
        let root = load_model(&source, &mut textures, "assets", "scene.obj").unwrap();

        assert_eq!(root.name, "First");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].name, "Second");
        assert_eq!(root.material.name, "Red");
        assert!(root.buffers.is_valid());
    }

    #[test]
    fn single_object_loads_standalone() {
        let source = MapSource::new(&[(
            "assets/tri.obj",
            "o Only\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        )]);
        let mut textures = RecordingLoader::default();
        let root = load_model(&source, &mut textures, "assets", "tri.obj").unwrap();
        assert!(root.children.is_empty());
        assert_eq!(root.count(), 1);
    }

    #[test]
    fn unknown_material_falls_back_to_default() {
        let source = MapSource::new(&[(
            "assets/tri.obj",
            "o Only\nusemtl Missing\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        )]);
        let mut textures = RecordingLoader::default();
        let root = load_model(&source, &mut textures, "assets", "tri.obj").unwrap();
        assert_eq!(root.material.name, DEFAULT_MATERIAL);
        assert_eq!(root.material.opacity, 1.0);
    }

    #[test]
    fn textures_load_in_encounter_order_with_increasing_slots() {
        let source = MapSource::new(&[
            ("assets/scene.obj", TWO_OBJECTS),
            ("assets/scene.mtl", SCENE_MTL),
        ]);
        let mut textures = RecordingLoader::default();
        load_model(&source, &mut textures, "assets", "scene.obj").unwrap();

        let names: Vec<&str> = textures.requests.iter().map(|(n, _, _)| n.as_str()).collect();
        assert_eq!(names, ["red", "blue"]);
        assert_eq!(textures.requests[0].1, Path::new("assets/red.png"));
        // Slot ids mirror request order exactly.
        assert_eq!(textures.requests[0].2, 0);
        assert_eq!(textures.requests[1].2, 1);
    }

    #[test]
    fn texture_order_spans_material_files() {
        let source = MapSource::new(&[
            (
                "assets/multi.obj",
                "mtllib a.mtl\nmtllib b.mtl\no O\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
            ),
            ("assets/a.mtl", "newmtl A\nmap_Kd first.png\n"),
            ("assets/b.mtl", "newmtl B\nmap_Kd second.png\n"),
        ]);
        let mut textures = RecordingLoader::default();
        load_model(&source, &mut textures, "assets", "multi.obj").unwrap();
        let names: Vec<&str> = textures.requests.iter().map(|(n, _, _)| n.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn parse_failure_aborts_without_models() {
        let source = MapSource::new(&[("assets/bad.obj", "o A\nv 1.2.3 0 0\n")]);
        let mut textures = RecordingLoader::default();
        let err = load_model(&source, &mut textures, "assets", "bad.obj").unwrap_err();
        assert!(format!("{err:#}").contains("bad.obj"));
        assert!(textures.requests.is_empty());
    }

    #[test]
    fn empty_geometry_is_an_error() {
        let source = MapSource::new(&[("assets/empty.obj", "# nothing here\n")]);
        let mut textures = RecordingLoader::default();
        assert!(load_model(&source, &mut textures, "assets", "empty.obj").is_err());
    }
}
