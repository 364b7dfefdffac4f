//! Named material records built from MTL files.

use glam::Vec3;

/// One `newmtl` record. Colors default to black and opacity to fully
/// opaque; directives seen after the `newmtl` line overwrite fields of the
/// current record in place.
#[derive(Clone, Debug, PartialEq)]
pub struct MtlMaterial {
    pub name: String,
    /// `Ka`
    pub ambient: Vec3,
    /// `Kd`
    pub diffuse: Vec3,
    /// `Ks`
    pub specular: Vec3,
    /// `Ke`
    pub emissive: Vec3,
    /// `d` (dissolve)
    pub opacity: f32,
    /// Illumination model. The `illum` directive itself is skipped by the
    /// tokenizer, so this always holds the default.
    pub illum: u32,
    /// Stem of the `map_Kd` file name.
    pub albedo_texture: Option<String>,
    /// Stem of the `map_Ns`/`map_Ks` file name.
    pub specular_texture: Option<String>,
    /// Stem of the `map_Bump` file name.
    pub normal_texture: Option<String>,
}

impl MtlMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: Vec3::ZERO,
            diffuse: Vec3::ZERO,
            specular: Vec3::ZERO,
            emissive: Vec3::ZERO,
            opacity: 1.0,
            illum: 1,
            albedo_texture: None,
            specular_texture: None,
            normal_texture: None,
        }
    }
}
