//! Face decoding and fan triangulation.
//!
//! Face corners resolve their pool references *by value* at construction.
//! Triangles therefore own private copies of every attribute, so the
//! optional smooth-shading step can rewrite normals without bleeding into
//! triangles that referenced the same pool entry.

use corelib::{ParseError, ParseResult};
use glam::{DVec2, DVec3};

/// One face corner with attributes copied out of the pools.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FaceVertex {
    pub position: DVec3,
    pub uv: Option<DVec2>,
    pub normal: Option<DVec3>,
}

impl FaceVertex {
    /// Decode one `pos[/uv][/normal]` reference against the pools as they
    /// stand right now. The position field must parse; the optional fields
    /// resolve only when present, numeric and inside their pool.
    fn parse(
        reference: &str,
        positions: &[DVec3],
        tex_coords: &[DVec2],
        normals: &[DVec3],
        line: &str,
    ) -> ParseResult<Self> {
        let mut fields = reference.split('/');
        let position = fields
            .next()
            .and_then(|f| f.parse::<i64>().ok())
            .ok_or_else(|| ParseError::MissingPositionIndex {
                reference: reference.to_string(),
                line: line.to_string(),
            })?;
        Ok(Self {
            // An index outside the pool reads as the zero vector rather
            // than erroring, matching the zero-fill contract of the flat
            // arrays.
            position: lookup(positions, position).unwrap_or_default(),
            uv: fields
                .next()
                .and_then(|f| f.parse::<i64>().ok())
                .and_then(|idx| lookup(tex_coords, idx)),
            normal: fields
                .next()
                .and_then(|f| f.parse::<i64>().ok())
                .and_then(|idx| lookup(normals, idx)),
        })
    }
}

/// 1-based pool lookup; anything outside the pool resolves to nothing.
fn lookup<T: Copy>(pool: &[T], index: i64) -> Option<T> {
    if index < 1 {
        return None;
    }
    pool.get(index as usize - 1).copied()
}

/// One polygonal face: its corners plus the triangle fan derived from them
/// at construction.
#[derive(Clone, Debug, Default)]
pub struct Face {
    pub vertices: Vec<FaceVertex>,
    pub triangles: Vec<Triangle>,
}

impl Face {
    /// Build a face from raw reference chunks. An N-corner face yields
    /// exactly N-2 triangles fanned from the first corner.
    pub fn parse(
        refs: &[&str],
        positions: &[DVec3],
        tex_coords: &[DVec2],
        normals: &[DVec3],
        line: &str,
        smooth_shaded: bool,
    ) -> ParseResult<Self> {
        let vertices = refs
            .iter()
            .map(|r| FaceVertex::parse(r, positions, tex_coords, normals, line))
            .collect::<ParseResult<Vec<_>>>()?;
        if vertices.len() < 3 {
            return Err(ParseError::DegenerateFace {
                line: line.to_string(),
            });
        }
        let triangles = (0..vertices.len() - 2)
            .map(|i| Triangle::new([vertices[0], vertices[i + 1], vertices[i + 2]], smooth_shaded))
            .collect();
        Ok(Self { vertices, triangles })
    }
}

/// One fan triangle holding its three corners by value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub vertices: [FaceVertex; 3],
}

impl Triangle {
    pub fn new(vertices: [FaceVertex; 3], smooth_shaded: bool) -> Self {
        let mut tri = Self { vertices };
        if smooth_shaded {
            tri.apply_smooth_shading();
        }
        tri
    }

    /// 3 corners x xyz as `f32` for upload.
    pub fn positions(&self) -> [f32; 9] {
        let mut data = [0.0; 9];
        for (i, v) in self.vertices.iter().enumerate() {
            data[i * 3] = v.position.x as f32;
            data[i * 3 + 1] = v.position.y as f32;
            data[i * 3 + 2] = v.position.z as f32;
        }
        data
    }

    /// 3 corners x xyz, zero-filled where a corner carries no normal.
    pub fn normals(&self) -> [f32; 9] {
        let mut data = [0.0; 9];
        for (i, v) in self.vertices.iter().enumerate() {
            if let Some(n) = v.normal {
                data[i * 3] = n.x as f32;
                data[i * 3 + 1] = n.y as f32;
                data[i * 3 + 2] = n.z as f32;
            }
        }
        data
    }

    /// 3 corners x uv, zero-filled where a corner carries no UV.
    pub fn tex_coords(&self) -> [f32; 6] {
        let mut data = [0.0; 6];
        for (i, v) in self.vertices.iter().enumerate() {
            if let Some(uv) = v.uv {
                data[i * 2] = uv.x as f32;
                data[i * 2 + 1] = uv.y as f32;
            }
        }
        data
    }

    /// Average the three corner normals (absent ones read as zero) and
    /// write the mean back to every corner that has one. Touches only this
    /// triangle's own copies.
    fn apply_smooth_shading(&mut self) {
        let sum: DVec3 = self
            .vertices
            .iter()
            .map(|v| v.normal.unwrap_or(DVec3::ZERO))
            .sum();
        let avg = sum / 3.0;
        for v in &mut self.vertices {
            if let Some(n) = v.normal.as_mut() {
                *n = avg;
            }
        }
    }
}
