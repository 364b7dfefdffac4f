//! CPU-side flat vertex buffers produced by the triangulator.

/// Per-object attribute arrays, one value stream per attribute: positions
/// and normals with a stride of 3, UVs with a stride of 2. Values are in
/// object space, triangle-ordered, ready for vertex-buffer upload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<f32>,
    pub uvs: Vec<f32>,
    pub normals: Vec<f32>,
}

impl MeshBuffers {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    /// Returns `true` when the three streams describe the same non-empty
    /// set of whole triangles.
    pub fn is_valid(&self) -> bool {
        !self.positions.is_empty()
            && self.positions.len() % 9 == 0
            && self.normals.len() == self.positions.len()
            && self.uvs.len() / 2 == self.positions.len() / 3
    }

    /// Raw bytes of the position stream for buffer upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw bytes of the UV stream for buffer upload.
    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    /// Raw bytes of the normal stream for buffer upload.
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_triangle() -> MeshBuffers {
        MeshBuffers {
            positions: vec![0.0; 9],
            uvs: vec![0.0; 6],
            normals: vec![0.0; 9],
        }
    }

    #[test]
    fn counts_and_validity() {
        let buffers = one_triangle();
        assert_eq!(buffers.vertex_count(), 3);
        assert_eq!(buffers.triangle_count(), 1);
        assert!(buffers.is_valid());
        assert!(!MeshBuffers::default().is_valid());
    }

    #[test]
    fn mismatched_streams_are_invalid() {
        let mut buffers = one_triangle();
        buffers.uvs.pop();
        assert!(!buffers.is_valid());
    }

    #[test]
    fn byte_views_cover_all_values() {
        let buffers = one_triangle();
        assert_eq!(buffers.position_bytes().len(), 9 * 4);
        assert_eq!(buffers.uv_bytes().len(), 6 * 4);
        assert_eq!(buffers.normal_bytes().len(), 9 * 4);
    }
}
