use bytemuck::{Pod, Zeroable};

/// One vertex of the fullscreen quad: a tightly packed 2D position.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct QuadVertex {
    pub position: [f32; 2],
}

/// Two triangles spanning clip space, wound to match the pipeline's CCW
/// front face. Uploaded once at startup and never rewritten.
pub(crate) const QUAD_VERTICES: [QuadVertex; 6] = [
    QuadVertex {
        position: [-1.0, 1.0], // top-left
    },
    QuadVertex {
        position: [1.0, 1.0], // top-right
    },
    QuadVertex {
        position: [1.0, -1.0], // bottom-right
    },
    QuadVertex {
        position: [1.0, -1.0], // bottom-right
    },
    QuadVertex {
        position: [-1.0, -1.0], // bottom-left
    },
    QuadVertex {
        position: [-1.0, 1.0], // top-left
    },
];

impl QuadVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    /// Buffer layout for the single position attribute at location 0.
    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_spans_full_clip_space() {
        for vertex in QUAD_VERTICES {
            for component in vertex.position {
                assert!(component == 1.0 || component == -1.0);
            }
        }
        assert!(QUAD_VERTICES
            .iter()
            .any(|v| v.position == [-1.0, -1.0]));
        assert!(QUAD_VERTICES.iter().any(|v| v.position == [1.0, 1.0]));
    }

    #[test]
    fn triangles_share_the_quad_diagonal() {
        // Both triangles must contain the bottom-right/top-left diagonal.
        let first = &QUAD_VERTICES[..3];
        let second = &QUAD_VERTICES[3..];
        for corner in [[1.0, -1.0], [-1.0, 1.0]] {
            assert!(first.iter().any(|v| v.position == corner));
            assert!(second.iter().any(|v| v.position == corner));
        }
    }

    #[test]
    fn vertex_bytes_are_stable() {
        let bytes: &[u8] = bytemuck::cast_slice(&QUAD_VERTICES);
        assert_eq!(bytes.len(), 6 * 2 * std::mem::size_of::<f32>());

        let expected: [[f32; 2]; 6] = [
            [-1.0, 1.0],
            [1.0, 1.0],
            [1.0, -1.0],
            [1.0, -1.0],
            [-1.0, -1.0],
            [-1.0, 1.0],
        ];
        assert_eq!(bytes, bytemuck::cast_slice::<_, u8>(&expected));
    }

    #[test]
    fn layout_matches_vertex_stride() {
        let layout = QuadVertex::layout();
        assert_eq!(layout.array_stride, 8);
        assert_eq!(layout.attributes.len(), 1);
        assert_eq!(layout.attributes[0].shader_location, 0);
    }
}
