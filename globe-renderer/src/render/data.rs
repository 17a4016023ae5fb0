use glam::{Mat4, Vec3, Vec4};

/// Line segments as parallel point/colour arrays, consumed pairwise by a line list draw.
/// Both arrays always have the same, even, length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentBuffer {
    points: Vec<Vec3>,
    colors: Vec<Vec3>,
}

impl SegmentBuffer {
    pub fn with_capacity(segments: usize) -> Self {
        Self {
            points: Vec::with_capacity(2 * segments),
            colors: Vec::with_capacity(2 * segments),
        }
    }

    pub fn push_segment(&mut self, start: Vec3, end: Vec3, color: Vec3) {
        self.points.extend([start, end]);
        self.colors.extend([color, color]);
    }

    pub fn extend(&mut self, other: SegmentBuffer) {
        self.points.extend(other.points);
        self.colors.extend(other.colors);
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn segment_count(&self) -> usize {
        self.points.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = ((Vec3, Vec3), Vec3)> {
        self.points
            .chunks_exact(2)
            .zip(self.colors.chunks_exact(2))
            .map(|(points, colors)| ((points[0], points[1]), colors[0]))
    }

    pub fn to_vertices(&self) -> Vec<LineVertex> {
        self.points
            .iter()
            .zip(self.colors.iter())
            .map(|(position, color)| LineVertex::new(*position, *color))
            .collect()
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl LineVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        // position
        0 => Float32x3,
        // color
        1 => Float32x3
    ];

    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShellVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl ShellVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        // position
        0 => Float32x3,
        // normal
        1 => Float32x3
    ];

    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Per-draw uniforms shared by the line and shell shaders.
/// The alpha channel of `tint` is the intensity multiplier.
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct ModelUniforms {
    view_proj: Mat4,
    model: Mat4,
    tint: Vec4,
    camera_pos: Vec4,
}

impl ModelUniforms {
    pub fn new(view_proj: Mat4, model: Mat4, tint: Vec3, intensity: f32, camera_pos: Vec3) -> Self {
        Self {
            view_proj,
            model,
            tint: Vec4::from((tint, intensity)),
            camera_pos: Vec4::from((camera_pos, 1.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_keep_points_and_colors_aligned() {
        let mut buffer = SegmentBuffer::default();
        buffer.push_segment(Vec3::X, Vec3::Y, Vec3::ONE);

        let mut other = SegmentBuffer::with_capacity(1);
        other.push_segment(Vec3::Z, Vec3::NEG_Z, Vec3::splat(0.3));
        buffer.extend(other);

        assert_eq!(buffer.segment_count(), 2);
        assert_eq!(buffer.points().len(), buffer.colors().len());
        assert_eq!(
            buffer.segments().collect::<Vec<_>>(),
            vec![
                ((Vec3::X, Vec3::Y), Vec3::ONE),
                ((Vec3::Z, Vec3::NEG_Z), Vec3::splat(0.3)),
            ]
        );
    }

    #[test]
    fn vertices_interleave_position_and_color() {
        let mut buffer = SegmentBuffer::default();
        buffer.push_segment(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::new(0.5, 0.25, 0.0));

        let vertices = buffer.to_vertices();
        assert_eq!(
            vertices,
            vec![
                LineVertex {
                    position: [1.0, 2.0, 3.0],
                    color: [0.5, 0.25, 0.0],
                },
                LineVertex {
                    position: [0.0, 0.0, 0.0],
                    color: [0.5, 0.25, 0.0],
                },
            ]
        );
        assert_eq!(
            bytemuck::cast_slice::<_, u8>(vertices.as_slice()).len(),
            2 * 6 * std::mem::size_of::<f32>()
        );
    }
}
