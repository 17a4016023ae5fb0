use glam::{Mat4, Vec3};

use super::{
    buffer::Buffer,
    data::{ModelUniforms, SegmentBuffer},
    pipeline::{Pipeline, UniformBinding},
};

struct LineLayer {
    vertex_buffer: Buffer,
    vertex_count: u32,
    uniforms: UniformBinding,
    visible: bool,
}

impl LineLayer {
    fn new(device: &wgpu::Device, pipeline: &Pipeline, label: &'static str) -> Self {
        Self {
            vertex_buffer: Buffer::empty(
                device,
                label,
                wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            ),
            vertex_count: 0,
            uniforms: UniformBinding::new(device, pipeline, label),
            visible: true,
        }
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, segments: &SegmentBuffer) {
        self.vertex_count = self
            .vertex_buffer
            .write(device, queue, &segments.to_vertices());
    }

    fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.visible && self.vertex_count > 0 {
            pass.set_bind_group(0, self.uniforms.get_bind_group(), &[]);
            pass.set_vertex_buffer(0, self.vertex_buffer.raw.slice(..));
            pass.draw(0..self.vertex_count, 0..1);
        }
    }
}

/// Draws the boundary mesh, the data ring and the selection marker
/// with one additive line list pipeline.
pub struct LineRenderer {
    pipeline: Pipeline,
    boundaries: LineLayer,
    ring: LineLayer,
    marker: LineLayer,
}

impl LineRenderer {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let pipeline = Pipeline::create_line_pipeline(device, format);
        let boundaries = LineLayer::new(device, &pipeline, "boundary lines");
        let ring = LineLayer::new(device, &pipeline, "data ring lines");
        let marker = LineLayer::new(device, &pipeline, "marker lines");

        Self {
            pipeline,
            boundaries,
            ring,
            marker,
        }
    }

    pub fn set_boundaries(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        segments: &SegmentBuffer,
    ) {
        self.boundaries.upload(device, queue, segments);
        log::info!(
            "Uploaded {} boundary segments",
            segments.segment_count()
        );
    }

    pub fn set_ring(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, segments: &SegmentBuffer) {
        self.ring.upload(device, queue, segments);
    }

    /// `None` hides the marker.
    pub fn set_marker(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        segments: Option<&SegmentBuffer>,
    ) {
        match segments {
            Some(segments) => {
                self.marker.upload(device, queue, segments);
                self.marker.visible = true;
            }
            None => self.marker.visible = false,
        }
    }

    pub fn update(
        &self,
        queue: &wgpu::Queue,
        view_proj: Mat4,
        camera_pos: Vec3,
        globe_model: Mat4,
        ring_model: Mat4,
    ) {
        let uniforms = |model| ModelUniforms::new(view_proj, model, Vec3::ONE, 1.0, camera_pos);
        self.boundaries.uniforms.write(queue, &uniforms(globe_model));
        self.marker.uniforms.write(queue, &uniforms(globe_model));
        self.ring.uniforms.write(queue, &uniforms(ring_model));
    }

    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(self.pipeline.get_pipeline());
        self.boundaries.render(pass);
        self.ring.render(pass);
        self.marker.render(pass);
    }
}
