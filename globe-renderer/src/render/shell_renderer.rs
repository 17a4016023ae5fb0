use glam::{Mat4, Vec3, vec3};

use super::{
    buffer::Buffer,
    data::ModelUniforms,
    geometry::{GLOBE_RADIUS, Mesh, generate_sphere},
    pipeline::{Pipeline, UniformBinding},
};

pub const GLOW_RADIUS: f32 = 1.08;
const SPHERE_TINT: Vec3 = vec3(0.04, 0.09, 0.18);
const GLOW_TINT: Vec3 = vec3(0.25, 0.55, 1.0);

struct ShellMesh {
    pipeline: Pipeline,
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    index_count: u32,
    uniforms: UniformBinding,
}

impl ShellMesh {
    fn new(device: &wgpu::Device, pipeline: Pipeline, mesh: &Mesh, label: &'static str) -> Self {
        let vertex_buffer = Buffer::with_contents(
            device,
            label,
            &mesh.vertices,
            wgpu::BufferUsages::VERTEX,
        );
        let index_buffer =
            Buffer::with_contents(device, label, &mesh.indices, wgpu::BufferUsages::INDEX);
        let uniforms = UniformBinding::new(device, &pipeline, label);

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            uniforms,
        }
    }

    fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(self.pipeline.get_pipeline());
        pass.set_bind_group(0, self.uniforms.get_bind_group(), &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.raw.slice(..));
        pass.set_index_buffer(self.index_buffer.raw.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// The opaque globe body and the additive atmosphere glow around it.
pub struct ShellRenderer {
    sphere: ShellMesh,
    glow: ShellMesh,
}

impl ShellRenderer {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let sphere_pipeline = Pipeline::create_shell_pipeline(
            device,
            format,
            "sphere pipeline",
            wgpu::Face::Back,
            wgpu::BlendState::REPLACE,
            true,
        );
        let sphere = ShellMesh::new(
            device,
            sphere_pipeline,
            &generate_sphere(GLOBE_RADIUS, 48, 96),
            "sphere shell",
        );

        // only the far side of the glow shell is drawn, so it rims the globe
        let glow_pipeline = Pipeline::create_shell_pipeline(
            device,
            format,
            "glow pipeline",
            wgpu::Face::Front,
            Pipeline::additive_blend(),
            false,
        );
        let glow = ShellMesh::new(
            device,
            glow_pipeline,
            &generate_sphere(GLOW_RADIUS, 32, 64),
            "glow shell",
        );

        Self { sphere, glow }
    }

    pub fn update(
        &self,
        queue: &wgpu::Queue,
        view_proj: Mat4,
        camera_pos: Vec3,
        globe_model: Mat4,
        glow_intensity: f32,
    ) {
        self.sphere.uniforms.write(
            queue,
            &ModelUniforms::new(view_proj, globe_model, SPHERE_TINT, 1.0, camera_pos),
        );
        self.glow.uniforms.write(
            queue,
            &ModelUniforms::new(
                view_proj,
                Mat4::IDENTITY,
                GLOW_TINT,
                glow_intensity,
                camera_pos,
            ),
        );
    }

    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        self.sphere.render(pass);
        self.glow.render(pass);
    }
}
