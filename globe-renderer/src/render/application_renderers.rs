use glam::{Vec3, vec3};
use wgpu::TextureFormat;
use winit::dpi::PhysicalSize;

use super::{
    geometry::generate_data_ring, line_renderer::LineRenderer, shell_renderer::ShellRenderer,
    texture::DepthTexture,
};

pub const DATA_RING_RADIUS: f32 = 1.25;
pub const DATA_RING_COLOR: Vec3 = vec3(0.2, 0.45, 0.8);
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.02,
    a: 1.0,
};

pub struct ApplicationRenderers {
    pub shells: ShellRenderer,
    pub lines: LineRenderer,
    depth_texture: DepthTexture,
}

impl ApplicationRenderers {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: TextureFormat,
        target_size: PhysicalSize<u32>,
    ) -> Self {
        let shells = ShellRenderer::new(device, format);

        let mut lines = LineRenderer::new(device, format);
        lines.set_ring(
            device,
            queue,
            &generate_data_ring(DATA_RING_RADIUS, 128, DATA_RING_COLOR),
        );
        lines.set_marker(device, queue, None);

        let depth_texture = DepthTexture::new(device, target_size);

        Self {
            shells,
            lines,
            depth_texture,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, target_size: PhysicalSize<u32>) {
        if !self.depth_texture.fits(target_size) {
            self.depth_texture = DepthTexture::new(device, target_size);
        }
    }

    pub fn render(&self, view: &wgpu::TextureView, encoder: &mut wgpu::CommandEncoder) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("globe render pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: self.depth_texture.view(),
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        self.shells.render(&mut pass);
        self.lines.render(&mut pass);
    }
}
