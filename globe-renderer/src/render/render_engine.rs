use std::sync::Arc;

use color_eyre::{Result, eyre::Context};
use glam::{Mat4, Vec3, vec3};
use globe_common::GeoCoord;
use winit::{dpi::PhysicalSize, window::Window};

use crate::data::application_data::ApplicationData;

use super::{
    application_renderers::ApplicationRenderers, data::SegmentBuffer, geometry::generate_marker,
};

pub const MARKER_RADIUS: f32 = 1.01;
const MARKER_SIZE: f32 = 0.03;
const MARKER_COLOR: Vec3 = vec3(1.0, 0.85, 0.3);

/// This struct handles logic that necessarily requires access to wgpu primitives
/// and so must be done synchronously in a tight loop
pub struct RenderEngine {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    renderers: ApplicationRenderers,
    marker: Option<GeoCoord>,
}

impl RenderEngine {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .wrap_err("Unable to create a surface for the window")?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .wrap_err("No compatible graphics adapter")?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
                experimental_features: Default::default(),
            })
            .await
            .wrap_err("Unable to open the graphics device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Shaders output linear colours, so prefer an Srgb surface
        let format = {
            let mut format = surface_caps.formats[0];
            let format_srgb = format.add_srgb_suffix();
            if surface_caps.formats.contains(&format_srgb) {
                format = format_srgb;
            }
            format
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![format],
            desired_maximum_frame_latency: 2,
        };

        let renderers = ApplicationRenderers::new(&device, &queue, format, size);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            size,
            renderers,
            marker: None,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) -> bool {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            log::info!("surface configured");
            self.size = new_size;
            self.renderers.resize(&self.device, new_size);
            true
        } else {
            log::info!("Resize with 0,0 size...");
            false
        }
    }

    /// Uploads the tessellated boundaries; they live as long as the engine.
    pub fn set_boundaries(&mut self, segments: &SegmentBuffer) {
        self.renderers
            .lines
            .set_boundaries(&self.device, &self.queue, segments);
    }

    fn update_marker(&mut self, selected: Option<GeoCoord>) {
        if self.marker == selected {
            return;
        }
        self.marker = selected;
        let segments = selected
            .map(|coord| generate_marker(coord, MARKER_RADIUS, MARKER_SIZE, 24, MARKER_COLOR));
        self.renderers
            .lines
            .set_marker(&self.device, &self.queue, segments.as_ref());
    }

    pub fn update(&mut self, data: &ApplicationData) {
        let transform = data.transform();
        self.update_marker(data.inputs.selected.filter(|_| transform.marker_visible));

        let view_proj = data
            .camera
            .build_view_proj_matrix(self.size.width as f32, self.size.height as f32);
        let camera_pos = data.camera.eye();
        let globe_model = Mat4::from_rotation_y(transform.rotation_y);
        let ring_model = Mat4::from_scale(Vec3::splat(transform.ring_scale));

        self.renderers.shells.update(
            &self.queue,
            view_proj,
            camera_pos,
            globe_model,
            transform.glow_intensity,
        );
        self.renderers
            .lines
            .update(&self.queue, view_proj, camera_pos, globe_model, ring_model);
    }

    pub fn render(&mut self) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.config.format),
            ..Default::default()
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderers.render(&view, &mut encoder);

        self.queue.submit(Some(encoder.finish()));
        output.present();

        Ok(())
    }
}
