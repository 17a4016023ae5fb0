pub mod application_renderers;
pub mod boundary_mesh;
pub mod buffer;
pub mod data;
pub mod geometry;
pub mod line_renderer;
pub mod pipeline;
pub mod render_engine;
pub mod scanline;
pub mod shell_renderer;
pub mod texture;
