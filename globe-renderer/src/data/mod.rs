pub mod application_data;
pub mod camera;
pub mod palette;
pub mod scene;
