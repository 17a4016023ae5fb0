use glam::{Mat4, Vec3};

pub const NEAR: f32 = 0.05;
pub const FAR: f32 = 100.0;

/// Camera orbiting the globe centre at a fixed tilt.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    pub distance: f32,
    // radians above the equatorial plane
    pub tilt: f32,
    fov_y: f32,
    near: f32,
    far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            distance: 6.0,
            tilt: 0.3,
            fov_y: 45.0f32.to_radians(),
            near: NEAR,
            far: FAR,
        }
    }
}

impl Camera {
    pub fn eye(&self) -> Vec3 {
        Vec3::new(0.0, self.tilt.sin(), self.tilt.cos()) * self.distance
    }

    pub fn get_view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    pub fn build_view_proj_matrix(&self, width: f32, height: f32) -> Mat4 {
        let aspect_ratio = width / height.max(1.0);

        let proj = Mat4::perspective_rh(self.fov_y, aspect_ratio, self.near, self.far);

        proj * self.get_view()
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance;
    }
}
