#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use globe_common::GeoCoord;
#[cfg(target_arch = "wasm32")]
use web_time::Duration;

use crate::{
    data::{
        camera::Camera,
        scene::{
            GlobeTransform, SceneClock, SceneInputs, SceneSettings, intro_camera_at, transform_at,
        },
    },
    render::boundary_mesh::BoundaryMeshBuilder,
};

pub struct ApplicationData {
    pub inputs: SceneInputs,
    pub clock: SceneClock,
    pub scene_settings: SceneSettings,
    pub camera: Camera,
    pub mesh_builder: BoundaryMeshBuilder,
    boundary_generation: u64,
    pub intro_finished: bool,
}

impl ApplicationData {
    pub fn new() -> Self {
        let scene_settings = SceneSettings::default();
        let mut camera = Camera::default();
        camera.set_distance(scene_settings.intro_start_distance);

        Self {
            inputs: SceneInputs::default(),
            clock: SceneClock::default(),
            scene_settings,
            camera,
            mesh_builder: BoundaryMeshBuilder::default(),
            boundary_generation: 0,
            intro_finished: false,
        }
    }

    /// Starts a new view lifetime and returns the generation its boundary load belongs to.
    pub fn mount(&mut self) -> u64 {
        self.clock = SceneClock::default();
        self.camera.set_distance(self.scene_settings.intro_start_distance);
        self.intro_finished = false;
        self.boundary_generation += 1;
        self.boundary_generation
    }

    /// Invalidates any boundary load still in flight.
    pub fn unmount(&mut self) {
        self.boundary_generation += 1;
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.boundary_generation
    }

    pub fn set_active(&mut self, active: bool) {
        self.inputs.active = active;
    }

    pub fn select(&mut self, selected: Option<GeoCoord>) {
        self.inputs.selected = selected;
    }

    /// Returns true on the frame the intro animation finishes.
    pub fn advance(&mut self, time_delta: Duration) -> bool {
        self.clock
            .advance(time_delta, &self.inputs, &self.scene_settings);

        let intro = intro_camera_at(self.clock.elapsed, &self.scene_settings);
        self.camera.set_distance(intro.distance);

        let just_finished = intro.finished && !self.intro_finished;
        self.intro_finished = intro.finished;
        just_finished
    }

    pub fn transform(&self) -> GlobeTransform {
        transform_at(&self.clock, &self.inputs, &self.scene_settings)
    }
}

impl Default for ApplicationData {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn results_of_previous_mount_are_stale() {
        let mut data = ApplicationData::new();
        let first = data.mount();
        assert!(data.is_current(first));

        data.unmount();
        assert!(!data.is_current(first));

        let second = data.mount();
        assert!(data.is_current(second));
        assert!(!data.is_current(first));
    }

    #[test]
    fn intro_finishes_once() {
        let mut data = ApplicationData::new();
        data.mount();

        let finished = (0..40)
            .filter(|_| data.advance(Duration::from_millis(100)))
            .count();

        assert_eq!(finished, 1);
        assert!(data.intro_finished);
        assert_abs_diff_eq!(
            data.camera.distance,
            data.scene_settings.intro_end_distance,
            epsilon = 1e-5
        );
    }

    #[test]
    fn remount_restarts_intro() {
        let mut data = ApplicationData::new();
        data.mount();
        data.advance(Duration::from_secs(5));
        assert!(data.intro_finished);

        data.mount();
        assert!(!data.intro_finished);
        assert_eq!(data.clock, SceneClock::default());
        assert_eq!(
            data.camera.distance,
            data.scene_settings.intro_start_distance
        );
    }
}
