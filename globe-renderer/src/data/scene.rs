#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use globe_common::GeoCoord;
#[cfg(target_arch = "wasm32")]
use web_time::Duration;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SceneSettings {
    /// radians per second of spin time
    pub rotation_speed: f32,
    pub inactive_speed_factor: f32,
    pub ring_pulse_amplitude: f32,
    pub ring_pulse_frequency: f32,
    pub glow_base: f32,
    pub glow_amplitude: f32,
    pub glow_frequency: f32,
    pub intro_duration: f32,
    pub intro_start_distance: f32,
    pub intro_end_distance: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            rotation_speed: 0.15,
            inactive_speed_factor: 0.25,
            ring_pulse_amplitude: 0.03,
            ring_pulse_frequency: 2.0,
            glow_base: 0.55,
            glow_amplitude: 0.15,
            glow_frequency: 1.5,
            intro_duration: 2.5,
            intro_start_distance: 6.0,
            intro_end_distance: 3.2,
        }
    }
}

/// Inputs owned by the surrounding UI: whether the globe view is in the foreground
/// and which point, if any, is selected.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SceneInputs {
    pub active: bool,
    pub selected: Option<GeoCoord>,
}

impl Default for SceneInputs {
    fn default() -> Self {
        Self {
            active: true,
            selected: None,
        }
    }
}

/// The only animation state kept between frames.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SceneClock {
    /// seconds since the view was mounted
    pub elapsed: f32,
    /// seconds of autorotation, paused while a position is selected
    pub spin: f32,
}

impl SceneClock {
    pub fn advance(&mut self, time_delta: Duration, inputs: &SceneInputs, settings: &SceneSettings) {
        let dt = time_delta.as_secs_f32();
        self.elapsed += dt;
        if inputs.selected.is_none() {
            let factor = if inputs.active {
                1.0
            } else {
                settings.inactive_speed_factor
            };
            self.spin += dt * factor;
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GlobeTransform {
    pub rotation_y: f32,
    pub ring_scale: f32,
    pub glow_intensity: f32,
    pub marker_visible: bool,
}

pub fn transform_at(
    clock: &SceneClock,
    inputs: &SceneInputs,
    settings: &SceneSettings,
) -> GlobeTransform {
    GlobeTransform {
        rotation_y: clock.spin * settings.rotation_speed,
        ring_scale: 1.0
            + settings.ring_pulse_amplitude * (settings.ring_pulse_frequency * clock.elapsed).sin(),
        glow_intensity: settings.glow_base
            + settings.glow_amplitude * (settings.glow_frequency * clock.elapsed).sin(),
        marker_visible: inputs.selected.is_some(),
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntroCamera {
    pub distance: f32,
    pub finished: bool,
}

/// Cubic ease-out from the start to the end distance.
pub fn intro_camera_at(elapsed: f32, settings: &SceneSettings) -> IntroCamera {
    let t = if settings.intro_duration > 0.0 {
        (elapsed / settings.intro_duration).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let eased = 1.0 - (1.0 - t).powi(3);

    IntroCamera {
        distance: settings.intro_start_distance
            + (settings.intro_end_distance - settings.intro_start_distance) * eased,
        finished: t >= 1.0,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    use super::*;

    fn run(clock: &mut SceneClock, inputs: SceneInputs, seconds: u32) {
        let settings = SceneSettings::default();
        for _ in 0..seconds * 10 {
            clock.advance(Duration::from_millis(100), &inputs, &settings);
        }
    }

    #[test]
    fn selection_pauses_rotation() {
        let mut clock = SceneClock::default();
        run(&mut clock, SceneInputs::default(), 2);
        let spin = clock.spin;

        run(
            &mut clock,
            SceneInputs {
                active: true,
                selected: Some(GeoCoord::new(10.0, 20.0)),
            },
            3,
        );

        assert_abs_diff_eq!(clock.spin, spin, epsilon = 1e-6);
        assert_abs_diff_eq!(clock.elapsed, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn inactive_view_rotates_slower() {
        let mut active = SceneClock::default();
        let mut inactive = SceneClock::default();
        run(&mut active, SceneInputs::default(), 4);
        run(
            &mut inactive,
            SceneInputs {
                active: false,
                selected: None,
            },
            4,
        );

        let settings = SceneSettings::default();
        assert_abs_diff_eq!(
            inactive.spin,
            active.spin * settings.inactive_speed_factor,
            epsilon = 1e-4
        );
    }

    #[test]
    fn transform_is_pure() {
        let clock = SceneClock {
            elapsed: 12.5,
            spin: 7.0,
        };
        let inputs = SceneInputs::default();
        let settings = SceneSettings::default();

        let transform = transform_at(&clock, &inputs, &settings);
        assert_eq!(transform, transform_at(&clock, &inputs, &settings));
        assert_abs_diff_eq!(transform.rotation_y, 7.0 * settings.rotation_speed);
        assert!(!transform.marker_visible);
        assert!((transform.ring_scale - 1.0).abs() <= settings.ring_pulse_amplitude);
    }

    #[test]
    fn marker_follows_selection() {
        let inputs = SceneInputs {
            active: false,
            selected: Some(GeoCoord::new(0.0, 0.0)),
        };
        let transform = transform_at(&SceneClock::default(), &inputs, &SceneSettings::default());
        assert!(transform.marker_visible);
    }

    #[rstest]
    #[case(0.0, 6.0, false)]
    #[case(-1.0, 6.0, false)]
    #[case(2.5, 3.2, true)]
    #[case(100.0, 3.2, true)]
    fn intro_camera(#[case] elapsed: f32, #[case] distance: f32, #[case] finished: bool) {
        let camera = intro_camera_at(elapsed, &SceneSettings::default());
        assert_abs_diff_eq!(camera.distance, distance, epsilon = 1e-5);
        assert_eq!(camera.finished, finished);
    }

    #[test]
    fn intro_camera_approaches_monotonically() {
        let settings = SceneSettings::default();
        let distances = (0..=25)
            .map(|i| intro_camera_at(i as f32 * 0.1, &settings).distance)
            .collect::<Vec<_>>();
        assert!(distances.windows(2).all(|pair| pair[1] <= pair[0]));
    }
}
