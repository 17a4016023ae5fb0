use globe_common::GeoCoord;
use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::data::scene::SceneInputs;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputCommand {
    SetActive(bool),
    SelectPosition(Option<GeoCoord>),
}

/// Keyboard stand-in for the surrounding UI: `Tab` toggles whether the globe is in
/// the foreground, `Space` selects the demo position or clears the selection.
pub struct InputController {
    demo_position: GeoCoord,
}

impl InputController {
    pub fn new(demo_position: GeoCoord) -> Self {
        Self { demo_position }
    }

    pub fn process_events(
        &self,
        event: &WindowEvent,
        inputs: &SceneInputs,
    ) -> Option<InputCommand> {
        match *event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(keycode),
                        repeat: false,
                        ..
                    },
                ..
            } => self.process_key(keycode, state, inputs),
            _ => None,
        }
    }

    pub fn process_key(
        &self,
        keycode: KeyCode,
        state: ElementState,
        inputs: &SceneInputs,
    ) -> Option<InputCommand> {
        if state != ElementState::Pressed {
            return None;
        }

        match keycode {
            KeyCode::Tab => Some(InputCommand::SetActive(!inputs.active)),
            // interaction is disabled while the globe is in the background
            _ if !inputs.active => None,
            KeyCode::Space => Some(InputCommand::SelectPosition(match inputs.selected {
                Some(_) => None,
                None => Some(self.demo_position),
            })),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn controller() -> InputController {
        InputController::new(GeoCoord::new(49.35, 20.21))
    }

    #[rstest]
    #[case(true, false)]
    #[case(false, true)]
    fn tab_toggles_active(#[case] active: bool, #[case] expected: bool) {
        let inputs = SceneInputs {
            active,
            selected: None,
        };
        assert_eq!(
            controller().process_key(KeyCode::Tab, ElementState::Pressed, &inputs),
            Some(InputCommand::SetActive(expected))
        );
    }

    #[test]
    fn space_toggles_selection() {
        let controller = controller();
        let mut inputs = SceneInputs::default();

        let select = controller.process_key(KeyCode::Space, ElementState::Pressed, &inputs);
        assert_eq!(
            select,
            Some(InputCommand::SelectPosition(Some(GeoCoord::new(49.35, 20.21))))
        );

        inputs.selected = Some(GeoCoord::new(49.35, 20.21));
        let clear = controller.process_key(KeyCode::Space, ElementState::Pressed, &inputs);
        assert_eq!(clear, Some(InputCommand::SelectPosition(None)));
    }

    #[test]
    fn inactive_view_ignores_selection() {
        let inputs = SceneInputs {
            active: false,
            selected: None,
        };
        assert_eq!(
            controller().process_key(KeyCode::Space, ElementState::Pressed, &inputs),
            None
        );
    }

    #[test]
    fn releases_are_ignored() {
        assert_eq!(
            controller().process_key(KeyCode::Tab, ElementState::Released, &SceneInputs::default()),
            None
        );
    }
}
