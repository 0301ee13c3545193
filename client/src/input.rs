use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    TurnLeft,
    TurnRight,
    ToggleInterpolation,
    DumpState,
}

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<InputAction>::default());

    app.register_type::<InputAction>();

    let mut input_map = InputMap::<InputAction>::default();
    input_map.insert(InputAction::MoveForward, KeyCode::KeyW);
    input_map.insert(InputAction::MoveBack, KeyCode::KeyS);
    input_map.insert(InputAction::MoveLeft, KeyCode::KeyA);
    input_map.insert(InputAction::MoveRight, KeyCode::KeyD);
    input_map.insert(InputAction::MoveUp, KeyCode::Space);
    input_map.insert(InputAction::MoveDown, KeyCode::ControlLeft);
    input_map.insert(InputAction::TurnLeft, KeyCode::KeyQ);
    input_map.insert(InputAction::TurnRight, KeyCode::KeyE);
    input_map.insert(InputAction::ToggleInterpolation, KeyCode::KeyI);
    input_map.insert(InputAction::DumpState, KeyCode::F3);
    app.insert_resource(input_map);
    app.insert_resource(ActionState::<InputAction>::default());
}

/// `1.0` for `positive` alone, `-1.0` for `negative` alone, otherwise `0.0`.
pub fn axis(actions: &ActionState<InputAction>, positive: InputAction, negative: InputAction) -> f32 {
    let mut value = 0.0;
    if actions.pressed(&positive) {
        value += 1.0;
    }
    if actions.pressed(&negative) {
        value -= 1.0;
    }
    value
}

/// Movement and look input in the simulation's local frame.
pub fn tick_input(actions: &ActionState<InputAction>) -> sim::TickInput {
    let movement = sim::Vec3::new(
        axis(actions, InputAction::MoveRight, InputAction::MoveLeft),
        axis(actions, InputAction::MoveUp, InputAction::MoveDown),
        axis(actions, InputAction::MoveForward, InputAction::MoveBack),
    );
    let look = sim::Vec2::new(
        axis(actions, InputAction::TurnRight, InputAction::TurnLeft),
        0.0,
    );
    sim::TickInput::new(movement, look)
}
