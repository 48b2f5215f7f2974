//! Input module - PlayerInput resource and capture_input system

use bevy::prelude::*;

use crate::constants::STICK_DEADZONE;

/// Input state shared by whichever actor is live.
/// Edge-triggered flags accumulate until a system consumes them.
#[derive(Resource, Debug, Default, Clone)]
pub struct PlayerInput {
    pub move_x: f32,
    pub jump_pressed: bool,  // Consumed by handle_jump
    pub crouch_held: bool,
    pub start_pressed: bool, // Consumed by handle_start_signal
}

/// Runs in Update, before the match systems read the resource
pub fn capture_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    gamepads: Query<&Gamepad>,
    mut input: ResMut<PlayerInput>,
) {
    // Horizontal movement (continuous - overwrite each frame)
    let mut move_x = 0.0;

    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        move_x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        move_x += 1.0;
    }

    for gamepad in &gamepads {
        if let Some(stick_x) = gamepad.get(GamepadAxis::LeftStickX)
            && stick_x.abs() > STICK_DEADZONE
        {
            move_x += stick_x;
        }
    }

    input.move_x = move_x.clamp(-1.0, 1.0);

    if keyboard.just_pressed(KeyCode::Space)
        || keyboard.just_pressed(KeyCode::KeyW)
        || keyboard.just_pressed(KeyCode::ArrowUp)
        || gamepads
            .iter()
            .any(|gp| gp.just_pressed(GamepadButton::South))
    {
        input.jump_pressed = true;
    }

    input.crouch_held = keyboard.pressed(KeyCode::ShiftLeft)
        || keyboard.pressed(KeyCode::KeyS)
        || keyboard.pressed(KeyCode::ArrowDown)
        || gamepads.iter().any(|gp| gp.pressed(GamepadButton::East));

    if keyboard.just_pressed(KeyCode::Enter)
        || gamepads.iter().any(|gp| gp.just_pressed(GamepadButton::Start))
    {
        input.start_pressed = true;
    }
}
