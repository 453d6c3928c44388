//! Per-tick input sampling.
//!
//! The simulation never touches the keyboard or mouse directly; one system
//! snapshots everything into `InputState` at the start of each fixed tick and
//! the rest of the simulation reads that. Rising-edge detection is left to
//! the consumers, which track their own previous-tick flags.

use bevy::input::keyboard::KeyCode;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::state::{GameSet, GameState};

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputState>().add_systems(
            FixedUpdate,
            sample_input
                .in_set(GameSet::Input)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// One tick's worth of player intent, in simulation screen coordinates.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputState {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub drop: bool,
    pub interact: bool,
    pub cast: bool,
    /// Fireball aim point; tracks the cursor while one is available.
    pub aim: Vec2,
}

fn sample_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut input: ResMut<InputState>,
) {
    input.move_left = keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft);
    input.move_right = keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight);
    input.jump = keyboard.pressed(KeyCode::Space)
        || keyboard.pressed(KeyCode::KeyW)
        || keyboard.pressed(KeyCode::ArrowUp);
    input.drop = keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown);
    input.interact = keyboard.pressed(KeyCode::KeyE);
    input.cast = keyboard.pressed(KeyCode::KeyF) || mouse.pressed(MouseButton::Left);

    // Window cursor coordinates are already top-left origin, matching the
    // simulation's screen space.
    if let Ok(window) = windows.get_single() {
        if let Some(cursor) = window.cursor_position() {
            input.aim = cursor;
        }
    }
}
