//! High-level plugin composition.
//!
//! The `DungeonEscapePlugin` glues together all domain-specific plugins
//! (input, game flow, transition, audio, rendering, UI) and sets up system
//! ordering. Each subsystem is responsible for its own state; this
//! orchestrator merely registers them with the Bevy application.

use bevy::prelude::*;

use crate::audio::GameAudioPlugin;
use crate::game::GamePlugin;
use crate::input::InputPlugin;
use crate::render::RenderPlugin;
use crate::state::{GameSet, GameState};
use crate::transition::TransitionPlugin;
use crate::ui::UiPlugin;

/// Bundles every gameplay-centric plugin into a single unit that can be added
/// to the Bevy `App`.
pub struct DungeonEscapePlugin;

impl Plugin for DungeonEscapePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            // The whole simulation advances on the fixed clock; rendering and
            // UI stay on the frame clock.
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .add_plugins((
                InputPlugin,      // Keyboard/mouse snapshot per tick.
                GamePlugin,       // Level catalogue + mode switch + tick orchestration.
                TransitionPlugin, // Level swipe progress.
                GameAudioPlugin,  // Audio handle preloading + cue playback.
                RenderPlugin,     // Gizmo scene drawing.
                UiPlugin,         // Menu, HUD, and ending overlays.
            ))
            // One fixed tick runs Input -> Movement -> Interaction in order;
            // `chain()` keeps writes to the player and level deterministic.
            .configure_sets(
                FixedUpdate,
                (GameSet::Input, GameSet::Movement, GameSet::Interaction)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(Startup, setup_camera);
    }
}

/// Spawns the single fixed 2D camera. The playfield never scrolls, so the
/// camera stays at the world origin.
fn setup_camera(mut commands: Commands) {
    commands.spawn((Name::new("MainCamera"), Camera2dBundle::default()));
}
