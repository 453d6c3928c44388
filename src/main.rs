//! Application entry point: composes the Bevy runtime, core plugins, and
//! window configuration, then defers to the `DungeonEscapePlugin` in
//! `app.rs`.

mod app;
mod audio;
mod collision;
mod dialogue;
mod entities;
mod game;
mod geometry;
mod input;
mod level;
mod player;
mod render;
mod state;
mod transition;
mod ui;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod wasm;

use app::DungeonEscapePlugin;
use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::window::{Window, WindowResolution};
use geometry::{SCREEN_HEIGHT, SCREEN_WIDTH};

fn main() {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    wasm::set_panic_hook();

    // The simulation assumes a fixed 1200x800 playfield, so the window is
    // locked to that logical resolution.
    let primary_window = Window {
        title: "Dungeon Escape".to_string(),
        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
        resizable: false,
        canvas: cfg!(all(target_arch = "wasm32", feature = "web"))
            .then(|| "#bevy-canvas".to_owned()),
        ..default()
    };

    let mut default_plugins = DefaultPlugins.set(WindowPlugin {
        primary_window: Some(primary_window),
        ..default()
    });

    #[cfg(not(target_arch = "wasm32"))]
    {
        default_plugins = default_plugins.set(AssetPlugin {
            file_path: "assets".to_owned(),
            watch_for_changes_override: Some(true),
            ..default()
        });
    }

    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        default_plugins = default_plugins.set(AssetPlugin {
            file_path: "assets".to_owned(),
            watch_for_changes_override: Some(false),
            ..default()
        });
    }

    App::new()
        .insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.08)))
        .add_plugins(default_plugins)
        .add_plugins(DungeonEscapePlugin)
        .run();
}
