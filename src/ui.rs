//! Menu, HUD, and dialogue overlays.
//!
//! UI entities are part of Bevy's ECS; each overlay is spawned on state
//! entry and despawned on exit, so its text components are dropped
//! automatically with it. The HUD survives the Playing <-> Transitioning
//! flip because both states belong to one run.

use bevy::prelude::*;

use crate::level::Level;
use crate::player::Player;
use crate::render::current_dialogue_line;
use crate::state::GameState;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Menu), spawn_menu)
            .add_systems(OnExit(GameState::Menu), despawn::<MenuOverlay>)
            .add_systems(OnEnter(GameState::Playing), spawn_hud)
            .add_systems(OnEnter(GameState::Menu), despawn::<Hud>)
            .add_systems(OnEnter(GameState::Ending), despawn::<Hud>)
            .add_systems(OnEnter(GameState::Ending), spawn_ending)
            .add_systems(OnExit(GameState::Ending), despawn::<EndingOverlay>)
            .add_systems(
                Update,
                update_hud.run_if(in_state(GameState::Playing)),
            );
    }
}

#[derive(Component)]
struct MenuOverlay;

#[derive(Component)]
struct Hud;

#[derive(Component)]
struct StatusText;

#[derive(Component)]
struct DialogueText;

#[derive(Component)]
struct EndingOverlay;

fn spawn_menu(mut commands: Commands) {
    commands
        .spawn((
            MenuOverlay,
            Name::new("MenuOverlay"),
            NodeBundle {
                background_color: BackgroundColor(Color::srgba(0.02, 0.02, 0.05, 0.95)),
                style: Style {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::Center,
                    row_gap: Val::Px(24.0),
                    ..default()
                },
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn(TextBundle::from_section(
                "Dungeon Escape",
                TextStyle {
                    font_size: 64.0,
                    color: Color::srgb(0.9, 0.85, 0.6),
                    ..default()
                },
            ));
            parent.spawn(TextBundle::from_section(
                "Press ENTER to descend\nPress ESC to quit",
                TextStyle {
                    font_size: 28.0,
                    color: Color::srgba(0.8, 0.8, 0.8, 1.0),
                    ..default()
                },
            ));
        });
}

/// Spawns the in-run HUD. Re-entering Playing after a level transition finds
/// the HUD still alive and leaves it alone.
fn spawn_hud(mut commands: Commands, existing: Query<(), With<Hud>>) {
    if !existing.is_empty() {
        return;
    }

    commands
        .spawn((
            Hud,
            Name::new("Hud"),
            NodeBundle {
                style: Style {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    justify_content: JustifyContent::SpaceBetween,
                    padding: UiRect::all(Val::Px(12.0)),
                    ..default()
                },
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                StatusText,
                TextBundle::from_section(
                    String::new(),
                    TextStyle {
                        font_size: 22.0,
                        color: Color::srgba(0.9, 0.9, 0.9, 1.0),
                        ..default()
                    },
                ),
            ));
            parent.spawn((
                DialogueText,
                TextBundle::from_section(
                    String::new(),
                    TextStyle {
                        font_size: 26.0,
                        color: Color::srgb(0.95, 0.9, 0.7),
                        ..default()
                    },
                )
                .with_style(Style {
                    align_self: AlignSelf::Center,
                    margin: UiRect::bottom(Val::Px(40.0)),
                    ..default()
                }),
            ));
        });
}

fn spawn_ending(mut commands: Commands) {
    commands
        .spawn((
            EndingOverlay,
            Name::new("EndingOverlay"),
            NodeBundle {
                background_color: BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.85)),
                style: Style {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::Center,
                    ..default()
                },
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn(TextBundle::from_section(
                "You broke free of the dungeon.",
                TextStyle {
                    font_size: 40.0,
                    color: Color::srgb(0.95, 0.9, 0.7),
                    ..default()
                },
            ));
        });
}

fn update_hud(
    player: Res<Player>,
    level: Res<Level>,
    mut status: Query<&mut Text, (With<StatusText>, Without<DialogueText>)>,
    mut dialogue: Query<&mut Text, (With<DialogueText>, Without<StatusText>)>,
) {
    if let Ok(mut text) = status.get_single_mut() {
        let mut abilities = Vec::new();
        if player.abilities.jump {
            abilities.push("jump");
        }
        if player.abilities.double_jump {
            abilities.push("double jump");
        }
        if player.abilities.fireball {
            abilities.push("fireball");
        }

        let mut line = format!(
            "Floor {}   Keys: {}   Abilities: {}",
            level.id + 1,
            player.keys,
            if abilities.is_empty() {
                "none".to_owned()
            } else {
                abilities.join(", ")
            },
        );
        if player.on_drop_platform {
            line.push_str("   (S to drop down)");
        }
        text.sections[0].value = line;
    }

    if let Ok(mut text) = dialogue.get_single_mut() {
        text.sections[0].value = current_dialogue_line(&level).unwrap_or("").to_owned();
    }
}

fn despawn<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}
