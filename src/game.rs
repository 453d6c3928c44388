//! Top-level game flow: the level catalogue, the Menu/Playing/Transitioning/
//! Ending mode switch, and the per-tick orchestration of player, fireballs,
//! and level rules.
//!
//! Entering Playing always goes through `enter_level`, which constructs a
//! fresh `Level` and repositions the existing `Player`; nothing is ever
//! re-entered with stale data.

use bevy::app::AppExit;
use bevy::prelude::*;

use crate::audio::AudioEvent;
use crate::dialogue::Npc;
use crate::entities::DoorTarget;
use crate::input::InputState;
use crate::level::{parse_catalogue, Level, LevelDef, LevelEvents};
use crate::player::{Player, StepEvents};
use crate::state::{GameSet, GameState};
use crate::transition::{LevelSnapshot, TransitionState};

/// Stand-in for the ending cinematic's completion signal: the Ending state
/// returns to the menu after this many ticks.
pub const ENDING_TICKS: u32 = 1800;

const LEVELS_JSON: &str = include_str!("../assets/levels.json");

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelCursor>()
            .add_systems(Startup, load_catalogue)
            .add_systems(Update, menu_input.run_if(in_state(GameState::Menu)))
            .add_systems(
                FixedUpdate,
                (
                    (step_player, step_fireballs)
                        .chain()
                        .in_set(GameSet::Movement),
                    (update_level, interact_npcs, check_doors)
                        .chain()
                        .in_set(GameSet::Interaction),
                )
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                FixedUpdate,
                tick_ending.run_if(in_state(GameState::Ending)),
            );
    }
}

/// The validated level definitions, parsed once at startup.
#[derive(Resource)]
pub struct LevelCatalogue(pub Vec<LevelDef>);

/// Which level is active and which one the player most recently departed.
/// The departure id drives NPC dialogue provenance.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct LevelCursor {
    pub current: usize,
    pub from: usize,
}

/// Countdown for the ending sequence.
#[derive(Resource, Debug)]
pub struct EndingTimer(pub u32);

fn load_catalogue(mut commands: Commands, mut exit: EventWriter<AppExit>) {
    match parse_catalogue(LEVELS_JSON) {
        Ok(defs) => {
            info!("Loaded {} levels.", defs.len());
            commands.insert_resource(LevelCatalogue(defs));
        }
        Err(err) => {
            error!("Invalid level data: {err}");
            exit.send(AppExit::error());
        }
    }
}

/// Builds the level at `index` and moves the player to its start, applying
/// its ability grants as a set union. The caller decides which state to
/// enter afterwards.
fn enter_level(catalogue: &LevelCatalogue, index: usize, player: &mut Player) -> Level {
    let level = Level::from_def(index, &catalogue.0[index]);
    player.set_position(level.player_start.x, level.player_start.y);
    player.abilities.grant(level.abilities);
    level
}

fn menu_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    catalogue: Option<Res<LevelCatalogue>>,
    mut cursor: ResMut<LevelCursor>,
    mut commands: Commands,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        exit.send(AppExit::Success);
        return;
    }

    if !keyboard.just_pressed(KeyCode::Enter) {
        return;
    }

    let Some(catalogue) = catalogue else {
        return;
    };

    // A fresh run: new player, level 0, no carried-over keys or abilities.
    let mut player = Player::new(0.0, 0.0);
    let level = enter_level(&catalogue, 0, &mut player);
    *cursor = LevelCursor::default();

    commands.insert_resource(player);
    commands.insert_resource(level);
    next_state.set(GameState::Playing);
}

fn step_player(
    input: Res<InputState>,
    level: Res<Level>,
    mut player: ResMut<Player>,
    mut audio: EventWriter<AudioEvent>,
) {
    let events = player.update(&input, &level.platforms);
    send_step_audio(&events, &mut audio);
}

fn send_step_audio(events: &StepEvents, audio: &mut EventWriter<AudioEvent>) {
    if events.jumped {
        audio.send(AudioEvent::Jump);
    }
    if events.cast_fireball {
        audio.send(AudioEvent::FireballCast);
    }
    if events.footsteps_started {
        audio.send(AudioEvent::FootstepsStart);
    }
    if events.footsteps_stopped {
        audio.send(AudioEvent::FootstepsStop);
    }
}

fn step_fireballs(mut level: ResMut<Level>, mut player: ResMut<Player>) {
    let Level {
        platforms, boxes, ..
    } = &mut *level;
    player.update_fireballs(platforms, boxes);
}

fn update_level(
    cursor: Res<LevelCursor>,
    mut level: ResMut<Level>,
    mut player: ResMut<Player>,
    mut audio: EventWriter<AudioEvent>,
) {
    let events = level.update(&mut player, cursor.from);
    for _ in 0..events.doors_unlocked {
        audio.send(AudioEvent::DoorUnlock);
    }
}

fn interact_npcs(input: Res<InputState>, cursor: Res<LevelCursor>, mut level: ResMut<Level>) {
    if !input.interact {
        return;
    }
    let LevelCursor { current, from } = *cursor;
    for npc in &mut level.npcs {
        if npc.show_prompt {
            npc.interact(from, current);
        }
    }
}

fn check_doors(
    catalogue: Res<LevelCatalogue>,
    mut cursor: ResMut<LevelCursor>,
    mut commands: Commands,
    level: Res<Level>,
    mut player: ResMut<Player>,
    mut transition: ResMut<TransitionState>,
    mut audio: EventWriter<AudioEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(door) = level.door_entered(&player) else {
        return;
    };

    match door.target {
        DoorTarget::Exit => {
            audio.send(AudioEvent::EndingBegin);
            commands.insert_resource(EndingTimer(ENDING_TICKS));
            next_state.set(GameState::Ending);
        }
        DoorTarget::Level(target) => {
            let snapshot = LevelSnapshot {
                level: level.clone(),
                player_bounds: player.body.bounds,
                facing_right: player.facing_right,
            };

            cursor.from = cursor.current;
            let next_level = enter_level(&catalogue, target, &mut player);
            cursor.current = target;

            transition.begin(cursor.from, target, snapshot);
            commands.insert_resource(next_level);
            next_state.set(GameState::Transitioning);
        }
    }
}

fn tick_ending(
    mut timer: ResMut<EndingTimer>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    timer.0 = timer.0.saturating_sub(1);
    if timer.0 == 0 {
        next_state.set(GameState::Menu);
    }
}

/// What one simulated tick produced, for callers outside the ECS.
#[derive(Debug, Default, Clone, Copy)]
pub struct TickOutcome {
    pub step: StepEvents,
    pub level: LevelEvents,
    /// Set when the player ended the tick inside an unlocked door.
    pub transfer: Option<DoorTarget>,
}

/// One full simulation tick over plain state: player movement, fireball
/// flight, level interaction rules, NPC interaction, and door traversal
/// detection. The fixed-update systems above mirror this composition; tests
/// drive whole ticks through here without an ECS world.
pub fn advance_tick(
    player: &mut Player,
    level: &mut Level,
    input: &InputState,
    cursor: LevelCursor,
) -> TickOutcome {
    let step = player.update(input, &level.platforms);

    {
        let Level {
            platforms, boxes, ..
        } = &mut *level;
        player.update_fireballs(platforms, boxes);
    }

    let level_events = level.update(player, cursor.from);

    if input.interact {
        for npc in &mut level.npcs {
            if npc.show_prompt {
                npc.interact(cursor.from, cursor.current);
            }
        }
    }

    let transfer = level.door_entered(player).map(|door| door.target);

    TickOutcome {
        step,
        level: level_events,
        transfer,
    }
}

/// Shared by the renderer: the NPC line currently on screen, if any.
pub fn active_dialogue(npcs: &[Npc]) -> Option<&Npc> {
    npcs.iter()
        .find(|npc| npc.talking && npc.current_line.is_some())
}
