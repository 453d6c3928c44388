//! Shape-based scene drawing.
//!
//! The simulation runs in screen coordinates (origin top-left, y down);
//! Bevy's 2D world puts the origin at the camera center with y up. All
//! drawing goes through `to_world`, which performs that flip once, so the
//! simulation never has to know about it.
//!
//! During a transition both level states are drawn: the retained snapshot
//! slides out to the left while the active level slides in from the right,
//! both shifted by the transition's `offset_x`.

use bevy::prelude::*;

use crate::dialogue::Npc;
use crate::entities::{BreakableBox, Door, Fireball};
use crate::game;
use crate::geometry::{Bounds, Platform, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::level::Level;
use crate::player::Player;
use crate::state::GameState;
use crate::transition::TransitionState;

const KEY_SIZE: f32 = 14.0;
const PROMPT_RADIUS_DOT: f32 = 5.0;

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                draw_scene.run_if(in_state(GameState::Playing)),
                draw_transition.run_if(in_state(GameState::Transitioning)),
            ),
        );
    }
}

/// Screen-space point to world-space point.
fn to_world(point: Vec2) -> Vec2 {
    Vec2::new(
        point.x - SCREEN_WIDTH * 0.5,
        SCREEN_HEIGHT * 0.5 - point.y,
    )
}

fn rect(gizmos: &mut Gizmos, bounds: &Bounds, shift_x: f32, color: Color) {
    let center = bounds.center() + Vec2::new(shift_x, 0.0);
    gizmos.rect_2d(to_world(center), 0.0, Vec2::new(bounds.w, bounds.h), color);
}

fn draw_scene(mut gizmos: Gizmos, level: Res<Level>, player: Res<Player>) {
    draw_level(&mut gizmos, &level, 0.0);
    draw_player(&mut gizmos, &player.body.bounds, player.facing_right, 0.0);
    draw_fireballs(&mut gizmos, &player.fireballs, 0.0);
}

fn draw_transition(
    mut gizmos: Gizmos,
    transition: Res<TransitionState>,
    level: Res<Level>,
    player: Res<Player>,
) {
    if let Some(snapshot) = &transition.old_snapshot {
        let shift = -transition.offset_x;
        draw_level(&mut gizmos, &snapshot.level, shift);
        draw_player(&mut gizmos, &snapshot.player_bounds, snapshot.facing_right, shift);
    }

    let shift = SCREEN_WIDTH - transition.offset_x;
    draw_level(&mut gizmos, &level, shift);
    draw_player(&mut gizmos, &player.body.bounds, player.facing_right, shift);
}

fn draw_level(gizmos: &mut Gizmos, level: &Level, shift_x: f32) {
    for platform in &level.platforms {
        draw_platform(gizmos, platform, shift_x);
    }
    for door in &level.doors {
        draw_door(gizmos, door, shift_x);
    }
    for boxed in &level.boxes {
        draw_box(gizmos, boxed, level.lift_blur, shift_x);
    }
    for npc in &level.npcs {
        draw_npc(gizmos, npc, shift_x);
    }
}

fn draw_platform(gizmos: &mut Gizmos, platform: &Platform, shift_x: f32) {
    let color = if platform.solid {
        Color::srgb(0.35, 0.3, 0.28)
    } else {
        Color::srgb(0.5, 0.42, 0.3)
    };
    rect(gizmos, &platform.bounds, shift_x, color);
}

fn draw_door(gizmos: &mut Gizmos, door: &Door, shift_x: f32) {
    let color = if door.locked {
        Color::srgb(0.45, 0.15, 0.15)
    } else {
        Color::srgb(0.2, 0.55, 0.25)
    };
    rect(gizmos, &door.bounds, shift_x, color);

    // Knob marks the side the door opens from.
    let knob = door.bounds.center() + Vec2::new(door.bounds.w * 0.3 + shift_x, 0.0);
    gizmos.circle_2d(to_world(knob), 3.0, color);
}

fn draw_box(gizmos: &mut Gizmos, boxed: &BreakableBox, blur_lifted: bool, shift_x: f32) {
    if !boxed.broken {
        rect(gizmos, &boxed.bounds, shift_x, Color::srgb(0.55, 0.4, 0.2));
    } else if boxed.key_visible() {
        let center = boxed.bounds.center() + Vec2::new(shift_x, 0.0);
        gizmos.rect_2d(
            to_world(center),
            0.0,
            Vec2::splat(KEY_SIZE),
            Color::srgb(0.95, 0.85, 0.2),
        );
    }

    // The special box hides behind a haze until it breaks.
    if boxed.is_special_flag && !blur_lifted {
        let mut veil = boxed.bounds;
        veil.x -= 10.0;
        veil.y -= 10.0;
        veil.w += 20.0;
        veil.h += 20.0;
        rect(gizmos, &veil, shift_x, Color::srgba(0.1, 0.1, 0.14, 0.8));
    }
}

fn draw_npc(gizmos: &mut Gizmos, npc: &Npc, shift_x: f32) {
    rect(gizmos, &npc.bounds, shift_x, Color::srgb(0.3, 0.5, 0.7));

    if npc.show_prompt {
        let above = Vec2::new(
            npc.bounds.center().x + shift_x,
            npc.bounds.y - 14.0,
        );
        gizmos.circle_2d(to_world(above), PROMPT_RADIUS_DOT, Color::srgb(0.95, 0.95, 0.6));
    }
}

fn draw_player(gizmos: &mut Gizmos, bounds: &Bounds, facing_right: bool, shift_x: f32) {
    rect(gizmos, bounds, shift_x, Color::srgb(0.85, 0.85, 0.9));

    // A small eye dot so the facing direction is visible.
    let eye_x = if facing_right {
        bounds.right() - 6.0
    } else {
        bounds.x + 6.0
    };
    let eye = Vec2::new(eye_x + shift_x, bounds.y + 8.0);
    gizmos.circle_2d(to_world(eye), 2.0, Color::srgb(0.1, 0.1, 0.1));
}

fn draw_fireballs(gizmos: &mut Gizmos, fireballs: &[Fireball], shift_x: f32) {
    for fireball in fireballs {
        let center = fireball.body.center() + Vec2::new(shift_x, 0.0);
        gizmos.circle_2d(
            to_world(center),
            fireball.body.bounds.w * 0.5,
            Color::srgb(1.0, 0.55, 0.1),
        );
    }
}

/// The dialogue line to show, used by the HUD. Lives here so the UI never
/// reaches into NPC internals.
pub fn current_dialogue_line(level: &Level) -> Option<&str> {
    game::active_dialogue(&level.npcs).and_then(|npc| npc.current_line.as_deref())
}
