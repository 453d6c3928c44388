//! Kinematic integration and the platform collision resolver.
//!
//! Motion is resolved in a fixed order every tick: the horizontal axis is
//! fully resolved before the vertical axis begins. Reordering the two passes
//! changes observable behaviour at platform corners, so the order here is
//! part of the contract, not an implementation detail.

use bevy::math::Vec2;

use crate::geometry::{Bounds, Platform, SCREEN_WIDTH};

pub const GRAVITY: f32 = 0.8;
pub const MAX_FALL_SPEED: f32 = 20.0;
/// A falling body is only caught by a one-way platform if its bottom edge was
/// within this many units of the platform top before the vertical move. This
/// is what lets a dropping body clear the platform instead of snagging on it.
pub const ONE_WAY_CATCH_WINDOW: f32 = 5.0;
/// Downward speed above which ending the tick grounded counts as a landing.
pub const LANDING_SPEED: f32 = 5.0;

/// Position, velocity, and extent of anything that moves under gravity.
/// Owned exclusively by its entity (player or fireball).
#[derive(Debug, Clone)]
pub struct KinematicBody {
    pub bounds: Bounds,
    pub vx: f32,
    pub vy: f32,
}

impl KinematicBody {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            bounds: Bounds::new(x, y, w, h),
            vx: 0.0,
            vy: 0.0,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    /// One tick of gravity, clamped to terminal fall speed.
    pub fn apply_gravity(&mut self) {
        self.vy += GRAVITY;
        if self.vy > MAX_FALL_SPEED {
            self.vy = MAX_FALL_SPEED;
        }
    }
}

/// Ground contact produced by the vertical pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    pub on_ground: bool,
    pub on_drop_platform: bool,
}

/// Horizontal pass: apply `vx`, clamp to the screen, then push the body out
/// of any solid platform along x only. One-way platforms never block here.
pub fn resolve_horizontal(body: &mut KinematicBody, platforms: &[Platform]) {
    body.bounds.x += body.vx;
    body.bounds.x = body.bounds.x.clamp(0.0, SCREEN_WIDTH - body.bounds.w);

    for platform in platforms {
        if !platform.solid || !body.bounds.overlaps(&platform.bounds) {
            continue;
        }
        if body.vx > 0.0 {
            body.bounds.x = platform.bounds.x - body.bounds.w;
        } else {
            body.bounds.x = platform.bounds.right();
        }
    }
}

/// Vertical pass: apply `vy`, then settle against every overlapping platform.
/// `dropping` disables the one-way catch so an intentional drop clears the
/// catch window instead of being re-caught mid-fall.
pub fn resolve_vertical(
    body: &mut KinematicBody,
    platforms: &[Platform],
    dropping: bool,
) -> Contacts {
    let previous_bottom = body.bounds.bottom();
    body.bounds.y += body.vy;

    let mut contacts = Contacts::default();

    for platform in platforms {
        if !body.bounds.overlaps(&platform.bounds) {
            continue;
        }

        if platform.solid {
            if body.vy > 0.0 {
                body.bounds.y = platform.bounds.y - body.bounds.h;
                body.vy = 0.0;
                contacts.on_ground = true;
            } else {
                body.bounds.y = platform.bounds.bottom();
                body.vy = 0.0;
            }
        } else if body.vy > 0.0
            && !dropping
            && (previous_bottom - platform.bounds.y).abs() <= ONE_WAY_CATCH_WINDOW
        {
            body.bounds.y = platform.bounds.y - body.bounds.h;
            body.vy = 0.0;
            contacts.on_ground = true;
            contacts.on_drop_platform = true;
        }
    }

    contacts
}

/// Result of one full movement step.
#[derive(Debug, Clone, Copy)]
pub struct StepOutcome {
    pub contacts: Contacts,
    /// Fired on the airborne-and-falling-fast to grounded edge; drives the
    /// landing animation timer and impact effects.
    pub landed: bool,
}

/// Full step for a body that was (or wasn't) grounded last tick: horizontal
/// pass, then vertical pass, then landing detection.
pub fn step(
    body: &mut KinematicBody,
    platforms: &[Platform],
    was_on_ground: bool,
    dropping: bool,
) -> StepOutcome {
    let was_falling = !was_on_ground && body.vy > LANDING_SPEED;

    resolve_horizontal(body, platforms);
    let contacts = resolve_vertical(body, platforms, dropping);

    StepOutcome {
        contacts,
        landed: contacts.on_ground && was_falling,
    }
}
