//! Interactive world objects: doors, breakable boxes, and fireballs.
//!
//! Each of these is a small state machine owned by the level (doors, boxes)
//! or the player (fireballs). They hold no references to their owners; the
//! level's interaction rules pass everything in explicitly.

use bevy::math::Vec2;

use crate::collision::KinematicBody;
use crate::geometry::{Bounds, Platform, SCREEN_HEIGHT, SCREEN_WIDTH};

pub const DOOR_WIDTH: f32 = 50.0;
pub const DOOR_HEIGHT: f32 = 70.0;
pub const BOX_SIZE: f32 = 70.0;

pub const FIREBALL_SIZE: f32 = 16.0;
pub const FIREBALL_SPEED: f32 = 12.0;
pub const FIREBALL_LIFE: u32 = 60;
/// How far past the screen edge a fireball may travel before despawning.
const OFFSCREEN_MARGIN: f32 = 50.0;

/// Where an unlocked door leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorTarget {
    Level(usize),
    /// The final door out of the dungeon; traversal ends the game.
    Exit,
}

#[derive(Debug, Clone)]
pub struct Door {
    pub bounds: Bounds,
    pub target: DoorTarget,
    pub label: String,
    pub locked: bool,
}

impl Door {
    pub fn new(x: f32, y: f32, target: DoorTarget, label: String, locked: bool) -> Self {
        Self {
            bounds: Bounds::new(x, y, DOOR_WIDTH, DOOR_HEIGHT),
            target,
            label,
            locked,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BreakableBox {
    pub bounds: Bounds,
    pub broken: bool,
    pub has_key: bool,
    pub key_collected: bool,
    /// Breaking this box lifts the level-wide blur overlay.
    pub is_special_flag: bool,
}

impl BreakableBox {
    pub fn new(x: f32, y: f32, has_key: bool, is_special_flag: bool) -> Self {
        Self {
            bounds: Bounds::new(x, y, BOX_SIZE, BOX_SIZE),
            broken: false,
            has_key,
            key_collected: false,
            is_special_flag,
        }
    }

    /// Breaks the box. Idempotent: breaking an already broken box is a no-op.
    pub fn break_open(&mut self) {
        self.broken = true;
    }

    /// Collects the key if one is exposed. Returns whether a key was taken.
    pub fn collect_key(&mut self) -> bool {
        if self.broken && self.has_key && !self.key_collected {
            self.key_collected = true;
            return true;
        }
        false
    }

    pub fn key_visible(&self) -> bool {
        self.broken && self.has_key && !self.key_collected
    }
}

/// A cast projectile. Velocity is fixed at spawn time, aimed from the cast
/// origin toward a target point; gravity does not apply.
#[derive(Debug, Clone)]
pub struct Fireball {
    pub body: KinematicBody,
    pub alive: bool,
    pub life: u32,
}

impl Fireball {
    pub fn spawn(origin: Vec2, target: Vec2) -> Self {
        let mut body = KinematicBody::new(origin.x, origin.y, FIREBALL_SIZE, FIREBALL_SIZE);
        let delta = target - origin;
        if delta.length_squared() > 0.0 {
            let dir = delta.normalize();
            body.vx = dir.x * FIREBALL_SPEED;
            body.vy = dir.y * FIREBALL_SPEED;
        } else {
            body.vx = FIREBALL_SPEED;
            body.vy = 0.0;
        }
        Self {
            body,
            alive: true,
            life: FIREBALL_LIFE,
        }
    }

    /// One tick of flight. Dies on life expiry, far off screen, against solid
    /// geometry, or against an unbroken box (which it breaks).
    pub fn update(&mut self, platforms: &[Platform], boxes: &mut [BreakableBox]) {
        if !self.alive {
            return;
        }

        self.life = self.life.saturating_sub(1);
        if self.life == 0 {
            self.alive = false;
            return;
        }

        self.body.bounds.x += self.body.vx;
        self.body.bounds.y += self.body.vy;

        for platform in platforms {
            if platform.solid && self.body.bounds.overlaps(&platform.bounds) {
                self.alive = false;
                return;
            }
        }

        for boxed in boxes.iter_mut() {
            if !boxed.broken && self.body.bounds.overlaps(&boxed.bounds) {
                boxed.break_open();
                self.alive = false;
                return;
            }
        }

        let b = &self.body.bounds;
        if b.x < -OFFSCREEN_MARGIN
            || b.x > SCREEN_WIDTH + OFFSCREEN_MARGIN
            || b.y < -OFFSCREEN_MARGIN
            || b.y > SCREEN_HEIGHT + OFFSCREEN_MARGIN
        {
            self.alive = false;
        }
    }
}
