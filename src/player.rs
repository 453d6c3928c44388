//! The player: ability-gated movement, jump/drop/cast handling, and the
//! derived animation state.
//!
//! The player is constructed once when a run starts and only repositioned on
//! level entry; abilities granted by levels accumulate and are never revoked.

use bevy::math::Vec2;
use bevy::prelude::Resource;

use crate::collision::{self, KinematicBody};
use crate::entities::Fireball;
use crate::geometry::Platform;
use crate::input::InputState;

pub const PLAYER_WIDTH: f32 = 24.0;
pub const PLAYER_HEIGHT: f32 = 36.0;
pub const PLAYER_SPEED: f32 = 5.0;
pub const JUMP_STRENGTH: f32 = -15.0;
const DOUBLE_JUMP_FACTOR: f32 = 0.85;
/// Ticks the one-way catch stays disabled after a drop input.
const DROP_TICKS: u32 = 10;
/// Downward nudge applied on drop so the body clears the catch window.
const DROP_KICK: f32 = 2.0;
const FIREBALL_COOLDOWN: u32 = 20;
const LANDING_TICKS: u32 = 8;

/// Movement and attack capabilities unlocked so far. Grants are a set union;
/// a level that omits an ability leaves it untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbilitySet {
    pub jump: bool,
    pub double_jump: bool,
    pub fireball: bool,
}

impl AbilitySet {
    pub fn grant(&mut self, other: AbilitySet) {
        self.jump |= other.jump;
        self.double_jump |= other.double_jump;
        self.fireball |= other.fireball;
    }
}

/// Player-facing animation tag, recomputed from kinematic state every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animation {
    Idle,
    Walking,
    Jumping,
    Falling,
    Landing,
}

/// Audio-worthy things that happened during one player step.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepEvents {
    pub jumped: bool,
    pub cast_fireball: bool,
    pub landed: bool,
    pub footsteps_started: bool,
    pub footsteps_stopped: bool,
}

#[derive(Debug, Resource)]
pub struct Player {
    pub body: KinematicBody,
    pub on_ground: bool,
    pub on_drop_platform: bool,
    pub dropping: bool,
    pub drop_timer: u32,
    pub abilities: AbilitySet,
    pub can_double_jump: bool,
    pub fireball_cooldown: u32,
    pub keys: u32,
    pub land_timer: u32,
    pub facing_right: bool,
    pub fireballs: Vec<Fireball>,
    jump_held: bool,
    drop_held: bool,
    walking: bool,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            body: KinematicBody::new(x, y, PLAYER_WIDTH, PLAYER_HEIGHT),
            on_ground: false,
            on_drop_platform: false,
            dropping: false,
            drop_timer: 0,
            abilities: AbilitySet::default(),
            can_double_jump: false,
            fireball_cooldown: 0,
            keys: 0,
            land_timer: 0,
            facing_right: true,
            fireballs: Vec::new(),
            jump_held: false,
            drop_held: false,
            walking: false,
        }
    }

    /// Repositions the existing player for a freshly entered level. Size,
    /// keys, and abilities are untouched.
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.body.bounds.x = x;
        self.body.bounds.y = y;
        self.body.vx = 0.0;
        self.body.vy = 0.0;
    }

    /// The canonical animation tag. Derivation order matters: a running
    /// landing timer wins over everything else.
    pub fn animation(&self) -> Animation {
        if self.land_timer > 0 {
            Animation::Landing
        } else if !self.on_ground {
            if self.body.vy < -2.0 {
                Animation::Jumping
            } else {
                Animation::Falling
            }
        } else if self.body.vx.abs() > 0.0 {
            Animation::Walking
        } else {
            Animation::Idle
        }
    }

    /// One full player tick: input, ability gates, gravity, and collision
    /// resolution against the level's platforms.
    pub fn update(&mut self, input: &InputState, platforms: &[Platform]) -> StepEvents {
        let mut events = StepEvents::default();

        self.land_timer = self.land_timer.saturating_sub(1);

        self.body.vx = 0.0;
        if input.move_left {
            self.body.vx = -PLAYER_SPEED;
            self.facing_right = false;
        }
        if input.move_right {
            self.body.vx = PLAYER_SPEED;
            self.facing_right = true;
        }

        let walking_now = self.on_ground && self.body.vx.abs() > 0.0;
        if walking_now && !self.walking {
            events.footsteps_started = true;
        } else if !walking_now && self.walking {
            events.footsteps_stopped = true;
        }
        self.walking = walking_now;

        // Drop-through: rising edge only, and only while standing on a
        // one-way platform.
        if input.drop && !self.drop_held && self.on_drop_platform {
            self.dropping = true;
            self.drop_timer = DROP_TICKS;
            self.body.vy = DROP_KICK;
        }
        self.drop_held = input.drop;

        if self.drop_timer > 0 {
            self.drop_timer -= 1;
        } else {
            self.dropping = false;
        }

        // Jump: rising edge, gated on the jump ability. The double-jump
        // token is armed on a ground jump and consumed exactly once per
        // airborne excursion.
        if self.abilities.jump && input.jump && !self.jump_held {
            if self.on_ground {
                self.body.vy = JUMP_STRENGTH;
                self.can_double_jump = self.abilities.double_jump;
                events.jumped = true;
            } else if self.can_double_jump {
                self.body.vy = JUMP_STRENGTH * DOUBLE_JUMP_FACTOR;
                self.can_double_jump = false;
                events.jumped = true;
            }
        }
        self.jump_held = input.jump;

        if self.abilities.fireball && self.fireball_cooldown == 0 && input.cast {
            self.fireballs
                .push(Fireball::spawn(self.body.center(), input.aim));
            self.fireball_cooldown = FIREBALL_COOLDOWN;
            events.cast_fireball = true;
        }
        self.fireball_cooldown = self.fireball_cooldown.saturating_sub(1);

        self.body.apply_gravity();
        let outcome = collision::step(&mut self.body, platforms, self.on_ground, self.dropping);
        self.on_ground = outcome.contacts.on_ground;
        self.on_drop_platform = outcome.contacts.on_drop_platform;

        if outcome.landed {
            self.land_timer = LANDING_TICKS;
            events.landed = true;
        }

        events
    }

    /// Advances owned fireballs and prunes the dead ones. Called by the same
    /// owner that advances the level, with the level's geometry passed in.
    pub fn update_fireballs(
        &mut self,
        platforms: &[Platform],
        boxes: &mut [crate::entities::BreakableBox],
    ) {
        for fireball in &mut self.fireballs {
            fireball.update(platforms, boxes);
        }
        self.fireballs.retain(|f| f.alive);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Platform;

    const GROUND: Platform = Platform {
        bounds: crate::geometry::Bounds::new(0.0, 700.0, 1200.0, 100.0),
        solid: true,
    };

    fn grounded_player() -> Player {
        let mut player = Player::new(250.0, 700.0 - PLAYER_HEIGHT);
        player.abilities.grant(AbilitySet {
            jump: true,
            double_jump: true,
            fireball: true,
        });
        // Settle one tick so on_ground is true.
        player.update(&InputState::default(), &[GROUND]);
        assert!(player.on_ground);
        player
    }

    fn press_jump(player: &mut Player, platforms: &[Platform]) -> StepEvents {
        let pressed = InputState {
            jump: true,
            ..InputState::default()
        };
        let events = player.update(&pressed, platforms);
        player.update(&InputState::default(), platforms);
        events
    }

    #[test]
    fn double_jump_is_one_shot_per_airborne_excursion() {
        let mut player = grounded_player();
        let jump = InputState {
            jump: true,
            ..InputState::default()
        };
        let release = InputState::default();

        let first = player.update(&jump, &[GROUND]);
        assert!(first.jumped);
        assert!(!player.on_ground);
        player.update(&release, &[GROUND]);

        let second = player.update(&jump, &[GROUND]);
        assert!(second.jumped);
        // Gravity for this tick applies after the jump write.
        let expected = JUMP_STRENGTH * 0.85 + crate::collision::GRAVITY;
        assert!((player.body.vy - expected).abs() < 1e-4);
        player.update(&release, &[GROUND]);

        let third = player.update(&jump, &[GROUND]);
        assert!(!third.jumped);
    }

    #[test]
    fn jump_requires_ability() {
        let mut player = Player::new(250.0, 700.0 - PLAYER_HEIGHT);
        player.update(&InputState::default(), &[GROUND]);

        let events = press_jump(&mut player, &[GROUND]);
        assert!(!events.jumped);
        assert!(player.on_ground);
    }

    #[test]
    fn drop_without_platform_is_a_no_op() {
        let mut player = grounded_player();
        assert!(!player.on_drop_platform);

        let input = InputState {
            drop: true,
            ..InputState::default()
        };
        player.update(&input, &[GROUND]);

        assert!(!player.dropping);
        assert_eq!(player.drop_timer, 0);
    }

    #[test]
    fn drop_through_one_way_platform() {
        let deck = Platform::one_way(200.0, 450.0, 150.0, 20.0);
        let mut player = Player::new(250.0, 450.0 - PLAYER_HEIGHT - 2.0);
        player.body.vy = 2.0;
        player.update(&InputState::default(), &[deck]);
        assert!(player.on_drop_platform);

        let input = InputState {
            drop: true,
            ..InputState::default()
        };
        player.update(&input, &[deck]);

        assert!(player.dropping);
        assert!(!player.on_ground);
    }

    #[test]
    fn fireball_cast_respects_cooldown() {
        let mut player = grounded_player();
        let input = InputState {
            cast: true,
            aim: Vec2::new(800.0, 300.0),
            ..InputState::default()
        };

        let first = player.update(&input, &[GROUND]);
        let second = player.update(&input, &[GROUND]);

        assert!(first.cast_fireball);
        assert!(!second.cast_fireball);
        assert_eq!(player.fireballs.len(), 1);
    }

    #[test]
    fn abilities_accumulate_monotonically() {
        let mut abilities = AbilitySet::default();
        abilities.grant(AbilitySet {
            jump: true,
            ..AbilitySet::default()
        });
        abilities.grant(AbilitySet {
            fireball: true,
            ..AbilitySet::default()
        });
        // A grant set that omits everything revokes nothing.
        abilities.grant(AbilitySet::default());

        assert!(abilities.jump);
        assert!(abilities.fireball);
        assert!(!abilities.double_jump);
    }

    #[test]
    fn animation_derivation_is_exact() {
        let mut player = grounded_player();
        assert_eq!(player.animation(), Animation::Idle);

        let input = InputState {
            move_right: true,
            ..InputState::default()
        };
        player.update(&input, &[GROUND]);
        assert_eq!(player.animation(), Animation::Walking);

        press_jump(&mut player, &[GROUND]);
        assert_eq!(player.animation(), Animation::Jumping);

        player.land_timer = 3;
        assert_eq!(player.animation(), Animation::Landing);
    }

    #[test]
    fn footsteps_events_fire_on_walk_edges() {
        let mut player = grounded_player();
        let walk = InputState {
            move_right: true,
            ..InputState::default()
        };

        let started = player.update(&walk, &[GROUND]);
        let held = player.update(&walk, &[GROUND]);
        let stopped = player.update(&InputState::default(), &[GROUND]);

        assert!(started.footsteps_started);
        assert!(!held.footsteps_started);
        assert!(stopped.footsteps_stopped);
    }
}
