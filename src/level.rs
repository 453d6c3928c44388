//! Level data and the per-tick cross-entity interaction rules.
//!
//! Level definitions arrive as an opaque serde document produced by the
//! level-author side; this module validates them once at load time and turns
//! them into runtime `Level` values. Optional fields degrade to explicit
//! defaults (`solid` → true, `locked` → false, grants → empty), while a door
//! that targets a nonexistent level is a fatal configuration error.

use std::collections::HashMap;

use bevy::math::Vec2;
use bevy::prelude::{warn, Resource};
use serde::Deserialize;
use thiserror::Error;

use crate::dialogue::{Npc, ProvenanceKey};
use crate::entities::{BreakableBox, Door, DoorTarget};
use crate::geometry::Platform;
use crate::player::{AbilitySet, Player};

/// Half-window (per axis) for collecting an exposed key with the player's
/// center relative to the box's center.
pub const KEY_PICKUP_RANGE: f32 = 30.0;

/// Sentinel door target: traversal ends the game instead of changing level.
const EXIT_TARGET: i64 = -1;

#[derive(Debug, Error)]
pub enum LevelDataError {
    #[error("level data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level catalogue contains no levels")]
    Empty,
    #[error("level {level} has a door targeting nonexistent level {target}")]
    BadDoorTarget { level: usize, target: i64 },
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformDef {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    #[serde(default = "default_true")]
    pub solid: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoorDef {
    pub x: f32,
    pub y: f32,
    pub target_level: i64,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub locked: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoxDef {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub has_key: bool,
    #[serde(default)]
    pub is_special_flag: bool,
}

/// Dialogue values may be a single line or a list of lines.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DialogueLines {
    Line(String),
    Lines(Vec<String>),
}

impl DialogueLines {
    fn into_lines(self) -> Vec<String> {
        match self {
            DialogueLines::Line(line) => vec![line],
            DialogueLines::Lines(lines) => lines,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NpcDef {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub dialogues: HashMap<String, DialogueLines>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct GrantsDef {
    pub jump: bool,
    pub double_jump: bool,
    pub fireball: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LevelDef {
    pub platforms: Vec<PlatformDef>,
    pub player_start: (f32, f32),
    #[serde(default)]
    pub doors: Vec<DoorDef>,
    #[serde(default)]
    pub breakable_boxes: Vec<BoxDef>,
    #[serde(default)]
    pub npcs: Vec<NpcDef>,
    #[serde(default)]
    pub abilities: GrantsDef,
}

/// Parses the level catalogue and rejects dangling door targets up front,
/// so a bad reference can never surface mid-game.
pub fn parse_catalogue(json: &str) -> Result<Vec<LevelDef>, LevelDataError> {
    let defs: Vec<LevelDef> = serde_json::from_str(json)?;
    if defs.is_empty() {
        return Err(LevelDataError::Empty);
    }

    for (index, def) in defs.iter().enumerate() {
        for door in &def.doors {
            let target = door.target_level;
            let in_range = target >= 0 && (target as usize) < defs.len();
            if target != EXIT_TARGET && !in_range {
                return Err(LevelDataError::BadDoorTarget {
                    level: index,
                    target,
                });
            }
        }
    }

    Ok(defs)
}

/// What happened during one level tick that the outside world cares about.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelEvents {
    pub doors_unlocked: u32,
}

/// One fully simulated level: static geometry plus every interactable it
/// owns. Cloneable so a departing level can be retained as a transition
/// snapshot.
#[derive(Debug, Clone, Resource)]
pub struct Level {
    pub id: usize,
    pub platforms: Vec<Platform>,
    pub doors: Vec<Door>,
    pub boxes: Vec<BreakableBox>,
    pub npcs: Vec<Npc>,
    pub player_start: Vec2,
    pub abilities: AbilitySet,
    pub keys_required: u32,
    /// Set once any special-flag box breaks; lifts a decorative overlay.
    pub lift_blur: bool,
}

impl Level {
    pub fn from_def(id: usize, def: &LevelDef) -> Self {
        let platforms = def
            .platforms
            .iter()
            .map(|p| Platform {
                bounds: crate::geometry::Bounds::new(p.x, p.y, p.w, p.h),
                solid: p.solid,
            })
            .collect();

        let mut keys_required = 0;
        let doors = def
            .doors
            .iter()
            .map(|d| {
                if d.locked {
                    keys_required += 1;
                }
                let target = if d.target_level == EXIT_TARGET {
                    DoorTarget::Exit
                } else {
                    DoorTarget::Level(d.target_level as usize)
                };
                Door::new(d.x, d.y, target, d.label.clone(), d.locked)
            })
            .collect();

        let boxes = def
            .breakable_boxes
            .iter()
            .map(|b| BreakableBox::new(b.x, b.y, b.has_key, b.is_special_flag))
            .collect();

        let npcs = def
            .npcs
            .iter()
            .map(|n| {
                let mut dialogues = HashMap::new();
                for (key, lines) in &n.dialogues {
                    match parse_provenance_key(key) {
                        Some(parsed) => {
                            dialogues.insert(parsed, lines.clone().into_lines());
                        }
                        None => warn!("level {id}: ignoring unknown dialogue key '{key}'"),
                    }
                }
                Npc::new(n.x, n.y, dialogues)
            })
            .collect();

        Self {
            id,
            platforms,
            doors,
            boxes,
            npcs,
            player_start: Vec2::new(def.player_start.0, def.player_start.1),
            abilities: AbilitySet {
                jump: def.abilities.jump,
                double_jump: def.abilities.double_jump,
                fireball: def.abilities.fireball,
            },
            keys_required,
            lift_blur: false,
        }
    }

    /// Per-tick interaction rules, evaluated after the player and fireballs
    /// have moved: special-flag effects, NPC bookkeeping, key pickup, and
    /// door unlocking.
    pub fn update(&mut self, player: &mut Player, _from_level: usize) -> LevelEvents {
        let mut events = LevelEvents::default();

        for boxed in &self.boxes {
            if boxed.is_special_flag && boxed.broken {
                self.lift_blur = true;
            }
        }

        let player_center = player.body.center();
        for npc in &mut self.npcs {
            npc.update(player_center);
        }

        for boxed in &mut self.boxes {
            if !boxed.key_visible() {
                continue;
            }
            let delta = player_center - boxed.bounds.center();
            if delta.x.abs() < KEY_PICKUP_RANGE && delta.y.abs() < KEY_PICKUP_RANGE {
                if boxed.collect_key() {
                    player.keys += 1;
                }
            }
        }

        for door in &mut self.doors {
            if door.locked && player.keys > 0 {
                door.locked = false;
                player.keys -= 1;
                events.doors_unlocked += 1;
            }
        }

        events
    }

    /// The unlocked door the player currently overlaps, if any. A locked
    /// door never triggers a transfer.
    pub fn door_entered(&self, player: &Player) -> Option<&Door> {
        self.doors
            .iter()
            .find(|door| !door.locked && player.body.bounds.overlaps(&door.bounds))
    }
}

fn parse_provenance_key(key: &str) -> Option<ProvenanceKey> {
    if key == "default" {
        return Some(ProvenanceKey::Default);
    }
    key.strip_prefix("from_")
        .and_then(|id| id.parse::<usize>().ok())
        .map(ProvenanceKey::From)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PLAYER_HEIGHT;

    fn minimal_def(doors: Vec<DoorDef>, boxes: Vec<BoxDef>) -> LevelDef {
        LevelDef {
            platforms: vec![PlatformDef {
                x: 0.0,
                y: 700.0,
                w: 1200.0,
                h: 100.0,
                solid: true,
            }],
            player_start: (250.0, 660.0),
            doors,
            breakable_boxes: boxes,
            npcs: Vec::new(),
            abilities: GrantsDef::default(),
        }
    }

    fn locked_door(target: i64) -> DoorDef {
        DoorDef {
            x: 900.0,
            y: 630.0,
            target_level: target,
            label: String::new(),
            locked: true,
        }
    }

    #[test]
    fn one_key_unlocks_exactly_one_door() {
        let def = minimal_def(vec![locked_door(0), locked_door(0)], Vec::new());
        let mut level = Level::from_def(0, &def);
        assert_eq!(level.keys_required, 2);

        let mut player = Player::new(250.0, 660.0);
        player.keys = 1;

        let events = level.update(&mut player, 0);

        assert_eq!(events.doors_unlocked, 1);
        assert_eq!(player.keys, 0);
        assert!(!level.doors[0].locked);
        assert!(level.doors[1].locked);
    }

    #[test]
    fn key_pickup_is_idempotent() {
        let def = minimal_def(
            Vec::new(),
            vec![BoxDef {
                x: 240.0,
                y: 630.0,
                has_key: true,
                is_special_flag: false,
            }],
        );
        let mut level = Level::from_def(0, &def);
        level.boxes[0].break_open();

        // Stand the player on top of the box center.
        let center = level.boxes[0].bounds.center();
        let mut player = Player::new(
            center.x - crate::player::PLAYER_WIDTH * 0.5,
            center.y - PLAYER_HEIGHT * 0.5,
        );

        level.update(&mut player, 0);
        assert_eq!(player.keys, 1);
        assert!(level.boxes[0].key_collected);

        level.update(&mut player, 0);
        assert_eq!(player.keys, 1);
    }

    #[test]
    fn key_pickup_requires_proximity() {
        let def = minimal_def(
            Vec::new(),
            vec![BoxDef {
                x: 600.0,
                y: 630.0,
                has_key: true,
                is_special_flag: false,
            }],
        );
        let mut level = Level::from_def(0, &def);
        level.boxes[0].break_open();

        let mut player = Player::new(100.0, 660.0);
        level.update(&mut player, 0);

        assert_eq!(player.keys, 0);
        assert!(!level.boxes[0].key_collected);
    }

    #[test]
    fn special_flag_box_lifts_blur_once_broken() {
        let def = minimal_def(
            Vec::new(),
            vec![BoxDef {
                x: 130.0,
                y: 230.0,
                has_key: false,
                is_special_flag: true,
            }],
        );
        let mut level = Level::from_def(0, &def);
        let mut player = Player::new(250.0, 660.0);

        level.update(&mut player, 0);
        assert!(!level.lift_blur);

        level.boxes[0].break_open();
        level.update(&mut player, 0);
        assert!(level.lift_blur);
    }

    #[test]
    fn locked_door_never_transfers() {
        let def = minimal_def(vec![locked_door(0)], Vec::new());
        let level = Level::from_def(0, &def);

        let door = &level.doors[0];
        let mut player = Player::new(door.bounds.x, door.bounds.y);
        player.body.bounds.x = door.bounds.x;
        player.body.bounds.y = door.bounds.y;

        assert!(level.door_entered(&player).is_none());
    }

    #[test]
    fn catalogue_rejects_dangling_door_target() {
        let json = r#"[
            {
                "platforms": [{"x": 0, "y": 700, "w": 1200, "h": 100}],
                "player_start": [250, 660],
                "doors": [{"x": 900, "y": 630, "target_level": 5}]
            }
        ]"#;

        match parse_catalogue(json) {
            Err(LevelDataError::BadDoorTarget { level: 0, target: 5 }) => {}
            other => panic!("expected BadDoorTarget, got {other:?}"),
        }
    }

    #[test]
    fn catalogue_applies_field_defaults() {
        let json = r#"[
            {
                "platforms": [
                    {"x": 0, "y": 700, "w": 1200, "h": 100},
                    {"x": 350, "y": 450, "w": 150, "h": 20, "solid": false}
                ],
                "player_start": [250, 660],
                "doors": [{"x": 900, "y": 630, "target_level": -1}]
            }
        ]"#;

        let defs = parse_catalogue(json).expect("catalogue should parse");
        let level = Level::from_def(0, &defs[0]);

        assert!(level.platforms[0].solid);
        assert!(!level.platforms[1].solid);
        assert!(!level.doors[0].locked);
        assert_eq!(level.doors[0].target, DoorTarget::Exit);
        assert_eq!(level.abilities, AbilitySet::default());
    }

    #[test]
    fn single_line_dialogue_becomes_one_entry_list() {
        let json = r#"[
            {
                "platforms": [{"x": 0, "y": 700, "w": 1200, "h": 100}],
                "player_start": [250, 660],
                "npcs": [{"x": 350, "y": 700, "dialogues": {"default": "hello"}}]
            }
        ]"#;

        let defs = parse_catalogue(json).expect("catalogue should parse");
        let mut level = Level::from_def(0, &defs[0]);
        level.npcs[0].interact(0, 0);

        assert_eq!(level.npcs[0].current_line.as_deref(), Some("hello"));
    }
}
