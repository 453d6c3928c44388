//! NPC dialogue progression.
//!
//! Every NPC carries dialogue lists keyed by provenance: which level the
//! player most recently departed from. Each key has its own cursor that wraps
//! around its list, so repeated conversations cycle forever instead of
//! running dry.

use std::collections::HashMap;

use bevy::math::Vec2;

use crate::geometry::Bounds;

pub const NPC_WIDTH: f32 = 28.0;
pub const NPC_HEIGHT: f32 = 45.0;
/// Distance from the player at which the interaction prompt appears.
pub const PROMPT_RADIUS: f32 = 60.0;
/// Ticks a spoken line stays on screen.
pub const DIALOGUE_TICKS: u32 = 180;
/// Ticks before the NPC will accept another interaction.
pub const INTERACT_COOLDOWN: u32 = 20;

const PLACEHOLDER_LINE: &str = "...";

/// Which dialogue list applies, derived from the level the player arrived
/// from. A dedicated type instead of formatted string keys so a typo can't
/// silently select the wrong list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProvenanceKey {
    Default,
    From(usize),
}

impl ProvenanceKey {
    /// The key in effect for a player currently on `current` who most
    /// recently departed `from`.
    pub fn select(from: usize, current: usize) -> Self {
        if from != current {
            ProvenanceKey::From(from)
        } else {
            ProvenanceKey::Default
        }
    }
}

#[derive(Debug, Clone)]
pub struct Npc {
    pub bounds: Bounds,
    dialogues: HashMap<ProvenanceKey, Vec<String>>,
    cursors: HashMap<ProvenanceKey, usize>,
    pub current_line: Option<String>,
    pub dialogue_timer: u32,
    pub interaction_cooldown: u32,
    pub show_prompt: bool,
    pub talking: bool,
    pub facing_player: bool,
}

impl Npc {
    /// `x`/`y` is the NPC's foot anchor, matching how levels place them.
    pub fn new(x: f32, y: f32, dialogues: HashMap<ProvenanceKey, Vec<String>>) -> Self {
        Self {
            bounds: Bounds::new(x, y - NPC_HEIGHT, NPC_WIDTH, NPC_HEIGHT),
            dialogues,
            cursors: HashMap::new(),
            current_line: None,
            dialogue_timer: 0,
            interaction_cooldown: 0,
            show_prompt: false,
            talking: false,
            facing_player: false,
        }
    }

    /// Per-tick bookkeeping: proximity prompt, facing, and timers.
    pub fn update(&mut self, player_center: Vec2) {
        let center = self.bounds.center();
        self.show_prompt = player_center.distance(center) < PROMPT_RADIUS;
        if self.show_prompt {
            self.facing_player = player_center.x > center.x;
        }

        self.interaction_cooldown = self.interaction_cooldown.saturating_sub(1);

        if self.dialogue_timer > 0 {
            self.dialogue_timer -= 1;
            self.talking = true;
        } else {
            self.talking = false;
        }
    }

    /// An explicit interaction: pick the provenance-appropriate list, speak
    /// the line under its cursor, and advance the cursor with wraparound.
    /// Rate-limited so a held interact input doesn't burn through lines.
    pub fn interact(&mut self, from_level: usize, current_level: usize) {
        if self.interaction_cooldown > 0 {
            return;
        }

        let mut key = ProvenanceKey::select(from_level, current_level);
        if !self.dialogues.contains_key(&key) {
            key = ProvenanceKey::Default;
        }

        let line = match self.dialogues.get(&key) {
            Some(lines) if !lines.is_empty() => {
                let cursor = self.cursors.entry(key).or_insert(0);
                let line = lines[*cursor].clone();
                *cursor = (*cursor + 1) % lines.len();
                line
            }
            _ => PLACEHOLDER_LINE.to_owned(),
        };

        self.current_line = Some(line);
        self.dialogue_timer = DIALOGUE_TICKS;
        self.interaction_cooldown = INTERACT_COOLDOWN;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn npc_with(default: &[&str], extra: Option<(usize, &[&str])>) -> Npc {
        let mut dialogues = HashMap::new();
        dialogues.insert(
            ProvenanceKey::Default,
            default.iter().map(|s| s.to_string()).collect(),
        );
        if let Some((from, lines)) = extra {
            dialogues.insert(
                ProvenanceKey::From(from),
                lines.iter().map(|s| s.to_string()).collect(),
            );
        }
        Npc::new(100.0, 700.0, dialogues)
    }

    fn interact_ready(npc: &mut Npc, from: usize, current: usize) -> String {
        npc.interaction_cooldown = 0;
        npc.interact(from, current);
        npc.current_line.clone().unwrap()
    }

    #[test]
    fn default_lines_cycle_with_wraparound() {
        let mut npc = npc_with(&["A", "B", "C"], None);
        let spoken: Vec<String> = (0..4).map(|_| interact_ready(&mut npc, 0, 0)).collect();
        assert_eq!(spoken, ["A", "B", "C", "A"]);
    }

    #[test]
    fn provenance_key_picks_arrival_list() {
        let mut npc = npc_with(&["default"], Some((3, &["came from three"])));
        assert_eq!(interact_ready(&mut npc, 3, 0), "came from three");
        assert_eq!(interact_ready(&mut npc, 0, 0), "default");
    }

    #[test]
    fn missing_provenance_list_falls_back_to_default() {
        let mut npc = npc_with(&["default"], None);
        assert_eq!(interact_ready(&mut npc, 7, 0), "default");
    }

    #[test]
    fn missing_default_falls_back_to_placeholder() {
        let mut npc = Npc::new(100.0, 700.0, HashMap::new());
        assert_eq!(interact_ready(&mut npc, 0, 0), "...");
    }

    #[test]
    fn cursors_advance_independently_per_key() {
        let mut npc = npc_with(&["d1", "d2"], Some((2, &["f1", "f2"])));
        assert_eq!(interact_ready(&mut npc, 2, 0), "f1");
        assert_eq!(interact_ready(&mut npc, 0, 0), "d1");
        assert_eq!(interact_ready(&mut npc, 2, 0), "f2");
        assert_eq!(interact_ready(&mut npc, 0, 0), "d2");
    }

    #[test]
    fn cooldown_blocks_rapid_interaction() {
        let mut npc = npc_with(&["A", "B"], None);
        npc.interact(0, 0);
        npc.interact(0, 0);
        assert_eq!(npc.current_line.as_deref(), Some("A"));
    }

    #[test]
    fn new_interaction_replaces_line_and_resets_timer() {
        let mut npc = npc_with(&["A", "B"], None);
        npc.interact(0, 0);
        npc.dialogue_timer = 12;
        assert_eq!(interact_ready(&mut npc, 0, 0), "B");
        assert_eq!(npc.dialogue_timer, DIALOGUE_TICKS);
    }

    #[test]
    fn prompt_appears_within_radius() {
        let mut npc = npc_with(&["A"], None);
        npc.update(npc.bounds.center() + Vec2::new(30.0, 0.0));
        assert!(npc.show_prompt);
        assert!(npc.facing_player);

        npc.update(npc.bounds.center() + Vec2::new(200.0, 0.0));
        assert!(!npc.show_prompt);
    }
}
