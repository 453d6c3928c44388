//! The level-swipe transition.
//!
//! While transitioning, the simulation owns two level states at once: a
//! retained snapshot of the departing level and the already-constructed
//! target level. A progress value slides from 0 to 1 at 0.02 per tick (a
//! 50-tick swipe); the renderer composites both states side by side using
//! `offset_x`. Player input has no effect until the swipe completes.

use bevy::prelude::*;

use crate::geometry::{Bounds, SCREEN_WIDTH};
use crate::level::Level;
use crate::state::GameState;

/// Swipe length in ticks; progress advances by `1 / SWIPE_TICKS` (0.02) each
/// tick. Progress is derived from the tick count so the final tick lands on
/// exactly 1.0.
pub const SWIPE_TICKS: u32 = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionPhase {
    #[default]
    Swipe,
}

/// Everything the renderer needs to keep drawing the departed level while it
/// slides out: its final world state and the player's last pose in it.
#[derive(Debug, Clone)]
pub struct LevelSnapshot {
    pub level: Level,
    pub player_bounds: Bounds,
    pub facing_right: bool,
}

#[derive(Resource, Debug, Default)]
pub struct TransitionState {
    pub phase: TransitionPhase,
    pub progress: f32,
    pub offset_x: f32,
    pub source_level: usize,
    pub target_level: usize,
    pub old_snapshot: Option<LevelSnapshot>,
    ticks: u32,
}

impl TransitionState {
    /// Arms a fresh swipe from `source` to `target`. The target level must
    /// already be active by the time this is called.
    pub fn begin(&mut self, source: usize, target: usize, snapshot: LevelSnapshot) {
        self.phase = TransitionPhase::Swipe;
        self.progress = 0.0;
        self.offset_x = 0.0;
        self.source_level = source;
        self.target_level = target;
        self.old_snapshot = Some(snapshot);
        self.ticks = 0;
    }

    /// Advances the swipe by one tick. Returns true once progress reaches
    /// 1.0 and the transition is complete.
    pub fn advance(&mut self) -> bool {
        self.ticks = (self.ticks + 1).min(SWIPE_TICKS);
        self.progress = self.ticks as f32 / SWIPE_TICKS as f32;
        self.offset_x = self.progress * SCREEN_WIDTH;
        self.progress >= 1.0
    }

    /// Drops the retained snapshot once the target level is fully active.
    pub fn finish(&mut self) {
        self.old_snapshot = None;
    }
}

pub struct TransitionPlugin;

impl Plugin for TransitionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TransitionState>().add_systems(
            FixedUpdate,
            advance_transition.run_if(in_state(GameState::Transitioning)),
        );
    }
}

fn advance_transition(
    mut transition: ResMut<TransitionState>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if transition.advance() {
        transition.finish();
        next_state.set(GameState::Playing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{parse_catalogue, Level};

    fn snapshot() -> LevelSnapshot {
        let json = r#"[
            {"platforms": [{"x": 0, "y": 700, "w": 1200, "h": 100}], "player_start": [250, 660]}
        ]"#;
        let defs = parse_catalogue(json).expect("valid");
        LevelSnapshot {
            level: Level::from_def(0, &defs[0]),
            player_bounds: Bounds::new(250.0, 660.0, 24.0, 36.0),
            facing_right: true,
        }
    }

    #[test]
    fn swipe_completes_in_exactly_fifty_ticks() {
        let mut transition = TransitionState::default();
        transition.begin(0, 1, snapshot());

        for tick in 1..SWIPE_TICKS {
            assert!(!transition.advance(), "finished early at tick {tick}");
        }
        assert!(transition.advance());
        assert!(transition.progress >= 1.0);
        assert_eq!(transition.offset_x, SCREEN_WIDTH);
    }

    #[test]
    fn offset_tracks_progress_across_the_screen() {
        let mut transition = TransitionState::default();
        transition.begin(2, 3, snapshot());

        transition.advance();
        assert!((transition.offset_x - SCREEN_WIDTH / SWIPE_TICKS as f32).abs() < 1e-3);
        assert_eq!(transition.source_level, 2);
        assert_eq!(transition.target_level, 3);
    }

    #[test]
    fn finish_discards_the_old_snapshot() {
        let mut transition = TransitionState::default();
        transition.begin(0, 1, snapshot());
        assert!(transition.old_snapshot.is_some());

        while !transition.advance() {}
        transition.finish();

        assert!(transition.old_snapshot.is_none());
    }
}
