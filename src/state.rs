//! Global game state definitions. Switching states updates an enum value and
//! triggers on-enter/on-exit schedules; no allocation happens on a toggle.

use bevy::prelude::*;

/// Top-level mode switch. Exactly one mode is active at a time:
/// Menu is the entry mode, Playing runs the simulation, Transitioning owns
/// the swipe between two levels, and Ending plays out after the exit door.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum GameState {
    #[default]
    Menu,
    Playing,
    Transitioning,
    Ending,
}

/// Named system sets that structure one fixed tick while playing:
/// sample input, move bodies, then evaluate world interactions.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameSet {
    Input,
    Movement,
    Interaction,
}
