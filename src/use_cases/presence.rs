// Presence store: live state for every connected player.

use crate::domain::{PlayerId, PlayerState, Position};
use std::collections::HashMap;

/// Holds the authoritative `PlayerState` for each connected player. A
/// player has an entry here or in the disconnect cache, never both.
#[derive(Debug, Default)]
pub struct PresenceStore {
    players: HashMap<PlayerId, PlayerState>,
}

impl PresenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a player's live state, replacing any stale entry.
    pub fn create(&mut self, state: PlayerState) {
        self.players.insert(state.id.clone(), state);
    }

    /// Overwrites position and heading. Returns false (and changes
    /// nothing) when the player is unknown; callers treat that as a
    /// benign no-op.
    pub fn update(&mut self, player_id: &str, position: Position, direction: f64) -> bool {
        match self.players.get_mut(player_id) {
            Some(state) => {
                state.position = position;
                state.direction = direction;
                true
            }
            None => false,
        }
    }

    /// Removes a player and returns the last known state for caching.
    pub fn remove(&mut self, player_id: &str) -> Option<PlayerState> {
        self.players.remove(player_id)
    }

    /// Snapshot of the given members' states, excluding one player. Order
    /// follows the member list; callers must not rely on it.
    pub fn snapshot_of(&self, members: &[PlayerId], excluding: &str) -> Vec<PlayerState> {
        members
            .iter()
            .filter(|id| id.as_str() != excluding)
            .filter_map(|id| self.players.get(id).cloned())
            .collect()
    }
}
