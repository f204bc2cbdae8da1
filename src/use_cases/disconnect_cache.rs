// Disconnect cache: last-known state of recently departed players.

use crate::domain::{PlayerId, PlayerState};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Debug)]
struct CacheEntry {
    state: PlayerState,
    room_id: String,
    disconnected_at: Instant,
}

/// Short-term holding area that keeps a departed player's identity and
/// state eligible for seamless reconnection until the TTL elapses.
#[derive(Debug, Default)]
pub struct DisconnectCache {
    entries: HashMap<PlayerId, CacheEntry>,
}

impl DisconnectCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots a player's state at disconnect time.
    pub fn store(&mut self, state: PlayerState, room_id: String, now: Instant) {
        self.entries.insert(
            state.id.clone(),
            CacheEntry {
                state,
                room_id,
                disconnected_at: now,
            },
        );
    }

    /// Consumes the entry for `player_id`, if present. At-most-once: a
    /// second take for the same id misses until a new disconnect stores
    /// it again.
    pub fn take(&mut self, player_id: &str) -> Option<(PlayerState, String)> {
        self.entries
            .remove(player_id)
            .map(|entry| (entry.state, entry.room_id))
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.entries.contains_key(player_id)
    }

    /// Evicts entries strictly older than `ttl` and returns how many were
    /// removed. An entry exactly `ttl` old is retained; it falls on the
    /// next sweep.
    pub fn sweep(&mut self, now: Instant, ttl: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|player_id, entry| {
            let keep = now.saturating_duration_since(entry.disconnected_at) <= ttl;
            if !keep {
                info!(player_id = %player_id, "removed cached player data");
            }
            keep
        });
        before - self.entries.len()
    }
}
