// Room manager: named broadcast domains with on-demand lifecycle.

use crate::domain::PlayerId;
use std::collections::HashMap;
use tracing::info;

/// Tracks room membership. The default room always exists and survives
/// emptiness; every other room is removed the moment its last member
/// leaves.
#[derive(Debug)]
pub struct RoomManager {
    default_room: String,
    rooms: HashMap<String, Vec<PlayerId>>,
}

impl RoomManager {
    pub fn new(default_room: impl Into<String>) -> Self {
        let default_room = default_room.into();
        let mut rooms = HashMap::new();
        rooms.insert(default_room.clone(), Vec::new());
        Self {
            default_room,
            rooms,
        }
    }

    /// Idempotent room creation.
    pub fn ensure_room(&mut self, room_id: &str) {
        if !self.rooms.contains_key(room_id) {
            info!(room_id, "room created");
            self.rooms.insert(room_id.to_string(), Vec::new());
        }
    }

    pub fn exists(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Adds the player to the room, creating it if needed. Re-joining the
    /// same room is a no-op.
    pub fn join(&mut self, room_id: &str, player_id: &str) {
        self.ensure_room(room_id);
        if let Some(members) = self.rooms.get_mut(room_id)
            && !members.iter().any(|id| id == player_id)
        {
            members.push(player_id.to_string());
        }
    }

    /// Removes the player from the room. Leaving a room the player is not
    /// in is a no-op. A non-default room is deleted atomically with the
    /// leave that empties it.
    pub fn leave(&mut self, room_id: &str, player_id: &str) {
        let Some(members) = self.rooms.get_mut(room_id) else {
            return;
        };
        members.retain(|id| id != player_id);
        if members.is_empty() && room_id != self.default_room {
            info!(room_id, "empty room removed");
            self.rooms.remove(room_id);
        }
    }

    /// Current members in insertion order.
    pub fn members(&self, room_id: &str) -> &[PlayerId] {
        self.rooms.get(room_id).map(Vec::as_slice).unwrap_or(&[])
    }
}
