// Connection registry: live transports and their player bindings.

use crate::domain::PlayerId;
use crate::use_cases::types::{ClientSender, ConnId};
use std::collections::HashMap;

/// Tracks every open connection's outbound channel plus the 0-or-1
/// binding between a connection and a player identity. Pure bookkeeping;
/// rebinding simply overwrites.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    senders: HashMap<ConnId, ClientSender>,
    players: HashMap<ConnId, PlayerId>,
    conns: HashMap<PlayerId, ConnId>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a freshly opened, not yet identified connection.
    pub fn open(&mut self, conn_id: ConnId, sender: ClientSender) {
        self.senders.insert(conn_id, sender);
    }

    /// Binds a connection to a player identity.
    pub fn bind(&mut self, conn_id: ConnId, player_id: PlayerId) {
        if let Some(previous) = self.players.insert(conn_id, player_id.clone()) {
            self.conns.remove(&previous);
        }
        self.conns.insert(player_id, conn_id);
    }

    /// Resolves the player bound to a connection, if any.
    pub fn resolve(&self, conn_id: ConnId) -> Option<&PlayerId> {
        self.players.get(&conn_id)
    }

    /// Drops all bookkeeping for a closed connection and returns the
    /// player it was bound to, if any.
    pub fn close(&mut self, conn_id: ConnId) -> Option<PlayerId> {
        self.senders.remove(&conn_id);
        let player_id = self.players.remove(&conn_id);
        if let Some(id) = &player_id {
            // Only unbind the reverse mapping if it still points here; a
            // newer connection may have rebound the same player.
            if self.conns.get(id) == Some(&conn_id) {
                self.conns.remove(id);
            }
        }
        player_id
    }

    pub fn sender(&self, conn_id: ConnId) -> Option<&ClientSender> {
        self.senders.get(&conn_id)
    }

    /// Outbound channel for a player, when they are connected.
    pub fn sender_for_player(&self, player_id: &str) -> Option<&ClientSender> {
        self.conns
            .get(player_id)
            .and_then(|conn_id| self.senders.get(conn_id))
    }
}
