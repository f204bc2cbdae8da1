// Use-case level inputs/outputs for the session hub.

use crate::domain::{PlayerId, PlayerState, Position};
use tokio::sync::mpsc;

/// Process-unique identifier for one WebSocket connection.
pub type ConnId = u64;

/// Outbound channel handle for a single client connection. The hub
/// enqueues payloads on it inside the same lock-scoped step that mutates
/// the stores, so cross-connection delivery order always matches state
/// order. Bounded so a slow client backs up its own queue, not the hub.
pub type ClientSender = mpsc::Sender<SessionPayload>;

/// Decoded client intents, dispatched against the per-connection phase.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// Fresh-connect handshake, optionally naming the initial room.
    Connect { room_id: Option<String> },
    /// Create-or-join a room; valid before and after identification.
    JoinRoom { room_id: String },
    /// Resume a cached identity after a transient disconnect.
    Reconnect {
        player_id: PlayerId,
        room_id: Option<String>,
    },
    /// Position/heading report for the sender's own ship.
    Update { position: Position, direction: f64 },
}

/// Outbound deliveries queued per connection; the network adapter turns
/// each into a wire message on the way out.
#[derive(Debug, Clone)]
pub enum SessionPayload {
    /// Room membership confirmation for the requesting client.
    RoomJoined { room_id: String },
    /// Identity assignment plus a peer snapshot of the joined room.
    Init {
        player: PlayerState,
        room_id: String,
        peers: Vec<PlayerState>,
    },
    /// A player appeared in the room (fresh connect or resumed session).
    PeerJoined { player: PlayerState },
    /// A peer moved.
    PeerUpdated {
        player_id: PlayerId,
        position: Position,
        direction: f64,
    },
    /// A peer's transport closed.
    PeerDisconnected { player_id: PlayerId },
}
