// Session hub: the protocol state machine and message router.
//
// Every inbound command and every connection lifecycle event is handled
// as one lock-scoped step over the shared stores, so no handler ever
// observes a half-updated presence/room/cache state. Outbound payloads
// are queued on the recipients' channels inside that same step, which
// pins cross-connection delivery order to state order: a disconnect
// notice can never arrive after the rejoin that followed it.

use crate::domain::{PlayerId, PlayerState, Position};
use crate::use_cases::disconnect_cache::DisconnectCache;
use crate::use_cases::presence::PresenceStore;
use crate::use_cases::registry::ConnectionRegistry;
use crate::use_cases::rooms::RoomManager;
use crate::use_cases::types::{ClientSender, ConnId, SessionCommand, SessionPayload};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Tunables applied to a hub at construction time.
#[derive(Debug, Clone)]
pub struct HubSettings {
    /// Room assigned when a client never names one.
    pub default_room: String,
    /// Width/height of the random spawn area.
    pub spawn_area: (f64, f64),
    /// Heading assigned to freshly spawned players, in degrees.
    pub default_direction: f64,
    /// How long a disconnected player's slot stays reserved.
    pub disconnect_ttl: Duration,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            default_room: "default".to_string(),
            spawn_area: (800.0, 600.0),
            default_direction: 270.0,
            disconnect_ttl: Duration::from_secs(60 * 60),
        }
    }
}

/// Per-connection protocol phase. The transition to `Identified` happens
/// on the first message that establishes a player id and is never undone
/// while the connection is open.
#[derive(Debug, Clone)]
enum Phase {
    Unidentified { pending_room: String },
    Identified { player_id: PlayerId, room_id: String },
}

struct HubState {
    registry: ConnectionRegistry,
    presence: PresenceStore,
    rooms: RoomManager,
    cache: DisconnectCache,
    sessions: HashMap<ConnId, Phase>,
}

impl HubState {
    /// Queues a payload for one connection. Best-effort: a full or closed
    /// queue drops the payload for that client only.
    fn send_to_conn(&self, conn_id: ConnId, payload: SessionPayload) {
        if let Some(sender) = self.registry.sender(conn_id)
            && sender.try_send(payload).is_err()
        {
            debug!(conn_id, "client queue unavailable; reply dropped");
        }
    }

    /// Queues a payload for every room member except `excluding`.
    /// Members without a live connection are skipped, as is any member
    /// whose queue is full.
    fn broadcast(&self, room_id: &str, excluding: &str, payload: SessionPayload) {
        for member in self.rooms.members(room_id) {
            if member.as_str() == excluding {
                continue;
            }
            if let Some(sender) = self.registry.sender_for_player(member)
                && sender.try_send(payload.clone()).is_err()
            {
                debug!(player_id = %member, "peer queue unavailable; skipping delivery");
            }
        }
    }
}

/// Owns presence, rooms, disconnect cache, and connection bookkeeping
/// behind a single mutex, and routes decoded client commands to them.
pub struct SessionHub {
    settings: HubSettings,
    state: Mutex<HubState>,
}

impl SessionHub {
    pub fn new(settings: HubSettings) -> Self {
        let default_room = settings.default_room.clone();
        Self {
            settings,
            state: Mutex::new(HubState {
                registry: ConnectionRegistry::new(),
                presence: PresenceStore::new(),
                rooms: RoomManager::new(default_room),
                cache: DisconnectCache::new(),
                sessions: HashMap::new(),
            }),
        }
    }

    /// Registers a freshly upgraded connection in the unidentified phase.
    pub async fn open(&self, conn_id: ConnId, sender: ClientSender) {
        let mut st = self.state.lock().await;
        st.registry.open(conn_id, sender);
        st.sessions.insert(
            conn_id,
            Phase::Unidentified {
                pending_room: self.settings.default_room.clone(),
            },
        );
    }

    /// Dispatches one decoded message against the connection's phase,
    /// queuing any resulting deliveries before the lock is released.
    pub async fn handle(&self, conn_id: ConnId, command: SessionCommand) {
        let mut st = self.state.lock().await;
        let Some(phase) = st.sessions.get(&conn_id).cloned() else {
            debug!(conn_id, "command for unknown connection dropped");
            return;
        };

        match (phase, command) {
            (Phase::Unidentified { pending_room }, SessionCommand::Connect { room_id }) => {
                self.fresh_connect(&mut st, conn_id, room_id.unwrap_or(pending_room));
            }
            (
                Phase::Unidentified { pending_room },
                SessionCommand::Reconnect { player_id, room_id },
            ) => self.resume(&mut st, conn_id, player_id, room_id, pending_room),
            (Phase::Unidentified { .. }, SessionCommand::JoinRoom { room_id }) => {
                // Room selection before identification: remember it for
                // the identifying message and confirm immediately.
                st.rooms.ensure_room(&room_id);
                st.sessions.insert(
                    conn_id,
                    Phase::Unidentified {
                        pending_room: room_id.clone(),
                    },
                );
                st.send_to_conn(conn_id, SessionPayload::RoomJoined { room_id });
            }
            (
                Phase::Unidentified { pending_room },
                SessionCommand::Update {
                    position,
                    direction,
                },
            ) => {
                // The first message of any kind identifies the
                // connection; the update then applies as usual.
                self.fresh_connect(&mut st, conn_id, pending_room);
                self.apply_update(&mut st, conn_id, position, direction);
            }
            (
                Phase::Identified {
                    player_id,
                    room_id: current_room,
                },
                SessionCommand::JoinRoom { room_id },
            ) => {
                if room_id != current_room {
                    st.rooms.leave(&current_room, &player_id);
                    st.rooms.join(&room_id, &player_id);
                    info!(player_id = %player_id, from = %current_room, to = %room_id, "player moved room");
                }
                st.sessions.insert(
                    conn_id,
                    Phase::Identified {
                        player_id,
                        room_id: room_id.clone(),
                    },
                );
                st.send_to_conn(conn_id, SessionPayload::RoomJoined { room_id });
            }
            (Phase::Identified { .. }, SessionCommand::Connect { .. })
            | (Phase::Identified { .. }, SessionCommand::Reconnect { .. }) => {
                debug!(conn_id, "handshake message after identification ignored");
            }
            (
                Phase::Identified { .. },
                SessionCommand::Update {
                    position,
                    direction,
                },
            ) => self.apply_update(&mut st, conn_id, position, direction),
        }
    }

    /// Handles a transport close: caches the player's state for
    /// reconnection, releases presence and room membership, and notifies
    /// the remaining room members.
    pub async fn close(&self, conn_id: ConnId) {
        let mut st = self.state.lock().await;
        let phase = st.sessions.remove(&conn_id);
        // The registry binding is the identity of record for a closing
        // connection; an unbound connection has nothing to tear down.
        let Some(player_id) = st.registry.close(conn_id) else {
            return;
        };
        let Some(Phase::Identified { room_id, .. }) = phase else {
            return;
        };
        let Some(state) = st.presence.remove(&player_id) else {
            return;
        };

        st.cache.store(state, room_id.clone(), Instant::now());
        st.rooms.leave(&room_id, &player_id);
        info!(player_id = %player_id, room_id = %room_id, "player disconnected");
        st.broadcast(
            &room_id,
            &player_id,
            SessionPayload::PeerDisconnected {
                player_id: player_id.clone(),
            },
        );
    }

    /// Evicts disconnect cache entries older than the TTL. Returns the
    /// eviction count.
    pub async fn sweep_expired(&self, now: Instant) -> usize {
        let mut st = self.state.lock().await;
        st.cache.sweep(now, self.settings.disconnect_ttl)
    }

    fn fresh_connect(&self, st: &mut HubState, conn_id: ConnId, room_id: String) {
        let player_id = Uuid::new_v4().to_string();
        let player = PlayerState::spawn(
            player_id,
            self.settings.spawn_area,
            self.settings.default_direction,
        );
        self.admit(st, conn_id, player, room_id, false);
    }

    /// Reconnect path. A cache hit restores the cached identity and
    /// state; a miss is the deliberate fallback to a fresh join, never
    /// an error.
    fn resume(
        &self,
        st: &mut HubState,
        conn_id: ConnId,
        player_id: PlayerId,
        requested_room: Option<String>,
        pending_room: String,
    ) {
        match st.cache.take(&player_id) {
            Some((state, cached_room)) => {
                // The requested room wins only when it still exists;
                // otherwise the player returns to the cached room.
                let room_id = match requested_room {
                    Some(room) if st.rooms.exists(&room) => room,
                    _ => cached_room,
                };
                self.admit(st, conn_id, state, room_id, true);
            }
            None => {
                debug!(player_id = %player_id, "reconnect miss; treating as fresh connect");
                self.fresh_connect(st, conn_id, requested_room.unwrap_or(pending_room));
            }
        }
    }

    /// Shared tail of both identification paths: binds the identity,
    /// publishes presence, joins the room, and queues the init reply plus
    /// the room-wide join notification.
    fn admit(
        &self,
        st: &mut HubState,
        conn_id: ConnId,
        player: PlayerState,
        room_id: String,
        resumed: bool,
    ) {
        let player_id = player.id.clone();
        st.rooms.join(&room_id, &player_id);
        st.presence.create(player.clone());
        st.registry.bind(conn_id, player_id.clone());
        st.sessions.insert(
            conn_id,
            Phase::Identified {
                player_id: player_id.clone(),
                room_id: room_id.clone(),
            },
        );

        let peers = st
            .presence
            .snapshot_of(st.rooms.members(&room_id), &player_id);
        info!(player_id = %player_id, room_id = %room_id, resumed, "player joined");

        st.send_to_conn(
            conn_id,
            SessionPayload::Init {
                player: player.clone(),
                room_id: room_id.clone(),
                peers,
            },
        );
        st.broadcast(&room_id, &player_id, SessionPayload::PeerJoined { player });
    }

    fn apply_update(&self, st: &mut HubState, conn_id: ConnId, position: Position, direction: f64) {
        let Some(Phase::Identified { player_id, room_id }) = st.sessions.get(&conn_id).cloned()
        else {
            return;
        };

        let direction = direction.rem_euclid(360.0);
        if !st.presence.update(&player_id, position, direction) {
            debug!(player_id = %player_id, "update for unknown player dropped");
            return;
        }

        st.broadcast(
            &room_id,
            &player_id,
            SessionPayload::PeerUpdated {
                player_id: player_id.clone(),
                position,
                direction,
            },
        );
    }

    #[cfg(test)]
    pub async fn room_exists(&self, room_id: &str) -> bool {
        self.state.lock().await.rooms.exists(room_id)
    }

    #[cfg(test)]
    pub async fn cache_contains(&self, player_id: &str) -> bool {
        self.state.lock().await.cache.contains(player_id)
    }
}

/// Background housekeeping task: periodically drops disconnect cache
/// entries older than the TTL. Runs until the process exits.
pub async fn expiry_sweeper(hub: Arc<SessionHub>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    // The first tick completes immediately; there is nothing to sweep yet.
    interval.tick().await;
    loop {
        interval.tick().await;
        let evicted = hub.sweep_expired(Instant::now()).await;
        if evicted > 0 {
            info!(evicted, "disconnect cache swept");
        }
    }
}
