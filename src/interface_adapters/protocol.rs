// Wire protocol DTOs and conversions for the relay's JSON messages.
// The reference encoding is flat JSON objects tagged by a "type" field.

use crate::domain::{PlayerState, Position};
use crate::use_cases::{SessionCommand, SessionPayload};
use serde::{Deserialize, Serialize};

/// Messages a client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Fresh-connect handshake, optionally naming the initial room.
    #[serde(rename_all = "camelCase")]
    Connect {
        #[serde(default)]
        room_id: Option<String>,
    },
    /// Create-or-join a room.
    #[serde(rename_all = "camelCase")]
    JoinRoom { room_id: String },
    /// Resume a previous identity after a transient disconnect.
    #[serde(rename_all = "camelCase")]
    Reconnect {
        player_id: String,
        #[serde(default)]
        room_id: Option<String>,
    },
    /// Position/heading report for the sender's own ship.
    Update { position: PositionDto, direction: f64 },
}

/// Messages the server sends to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    Init {
        id: String,
        room_id: String,
        players: Vec<PlayerDto>,
    },
    #[serde(rename_all = "camelCase")]
    RoomJoined { room_id: String },
    NewPlayer { player: PlayerDto },
    UpdatePlayer { player: PlayerUpdateDto },
    PlayerDisconnect { id: String },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PositionDto {
    pub x: f64,
    pub y: f64,
}

impl From<PositionDto> for Position {
    fn from(dto: PositionDto) -> Self {
        Self { x: dto.x, y: dto.y }
    }
}

impl From<Position> for PositionDto {
    fn from(position: Position) -> Self {
        Self {
            x: position.x,
            y: position.y,
        }
    }
}

/// Full player snapshot as sent in `init` and `newPlayer`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub id: String,
    pub position: PositionDto,
    pub direction: f64,
    pub ship_type: String,
}

impl From<&PlayerState> for PlayerDto {
    fn from(state: &PlayerState) -> Self {
        Self {
            id: state.id.clone(),
            position: state.position.into(),
            direction: state.direction,
            ship_type: state.ship_type.asset_name().to_string(),
        }
    }
}

/// Movement-only payload for `updatePlayer`; the skin never changes
/// mid-session, so it is not repeated.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerUpdateDto {
    pub id: String,
    pub position: PositionDto,
    pub direction: f64,
}

impl From<ClientMessage> for SessionCommand {
    fn from(msg: ClientMessage) -> Self {
        match msg {
            ClientMessage::Connect { room_id } => SessionCommand::Connect { room_id },
            ClientMessage::JoinRoom { room_id } => SessionCommand::JoinRoom { room_id },
            ClientMessage::Reconnect { player_id, room_id } => {
                SessionCommand::Reconnect { player_id, room_id }
            }
            ClientMessage::Update {
                position,
                direction,
            } => SessionCommand::Update {
                position: position.into(),
                direction,
            },
        }
    }
}

impl From<&SessionPayload> for ServerMessage {
    fn from(payload: &SessionPayload) -> Self {
        match payload {
            SessionPayload::RoomJoined { room_id } => ServerMessage::RoomJoined {
                room_id: room_id.clone(),
            },
            SessionPayload::Init {
                player,
                room_id,
                peers,
            } => ServerMessage::Init {
                id: player.id.clone(),
                room_id: room_id.clone(),
                players: peers.iter().map(PlayerDto::from).collect(),
            },
            SessionPayload::PeerJoined { player } => ServerMessage::NewPlayer {
                player: PlayerDto::from(player),
            },
            SessionPayload::PeerUpdated {
                player_id,
                position,
                direction,
            } => ServerMessage::UpdatePlayer {
                player: PlayerUpdateDto {
                    id: player_id.clone(),
                    position: (*position).into(),
                    direction: *direction,
                },
            },
            SessionPayload::PeerDisconnected { player_id } => ServerMessage::PlayerDisconnect {
                id: player_id.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ShipType;

    #[test]
    fn client_messages_use_the_reference_wire_tags() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"joinRoom","roomId":"alpha"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::JoinRoom { room_id } if room_id == "alpha"));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"reconnect","playerId":"p-1"}"#).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::Reconnect { player_id, room_id: None } if player_id == "p-1"
        ));

        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"update","position":{"x":10,"y":20},"direction":45}"#,
        )
        .unwrap();
        match msg {
            ClientMessage::Update {
                position,
                direction,
            } => {
                assert_eq!(position.x, 10.0);
                assert_eq!(position.y, 20.0);
                assert_eq!(direction, 45.0);
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn unknown_message_types_fail_to_parse() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"teleport"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>("not json").is_err());
    }

    #[test]
    fn init_serializes_with_camel_case_fields_and_asset_skins() {
        let player = PlayerState {
            id: "p-1".to_string(),
            position: Position { x: 1.0, y: 2.0 },
            direction: 270.0,
            ship_type: ShipType::Classic,
        };
        let msg = ServerMessage::Init {
            id: "p-2".to_string(),
            room_id: "alpha".to_string(),
            players: vec![PlayerDto::from(&player)],
        };

        let value: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "init");
        assert_eq!(value["roomId"], "alpha");
        assert_eq!(value["players"][0]["shipType"], "spaceship.svg");
        assert_eq!(value["players"][0]["position"]["x"], 1.0);
    }

    #[test]
    fn player_disconnect_carries_only_the_id() {
        let msg = ServerMessage::PlayerDisconnect {
            id: "p-9".to_string(),
        };
        let value: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "playerDisconnect");
        assert_eq!(value["id"], "p-9");
    }
}
