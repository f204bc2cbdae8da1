// Player identity and transient state relayed between clients.

use rand::Rng;

/// Opaque player identifier, generated server-side on first connect and
/// stable across reconnects while a disconnect cache entry exists.
pub type PlayerId = String;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Cosmetic ship skin. The wire form is the client asset name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipType {
    Classic,
    Raider,
}

impl ShipType {
    pub fn asset_name(self) -> &'static str {
        match self {
            ShipType::Classic => "spaceship.svg",
            ShipType::Raider => "spaceship2.svg",
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            ShipType::Classic
        } else {
            ShipType::Raider
        }
    }
}

/// Live state of a connected player. Owned by the presence store while the
/// player is connected; snapshotted into the disconnect cache on close.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub id: PlayerId,
    pub position: Position,
    pub direction: f64,
    pub ship_type: ShipType,
}

impl PlayerState {
    /// Fresh-connect state: random position inside the spawn area, default
    /// heading, randomly assigned skin.
    pub fn spawn(id: PlayerId, spawn_area: (f64, f64), direction: f64) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            id,
            position: Position {
                x: rng.gen_range(0.0..spawn_area.0),
                y: rng.gen_range(0.0..spawn_area.1),
            },
            direction,
            ship_type: ShipType::random(&mut rng),
        }
    }
}
