// Domain layer: player identity and live state.

pub mod player;

pub use player::{PlayerId, PlayerState, Position, ShipType};
