use std::{env, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub fn http_port() -> u16 {
    env::var("RELAY_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000)
}

/// Room assigned to clients that never name one. Always exists.
pub const DEFAULT_ROOM_ID: &str = "default";

/// Spawn area for fresh players, matching the client view bounds.
pub const SPAWN_AREA: (f64, f64) = (800.0, 600.0);

/// Heading assigned to freshly spawned players, in degrees.
pub const DEFAULT_DIRECTION: f64 = 270.0;

/// How long a disconnected player's identity stays reserved.
pub const DISCONNECT_TTL: Duration = Duration::from_secs(60 * 60);

/// Cadence of the disconnect cache sweep.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(15 * 60);
