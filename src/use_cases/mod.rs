// Use cases layer: the stateful cores of the relay.

pub mod disconnect_cache;
pub mod presence;
pub mod registry;
pub mod rooms;
pub mod session;
pub mod types;

pub use session::{HubSettings, SessionHub, expiry_sweeper};
pub use types::{ClientSender, ConnId, SessionCommand, SessionPayload};
