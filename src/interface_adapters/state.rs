use crate::use_cases::SessionHub;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    // The single hub owning presence, rooms, and the disconnect cache.
    pub hub: Arc<SessionHub>,
}
