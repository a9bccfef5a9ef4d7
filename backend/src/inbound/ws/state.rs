//! Shared live-channel adapter state.

use url::Url;

use crate::outbound::broadcast::SessionHub;

/// Dependency bundle for the live-channel entry point.
#[derive(Clone)]
pub struct WsState {
    /// Hub each new session subscribes to.
    pub hub: SessionHub,
    /// The single browser origin allowed to open a session.
    pub allowed_origin: Url,
}

impl WsState {
    /// Construct state from the hub and the allowed origin.
    pub fn new(hub: SessionHub, allowed_origin: Url) -> Self {
        Self {
            hub,
            allowed_origin,
        }
    }
}
