use crate::SignalBus;

use uuid::Uuid;

/// Explicitly owned per-session context.
///
/// Handed by reference (or clone) to the coordinator and the control binder
/// instead of any process-wide lookup. Cloning shares the same bus.
#[derive(Clone)]
pub struct SessionContext {
    session_id: Uuid,
    client_id: Uuid,
    bus: SignalBus,
}

impl SessionContext {
    /// New session with a fresh session id and its own bus.
    pub fn new(client_id: Uuid) -> Self {
        Self::with_ids(Uuid::new_v4(), client_id)
    }

    /// Session with known identifiers.
    pub fn with_ids(session_id: Uuid, client_id: Uuid) -> Self {
        Self {
            session_id,
            client_id,
            bus: SignalBus::new(),
        }
    }

    /// Session identifier sent with interrupt notices.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Client identifier sent with interrupt notices.
    pub fn client_id(&self) -> Uuid {
        self.client_id
    }

    /// The session's signal bus.
    pub fn bus(&self) -> &SignalBus {
        &self.bus
    }
}
