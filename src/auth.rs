// Session collaborator - checked whenever a protected page becomes current
use std::cell::Cell;

/// The authentication service as seen by navigation: is there a session,
/// and end it.
pub trait SessionProvider {
    fn has_session(&self) -> bool;
    fn sign_out(&self);
}

/// Session flag kept in memory.
#[derive(Debug, Default)]
pub struct MemorySession {
    signed_in: Cell<bool>,
}

impl MemorySession {
    pub fn new(signed_in: bool) -> Self {
        Self {
            signed_in: Cell::new(signed_in),
        }
    }

    pub fn sign_in(&self) {
        self.signed_in.set(true);
    }
}

impl SessionProvider for MemorySession {
    fn has_session(&self) -> bool {
        self.signed_in.get()
    }

    fn sign_out(&self) {
        tracing::debug!("session ended");
        self.signed_in.set(false);
    }
}
