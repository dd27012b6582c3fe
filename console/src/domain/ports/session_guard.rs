//! Port through which the remote client reads the active credential and
//! reports its rejection.

use crate::domain::Credential;

/// Access to the active session from inside the remote client.
#[cfg_attr(test, mockall::automock)]
pub trait SessionGuard: Send + Sync {
    /// Credential of the active session, if any.
    fn credential(&self) -> Option<Credential>;

    /// End the session after the server rejected its credential.
    ///
    /// Must be idempotent: calling it while logged out has no visible effect.
    fn expire(&self);
}

/// Guard for clients used without a session; it never holds a credential.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSessionGuard;

impl SessionGuard for FixtureSessionGuard {
    fn credential(&self) -> Option<Credential> {
        None
    }

    fn expire(&self) {}
}
