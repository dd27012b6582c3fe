//! The active session: in-memory state, persistence and capability checks.
//!
//! [`SessionContext`] is injected wherever the session is needed instead of
//! living in a global. It is also the [`SessionGuard`] handed to the remote
//! client, which is how a 401 on an authenticated request ends the session.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::domain::ports::{Navigator, PersistedSession, SessionGuard, SessionStorage};
use crate::domain::{Capability, Credential, Error, Route, Session};

/// Holder of the active [`Session`].
pub struct SessionContext {
    active: Mutex<Option<Session>>,
    storage: Arc<dyn SessionStorage>,
    navigator: Arc<dyn Navigator>,
}

impl SessionContext {
    /// Create a logged-out context.
    pub fn new(storage: Arc<dyn SessionStorage>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            active: Mutex::new(None),
            storage,
            navigator,
        }
    }

    fn active(&self) -> MutexGuard<'_, Option<Session>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the active session.
    pub fn current(&self) -> Option<Session> {
        self.active().clone()
    }

    /// Whether a session is active.
    pub fn is_authenticated(&self) -> bool {
        self.active().is_some()
    }

    /// Whether the active session holds `capability`; `false` when logged out.
    pub fn can(&self, capability: Capability) -> bool {
        self.active()
            .as_ref()
            .is_some_and(|session| session.can(capability))
    }

    /// Require `capability` before performing an action.
    ///
    /// Returns the active session on success, [`Error::unauthorized`] when
    /// logged out and [`Error::forbidden`] when the role lacks the capability.
    pub fn authorize(&self, capability: Capability) -> Result<Session, Error> {
        let Some(session) = self.current() else {
            return Err(Error::unauthorized("sign in to continue"));
        };
        if !session.can(capability) {
            return Err(Error::forbidden(format!(
                "{} may not {capability}",
                session.role()
            )));
        }
        Ok(session)
    }

    /// Make `session` the active session and persist it.
    ///
    /// A persistence failure leaves the session active for this process.
    pub(crate) fn adopt(&self, session: Session) {
        let record = PersistedSession {
            credential: session.credential().clone(),
            profile: session.profile().clone(),
        };
        if let Err(err) = self.storage.save(&record) {
            warn!(error = %err, "session could not be persisted");
        }
        info!(username = session.username(), role = %session.role(), "session started");
        *self.active() = Some(session);
    }

    /// Read the persisted record. Unreadable records are cleared.
    pub(crate) fn load_persisted(&self) -> Option<PersistedSession> {
        match self.storage.load() {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "persisted session unreadable; clearing");
                self.clear_storage();
                None
            }
        }
    }

    /// Remove the persisted record.
    pub(crate) fn clear_storage(&self) {
        if let Err(err) = self.storage.clear() {
            warn!(error = %err, "persisted session could not be cleared");
        }
    }

    /// Drop the in-memory session and the persisted record.
    ///
    /// Returns whether a session was active.
    fn end(&self) -> bool {
        let previous = self.active().take();
        self.clear_storage();
        previous.is_some()
    }

    /// End the session and return to the login screen.
    pub fn logout(&self) {
        if self.end() {
            info!("session ended by logout");
        }
        self.navigator.navigate(Route::Login);
    }
}

impl SessionGuard for SessionContext {
    fn credential(&self) -> Option<Credential> {
        self.active()
            .as_ref()
            .map(|session| session.credential().clone())
    }

    fn expire(&self) {
        if self.end() {
            warn!("credential rejected by server; session ended");
            self.navigator.navigate(Route::Login);
        } else {
            debug!("credential rejection observed while logged out");
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for session state and capability checks.
    use super::*;
    use crate::domain::ports::{InMemorySessionStorage, MockNavigator};
    use crate::domain::{ErrorCode, Profile, Role};
    use rstest::rstest;

    fn session(role: Role) -> Session {
        Session::new(
            Profile::minimal("ana", role),
            Credential::new("token-1").expect("valid token"),
        )
    }

    fn context_with(navigator: MockNavigator) -> (Arc<InMemorySessionStorage>, SessionContext) {
        let storage = Arc::new(InMemorySessionStorage::default());
        let context = SessionContext::new(storage.clone(), Arc::new(navigator));
        (storage, context)
    }

    #[rstest]
    #[case(Role::Admin, Capability::WriteArticles, true)]
    #[case(Role::Admin, Capability::ManageCategories, true)]
    #[case(Role::User, Capability::ReadArticles, true)]
    #[case(Role::User, Capability::WriteArticles, false)]
    #[case(Role::User, Capability::ManageCategories, false)]
    fn capabilities_follow_role(
        #[case] role: Role,
        #[case] capability: Capability,
        #[case] allowed: bool,
    ) {
        let (_, context) = context_with(MockNavigator::new());
        context.adopt(session(role));
        assert_eq!(context.can(capability), allowed);
        let authorized = context.authorize(capability);
        assert_eq!(authorized.is_ok(), allowed);
        if !allowed {
            assert_eq!(
                authorized.expect_err("refused").code(),
                ErrorCode::Forbidden
            );
        }
    }

    #[test]
    fn authorize_requires_a_session() {
        let (_, context) = context_with(MockNavigator::new());
        let err = context
            .authorize(Capability::ReadArticles)
            .expect_err("logged out");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert!(!context.can(Capability::ReadArticles));
    }

    #[test]
    fn adopt_persists_the_session() {
        let (storage, context) = context_with(MockNavigator::new());
        context.adopt(session(Role::User));
        let record = storage.load().expect("load").expect("persisted");
        assert_eq!(record.profile.username, "ana");
        assert_eq!(record.credential.expose(), "token-1");
    }

    #[test]
    fn expire_navigates_once() {
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .withf(|route| *route == Route::Login)
            .times(1)
            .return_const(());
        let (storage, context) = context_with(navigator);
        context.adopt(session(Role::Admin));

        context.expire();
        context.expire();

        assert!(context.credential().is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn logout_clears_state_and_navigates() {
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .withf(|route| *route == Route::Login)
            .times(1)
            .return_const(());
        let (storage, context) = context_with(navigator);
        context.adopt(session(Role::User));

        context.logout();

        assert!(!context.is_authenticated());
        assert!(storage.is_empty());
    }
}
