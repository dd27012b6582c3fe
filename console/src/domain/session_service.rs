//! Session flows: restore on start-up, login, register and logout.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::ports::{AuthGateway, GatewayError, PersistedSession};
use crate::domain::session::SessionContext;
use crate::domain::{AuthError, Error, LoginCredentials, Profile, Registration, Role, Session};

/// Drives the [`SessionContext`] through the auth endpoints.
#[derive(Clone)]
pub struct SessionService {
    context: Arc<SessionContext>,
    gateway: Arc<dyn AuthGateway>,
}

impl SessionService {
    /// Create a new service around `context`.
    pub fn new(context: Arc<SessionContext>, gateway: Arc<dyn AuthGateway>) -> Self {
        Self { context, gateway }
    }

    /// Shared session context.
    pub fn context(&self) -> &Arc<SessionContext> {
        &self.context
    }

    /// Re-establish the persisted session, if it is still accepted.
    ///
    /// The stored credential is validated by fetching the profile it belongs
    /// to. Any failure clears the persisted records and leaves the console
    /// logged out.
    pub async fn restore(&self) -> Option<Session> {
        let PersistedSession {
            credential,
            profile: stored,
        } = self.context.load_persisted()?;

        match self.gateway.profile(&credential).await {
            Ok(profile) => {
                debug!(username = %stored.username, "persisted session accepted");
                let session = Session::new(profile, credential);
                self.context.adopt(session.clone());
                Some(session)
            }
            Err(err) => {
                warn!(error = %err, "persisted session rejected; clearing");
                self.context.clear_storage();
                None
            }
        }
    }

    /// Log in with a username and password.
    ///
    /// When the profile cannot be fetched after a successful login, a minimal
    /// session is built from `username` and the role reported by the login
    /// response. A profile request answered with 401 fails the login and
    /// nothing is persisted.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let credentials = LoginCredentials::try_from_parts(username, password)?;
        self.login_with(&credentials).await
    }

    async fn login_with(&self, credentials: &LoginCredentials) -> Result<Session, AuthError> {
        let grant = self
            .gateway
            .login(credentials)
            .await
            .map_err(|err| AuthError::from_remote(Error::from(err)))?;
        let Some(credential) = grant.credential else {
            warn!(username = credentials.username(), "login answered without a token");
            return Err(AuthError::MissingCredential);
        };

        let profile = match self.gateway.profile(&credential).await {
            Ok(profile) => profile,
            Err(err @ GatewayError::Unauthorized { .. }) => {
                warn!(error = %err, "credential rejected right after login");
                self.context.clear_storage();
                return Err(AuthError::Rejected(Error::from(err)));
            }
            Err(err) => {
                warn!(error = %err, "profile unavailable after login; using minimal profile");
                Profile::minimal(credentials.username(), grant.role.unwrap_or_default())
            }
        };

        let session = Session::new(profile, credential);
        self.context.adopt(session.clone());
        Ok(session)
    }

    /// Create an account, then log into it.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<Session, AuthError> {
        let registration = Registration::try_from_parts(username, password, role)?;
        self.gateway
            .register(&registration)
            .await
            .map_err(|err| AuthError::from_remote(Error::from(err)))?;
        info!(username = registration.credentials().username(), %role, "account registered");
        self.login_with(registration.credentials()).await
    }

    /// End the session and return to the login screen.
    pub fn logout(&self) {
        self.context.logout();
    }
}

#[cfg(test)]
#[path = "session_service_tests.rs"]
mod tests;
