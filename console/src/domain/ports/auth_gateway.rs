//! Driven port for the authentication endpoints.
//!
//! Every method takes its credentials explicitly. The session flows decide
//! what a failure means; the adapter never touches the active session here,
//! so a 401 from `/auth/profile` during restore does not count as a forced
//! logout.

use async_trait::async_trait;

use super::GatewayError;
use crate::domain::{Credential, LoginCredentials, Profile, Registration, Role};

/// Successful `/auth/login` answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
    /// Bearer credential; `None` when the server omitted the token.
    pub credential: Option<Credential>,
    /// Role reported alongside the token, if any.
    pub role: Option<Role>,
}

/// Port for the `/auth/*` endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange a username and password for a bearer credential.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginGrant, GatewayError>;

    /// Create an account. The answer body is not used.
    async fn register(&self, registration: &Registration) -> Result<(), GatewayError>;

    /// Fetch the profile owning `credential`.
    async fn profile(&self, credential: &Credential) -> Result<Profile, GatewayError>;
}

/// In-memory authenticator accepting `admin` / `password` as an admin and
/// `reader` / `password` as a user.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAuthGateway;

const FIXTURE_ADMIN_TOKEN: &str = "fixture-admin-token";
const FIXTURE_READER_TOKEN: &str = "fixture-reader-token";

#[async_trait]
impl AuthGateway for FixtureAuthGateway {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginGrant, GatewayError> {
        let (token, role) = match (credentials.username(), credentials.password()) {
            ("admin", "password") => (FIXTURE_ADMIN_TOKEN, Role::Admin),
            ("reader", "password") => (FIXTURE_READER_TOKEN, Role::User),
            _ => return Err(GatewayError::unauthorized("Invalid username or password")),
        };
        let credential = Credential::new(token)
            .map_err(|err| GatewayError::decode(format!("invalid fixture token: {err}")))?;
        Ok(LoginGrant {
            credential: Some(credential),
            role: Some(role),
        })
    }

    async fn register(&self, registration: &Registration) -> Result<(), GatewayError> {
        match registration.credentials().username() {
            "admin" | "reader" => Err(GatewayError::invalid(
                400_u16,
                "Username already exists",
                None::<serde_json::Value>,
            )),
            _ => Ok(()),
        }
    }

    async fn profile(&self, credential: &Credential) -> Result<Profile, GatewayError> {
        match credential.expose() {
            FIXTURE_ADMIN_TOKEN => Ok(Profile::minimal("admin", Role::Admin)),
            FIXTURE_READER_TOKEN => Ok(Profile::minimal("reader", Role::User)),
            _ => Err(GatewayError::unauthorized("Unauthorized")),
        }
    }
}
