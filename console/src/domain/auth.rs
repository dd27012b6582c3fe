//! Authentication primitives: login credentials, registrations and the
//! errors returned by the session flows.
//!
//! Constructors validate raw strings before the session service talks to the
//! auth gateway, so blank input never reaches the network.

use std::fmt;

use thiserror::Error;
use zeroize::Zeroizing;

use crate::domain::{Error, ErrorCode, Role};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use article_console::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" editor ", "hunter2").unwrap();
/// assert_eq!(creds.username(), "editor");
/// assert_eq!(creds.password(), "hunter2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username sent to `/auth/login`.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password sent to `/auth/login`.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// A new account request: credentials plus the requested role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    credentials: LoginCredentials,
    role: Role,
}

impl Registration {
    /// Validate and construct a registration.
    pub fn try_from_parts(
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<Self, LoginValidationError> {
        Ok(Self {
            credentials: LoginCredentials::try_from_parts(username, password)?,
            role,
        })
    }

    /// Credentials used for the automatic login after registration.
    pub fn credentials(&self) -> &LoginCredentials {
        &self.credentials
    }

    /// Requested role.
    pub fn role(&self) -> Role {
        self.role
    }
}

/// Failures of the login and register flows.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    /// Input was rejected before any request was sent.
    #[error(transparent)]
    InvalidInput(#[from] LoginValidationError),
    /// The server accepted the login but returned no usable token.
    #[error("token missing from server response")]
    MissingCredential,
    /// The server refused the login or registration.
    #[error("{0}")]
    Rejected(Error),
    /// The server could not be reached or answered unexpectedly.
    #[error("{0}")]
    Unavailable(Error),
}

impl AuthError {
    /// Classify a remote failure as a refusal or an outage.
    pub fn from_remote(error: Error) -> Self {
        match error.code() {
            ErrorCode::Unauthorized
            | ErrorCode::Forbidden
            | ErrorCode::InvalidRequest
            | ErrorCode::NotFound => Self::Rejected(error),
            _ => Self::Unavailable(error),
        }
    }

    /// Message suitable for an inline form error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(error) | Self::Unavailable(error) => error.message().to_owned(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn registration_keeps_requested_role() {
        let registration =
            Registration::try_from_parts("new-admin", "pw", Role::Admin).expect("valid");
        assert_eq!(registration.role(), Role::Admin);
        assert_eq!(registration.credentials().username(), "new-admin");
    }

    #[rstest]
    #[case(Error::unauthorized("bad password"), true)]
    #[case(Error::invalid_request("username taken"), true)]
    #[case(Error::network("connection refused"), false)]
    #[case(Error::internal("boom"), false)]
    fn remote_errors_are_classified(#[case] error: Error, #[case] rejected: bool) {
        let classified = AuthError::from_remote(error);
        assert_eq!(matches!(classified, AuthError::Rejected(_)), rejected);
    }

    #[test]
    fn user_message_prefers_server_text() {
        let err = AuthError::from_remote(Error::unauthorized("Invalid username or password"));
        assert_eq!(err.user_message(), "Invalid username or password");
    }
}
