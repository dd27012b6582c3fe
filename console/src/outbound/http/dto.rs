//! Wire DTOs for the auth endpoints and error bodies.
//!
//! Entities and page envelopes decode straight into domain types; only the
//! shapes that have no domain counterpart live here.

use serde::{Deserialize, Serialize};

use crate::domain::ports::LoginGrant;
use crate::domain::{Credential, LoginCredentials, Registration, Role};

#[derive(Debug, Serialize)]
pub(super) struct LoginRequestDto<'a> {
    pub(super) username: &'a str,
    pub(super) password: &'a str,
}

impl<'a> From<&'a LoginCredentials> for LoginRequestDto<'a> {
    fn from(value: &'a LoginCredentials) -> Self {
        Self {
            username: value.username(),
            password: value.password(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct RegisterRequestDto<'a> {
    pub(super) username: &'a str,
    pub(super) password: &'a str,
    pub(super) role: Role,
}

impl<'a> From<&'a Registration> for RegisterRequestDto<'a> {
    fn from(value: &'a Registration) -> Self {
        Self {
            username: value.credentials().username(),
            password: value.credentials().password(),
            role: value.role(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginResponseDto {
    #[serde(default)]
    pub(super) token: Option<String>,
    #[serde(default)]
    pub(super) role: Option<String>,
}

impl LoginResponseDto {
    /// Blank tokens count as missing.
    pub(super) fn into_grant(self) -> LoginGrant {
        LoginGrant {
            credential: self.token.and_then(|token| Credential::new(token).ok()),
            role: self
                .role
                .as_deref()
                .map(|role| Role::from_reported(Some(role))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    pub(super) message: Option<MessageDto>,
}

/// Validation failures arrive as a list of messages, everything else as one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum MessageDto {
    One(String),
    Many(Vec<String>),
}

impl MessageDto {
    pub(super) fn into_text(self) -> Option<String> {
        let text = match self {
            Self::One(message) => message,
            Self::Many(messages) => messages.join("; "),
        };
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    }
}
