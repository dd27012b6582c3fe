//! Identity model: users, roles, credentials and the active session.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::capability::{Capability, Route};

/// Validation errors returned by the identity constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityValidationError {
    /// A user id was blank.
    EmptyUserId,
    /// A username was blank once trimmed.
    EmptyUsername,
    /// A bearer credential was blank.
    EmptyCredential,
}

impl fmt::Display for IdentityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUserId => write!(f, "user id must not be empty"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyCredential => write!(f, "credential must not be empty"),
        }
    }
}

impl std::error::Error for IdentityValidationError {}

/// Server-issued user identifier.
///
/// Identifiers are opaque to the console; only non-emptiness is checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(IdentityValidationError::EmptyUserId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Account role. Unknown or missing roles are treated as [`Role::User`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Reader account.
    #[default]
    User,
    /// Editor account with write access to articles and categories.
    Admin,
}

impl Role {
    /// Whether this role holds `capability`.
    ///
    /// This is the single place role-based branching happens; views and
    /// actions ask for capabilities instead of comparing roles.
    ///
    /// # Examples
    /// ```
    /// use article_console::domain::{Capability, Role};
    ///
    /// assert!(Role::Admin.grants(Capability::ManageCategories));
    /// assert!(Role::User.grants(Capability::ReadArticles));
    /// assert!(!Role::User.grants(Capability::WriteArticles));
    /// ```
    pub fn grants(self, capability: Capability) -> bool {
        match self {
            Self::Admin => true,
            Self::User => matches!(capability, Capability::ReadArticles),
        }
    }

    /// Screen a freshly authenticated user with this role lands on.
    pub fn landing_route(self) -> Route {
        if self.grants(Capability::WriteArticles) {
            Route::ArticlesAdmin
        } else {
            Route::Articles
        }
    }

    /// Parse a role reported by the server, defaulting to [`Role::User`].
    pub fn from_reported(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(role) if role.eq_ignore_ascii_case("admin") => Self::Admin,
            _ => Self::User,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self::from_reported(Some(value.as_str()))
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("User"),
            Self::Admin => f.write_str("Admin"),
        }
    }
}

/// Opaque bearer token issued at login.
///
/// ## Invariants
/// - The token is never blank.
/// - The token is wiped from memory on drop and redacted from `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Zeroizing<String>);

impl Credential {
    /// Validate and wrap a bearer token.
    pub fn new(token: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let token = Zeroizing::new(token.into());
        if token.trim().is_empty() {
            return Err(IdentityValidationError::EmptyCredential);
        }
        Ok(Self(token))
    }

    /// Raw token, for the `Authorization` header and persistence only.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Identity as reported by `/auth/profile` and persisted under the `user` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Server id; absent for the minimal profile built when the profile
    /// endpoint could not be reached during login.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "optional_id")]
    pub id: Option<UserId>,
    /// Login name.
    pub username: String,
    /// Account role.
    #[serde(default)]
    pub role: Role,
}

impl Profile {
    /// Build the minimal profile used when the profile endpoint fails.
    pub fn minimal(username: impl Into<String>, role: Role) -> Self {
        Self {
            id: None,
            username: username.into(),
            role,
        }
    }
}

mod optional_id {
    //! The server and older persisted records may carry `""` for a missing id.

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::UserId;

    pub(super) fn serialize<S: Serializer>(
        value: &Option<UserId>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<UserId>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|id| UserId::new(id).ok()))
    }
}

/// The authenticated identity plus its bearer credential.
///
/// A `Session` cannot exist without a credential; logging out drops it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    profile: Profile,
    credential: Credential,
}

impl Session {
    /// Pair a profile with the credential that authenticated it.
    pub fn new(profile: Profile, credential: Credential) -> Self {
        Self {
            profile,
            credential,
        }
    }

    /// Server id, when known.
    pub fn user_id(&self) -> Option<&UserId> {
        self.profile.id.as_ref()
    }

    /// Login name.
    pub fn username(&self) -> &str {
        self.profile.username.as_str()
    }

    /// Account role.
    pub fn role(&self) -> Role {
        self.profile.role
    }

    /// Identity half of the session.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Bearer credential attached to authenticated requests.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Whether the session's role holds `capability`.
    pub fn can(&self, capability: Capability) -> bool {
        self.profile.role.grants(capability)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for identity primitives.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(Some("Admin"), Role::Admin)]
    #[case(Some("admin"), Role::Admin)]
    #[case(Some("User"), Role::User)]
    #[case(Some("Editor"), Role::User)]
    #[case(None, Role::User)]
    fn reported_roles_default_to_user(#[case] raw: Option<&str>, #[case] expected: Role) {
        assert_eq!(Role::from_reported(raw), expected);
    }

    #[rstest]
    #[case(Role::Admin, Route::ArticlesAdmin)]
    #[case(Role::User, Route::Articles)]
    fn landing_route_follows_write_capability(#[case] role: Role, #[case] expected: Route) {
        assert_eq!(role.landing_route(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("  ")]
    fn blank_credentials_are_rejected(#[case] token: &str) {
        assert_eq!(
            Credential::new(token).expect_err("blank token"),
            IdentityValidationError::EmptyCredential
        );
    }

    #[test]
    fn credential_debug_is_redacted() {
        let credential = Credential::new("secret-token").expect("valid token");
        assert!(!format!("{credential:?}").contains("secret-token"));
    }

    #[test]
    fn profile_treats_empty_id_as_missing() {
        let profile: Profile =
            serde_json::from_value(json!({ "id": "", "username": "ana", "role": "Admin" }))
                .expect("decode profile");
        assert_eq!(profile.id, None);
        assert_eq!(profile.role, Role::Admin);
    }

    #[test]
    fn profile_defaults_missing_role_to_user() {
        let profile: Profile = serde_json::from_value(json!({ "id": "u-1", "username": "ana" }))
            .expect("decode profile");
        assert_eq!(profile.role, Role::User);
        assert_eq!(profile.id.as_ref().map(AsRef::as_ref), Some("u-1"));
    }
}
