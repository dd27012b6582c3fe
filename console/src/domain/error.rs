//! Domain-level error types.
//!
//! These errors are transport agnostic. The remote client maps HTTP outcomes
//! into them and the command-line front end renders them; stores and session
//! flows only ever see [`Error`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Input failed validation, locally or on the server.
    InvalidRequest,
    /// The credential is missing or was rejected.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested entity does not exist.
    NotFound,
    /// The server could not be reached or did not answer in time.
    Network,
    /// Anything else, including undecodable responses.
    InternalError,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use article_console::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("article 42 does not exist").with_status(404);
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.status(), Some(404));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    status: Option<u16>,
    details: Option<Value>,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorValidationError {
    /// The message was blank.
    EmptyMessage,
}

impl std::fmt::Display for ErrorValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "error message must not be empty"),
        }
    }
}

impl std::error::Error for ErrorValidationError {}

const FALLBACK_MESSAGE: &str = "request failed";

impl Error {
    /// Create a new error.
    ///
    /// Blank messages are replaced with a generic one so that a server
    /// answering with an empty body still yields a readable error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(_) => Self {
                code,
                message: FALLBACK_MESSAGE.to_owned(),
                status: None,
                details: None,
            },
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            status: None,
            details: None,
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message suitable for an inline error or toast.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// HTTP status reported by the server, when the failure came from one.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Supplementary details, such as per-field validation failures.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach the HTTP status that produced this error.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use article_console::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("title is required")
    ///     .with_details(json!({ "field": "title" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Network`].
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Network, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {status})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
            status: value.status,
            details: value.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            code,
            message,
            status,
            details,
        } = value;

        let mut error = Error::try_new(code, message)?;
        error.status = status;
        error.details = details;
        Ok(error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for domain errors.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn try_new_rejects_blank_messages(#[case] message: &str) {
        let result = Error::try_new(ErrorCode::InternalError, message);
        assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
    }

    #[test]
    fn new_substitutes_a_generic_message_for_blank_input() {
        let err = Error::network("  ");
        assert_eq!(err.message(), FALLBACK_MESSAGE);
        assert_eq!(err.code(), ErrorCode::Network);
    }

    #[test]
    fn display_includes_status_when_present() {
        let err = Error::forbidden("admins only").with_status(403);
        assert_eq!(err.to_string(), "admins only (status 403)");
    }

    #[test]
    fn serde_round_trip_keeps_status_and_details() {
        let err = Error::invalid_request("bad")
            .with_status(400)
            .with_details(json!({ "title": "required" }));
        let value = serde_json::to_value(&err).expect("serialise");
        assert_eq!(value["code"], json!("invalid_request"));
        let decoded: Error = serde_json::from_value(value).expect("deserialise");
        assert_eq!(decoded, err);
    }

    #[test]
    fn deserialise_rejects_blank_message() {
        let result: Result<Error, _> =
            serde_json::from_value(json!({ "code": "not_found", "message": " " }));
        assert!(result.is_err());
    }
}
