//! Errors shared by the remote gateway ports.

use serde_json::Value;

use super::define_port_error;
use crate::domain::Error;

define_port_error! {
    /// Errors surfaced while calling the Article Console REST API.
    pub enum GatewayError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "api transport failed: {message}",
        /// The request exceeded its timeout or the server reported one.
        Timeout { message: String } =>
            "api timeout: {message}",
        /// The credential was missing or rejected (HTTP 401).
        Unauthorized { message: String } =>
            "api rejected credential: {message}",
        /// The credential lacks permission (HTTP 403).
        Forbidden { message: String } =>
            "api forbade request: {message}",
        /// The entity does not exist (HTTP 404).
        NotFound { message: String } =>
            "api entity not found: {message}",
        /// The server rejected the payload (HTTP 400 or 422).
        Invalid { status: u16, message: String, details: Option<Value> } =>
            "api rejected payload with {status}: {message}",
        /// Any other non-success status.
        Status { status: u16, message: String } =>
            "api returned {status}: {message}",
        /// A success response could not be decoded.
        Decode { message: String } =>
            "api response decode failed: {message}",
        /// Adapter rejected the request before execution.
        InvalidRequest { message: String } =>
            "api request invalid: {message}",
    }
}

impl GatewayError {
    /// HTTP status carried by this error, when one was received.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Invalid { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Transport { .. }
            | Self::Timeout { .. }
            | Self::Decode { .. }
            | Self::InvalidRequest { .. } => None,
        }
    }
}

impl From<GatewayError> for Error {
    fn from(value: GatewayError) -> Self {
        let status = value.http_status();
        let error = match value {
            GatewayError::Transport { message } | GatewayError::Timeout { message } => {
                Self::network(message)
            }
            GatewayError::Unauthorized { message } => Self::unauthorized(message),
            GatewayError::Forbidden { message } => Self::forbidden(message),
            GatewayError::NotFound { message } => Self::not_found(message),
            GatewayError::Invalid {
                message, details, ..
            } => {
                let error = Self::invalid_request(message);
                match details {
                    Some(details) => error.with_details(details),
                    None => error,
                }
            }
            GatewayError::InvalidRequest { message } => Self::invalid_request(message),
            GatewayError::Status { message, .. } => Self::internal(message),
            GatewayError::Decode { message } => {
                Self::internal(format!("unexpected response: {message}"))
            }
        };
        match status {
            Some(status) => error.with_status(status),
            None => error,
        }
    }
}
