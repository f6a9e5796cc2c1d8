//! Error types for the account API client.
//!
//! # Design
//! Every non-2xx response becomes `Rejected`, carrying the status and the
//! server's error payload decoded as untyped JSON. Not-found is not a
//! separate variant; it is a rejection with status 404 and callers ask for it
//! through [`ApiError::is_not_found`]. Transport failures keep the original
//! error as their source.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by `AccountClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or no response was received.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    /// The server answered with a status outside `[200, 300)`.
    #[error("{status} Error: {body}")]
    Rejected { status: u16, body: serde_json::Value },

    /// The server answered with an error status and a body that is not JSON.
    #[error("error unmarshaling response error (status {status}): {source}")]
    ErrorBodyDecode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// A success body could not be deserialized into the expected envelope.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The server answered 2xx with no body where an account was expected.
    #[error("empty response body")]
    EmptyResponse,
}

impl ApiError {
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ApiError::Transport(Box::new(err))
    }

    /// HTTP status of the response that caused this error, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } | ApiError::ErrorBodyDecode { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The `error_message` field of a rejection payload, when the server sent one.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { body, .. } => body.get("error_message")?.as_str(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejected_display_includes_status_and_payload() {
        let err = ApiError::Rejected {
            status: 400,
            body: json!({"error_message": "bad"}),
        };
        assert_eq!(err.to_string(), r#"400 Error: {"error_message":"bad"}"#);
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.error_message(), Some("bad"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_is_a_404_rejection() {
        let err = ApiError::Rejected {
            status: 404,
            body: json!({"error_message": "record does not exist"}),
        };
        assert!(err.is_not_found());
    }

    #[test]
    fn error_message_absent_for_non_object_payload() {
        let err = ApiError::Rejected {
            status: 500,
            body: json!("oops"),
        };
        assert_eq!(err.error_message(), None);
    }

    #[test]
    fn transport_error_has_no_status() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ApiError::transport(io);
        assert_eq!(err.status(), None);
        assert!(std::error::Error::source(&err).is_some());
    }
}
