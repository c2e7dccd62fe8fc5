//! Client error types

use thiserror::Error;

/// Errors that can occur when talking to the academic API
#[derive(Error, Debug)]
pub enum ClientError {
    /// Backend not reachable
    #[error("Academic API unavailable")]
    Unavailable,

    /// Request timed out
    #[error("Request timeout")]
    Timeout,

    /// Transport-level failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not the JSON we expected
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Caller passed something we cannot send
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    /// Map a reqwest error the way every call site does.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_connect() {
            ClientError::Unavailable
        } else {
            ClientError::Request(err)
        }
    }

    /// Short text for a transient notice
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Unavailable => "Could not reach the server".to_string(),
            ClientError::Timeout => "The server took too long to answer".to_string(),
            ClientError::Api { status: 404, .. } => "Record not found".to_string(),
            ClientError::Api { message, .. } if !message.is_empty() => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::Api {
            status: 422,
            message: "trimestre requerido".to_string(),
        };
        assert_eq!(err.to_string(), "API error 422: trimestre requerido");
        assert_eq!(err.user_message(), "trimestre requerido");

        assert_eq!(ClientError::Timeout.to_string(), "Request timeout");
    }

    #[test]
    fn test_not_found() {
        let err = ClientError::Api {
            status: 404,
            message: String::new(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.user_message(), "Record not found");
        assert!(!ClientError::Unavailable.is_not_found());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ClientError = json_err.into();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
