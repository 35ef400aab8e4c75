//! Error types for the QuickNode provider.

use thiserror::Error;

/// Errors that can occur while reconciling QuickNode resources.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a status other than 200.
    #[error("status: {status}, body: {body}")]
    Status {
        /// Numeric HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// A response or state document could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The API reported an error inside an otherwise successful response.
    #[error("QuickNode API error: {0}")]
    Api(String),

    /// Invalid input from the user (malformed import ID, missing attribute).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// An invariant of the provider itself was violated.
    #[error("Internal error: {0}")]
    Internal(String),

    /// The provider configuration is invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An operation needing the API was called before `configure` succeeded.
    #[error("Provider is not configured")]
    NotConfigured,

    /// The requested resource or data source type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

}

impl ProviderError {
    /// Get the error message as a string.
    ///
    /// Returns the bare message for string-carrying variants, and the
    /// formatted message for the structured ones.
    pub fn message(&self) -> String {
        match self {
            Self::Api(msg)
            | Self::InvalidRequest(msg)
            | Self::Internal(msg)
            | Self::Configuration(msg)
            | Self::UnknownResource(msg) => msg.clone(),
            Self::Transport(err) => err.to_string(),
            Self::Serialization(err) => err.to_string(),
            Self::Status { .. } | Self::NotConfigured => self.to_string(),
        }
    }

    /// Create a status error from a code and raw body.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// HTTP status code carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ProviderError::status(401, r#"{"error":"unauthorized"}"#);
        assert_eq!(
            err.to_string(),
            r#"status: 401, body: {"error":"unauthorized"}"#
        );
        assert_eq!(err.status_code(), Some(401));
    }

    #[test]
    fn test_error_display() {
        let err = ProviderError::Api("endpoint not found".to_string());
        assert_eq!(format!("{}", err), "QuickNode API error: endpoint not found");

        let err = ProviderError::InvalidRequest("bad import id".to_string());
        assert_eq!(format!("{}", err), "Invalid request: bad import id");

        let err = ProviderError::UnknownResource("quicknode_bucket".to_string());
        assert_eq!(format!("{}", err), "Unknown resource type: quicknode_bucket");

        assert_eq!(
            ProviderError::NotConfigured.to_string(),
            "Provider is not configured"
        );
    }

    #[test]
    fn test_message_method() {
        let err = ProviderError::Internal("update not supported".to_string());
        assert_eq!(err.message(), "update not supported");

        let err = ProviderError::Configuration("missing api key".to_string());
        assert_eq!(err.message(), "missing api key");

        let err = ProviderError::status(500, "boom");
        assert_eq!(err.message(), "status: 500, body: boom");
        assert_eq!(ProviderError::Api("x".into()).status_code(), None);
    }

    #[test]
    fn test_serialization_from() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: ProviderError = parse_err.into();
        assert!(matches!(err, ProviderError::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization error"));
    }
}
