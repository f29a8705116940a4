//! Assist service-specific error types.

/// Errors that can occur while talking to the text-assist service.
#[derive(Debug, thiserror::Error)]
pub enum AssistError {
    /// No endpoint is configured, or the service could not be reached
    #[error("Assistant unavailable: {0}")]
    ServiceUnavailable(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("Assistant error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Failed to deserialize the service response
    #[error("Failed to deserialize assistant response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// Service answered without any message
    #[error("Assistant returned an empty reply")]
    EmptyReply,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assist_error_display() {
        let error = AssistError::ServiceUnavailable("no url configured".to_string());
        assert!(error.to_string().contains("unavailable"));
        assert!(error.to_string().contains("no url configured"));

        let error = AssistError::ApiError {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert!(error.to_string().contains("503"));
        assert!(error.to_string().contains("overloaded"));

        let error = AssistError::EmptyReply;
        assert!(error.to_string().contains("empty reply"));
    }
}
