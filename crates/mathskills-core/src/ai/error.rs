use thiserror::Error;

/// Failures surfaced by a chat completion round trip.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Response contained no message content")]
    MissingContent,

    #[error("Request aborted")]
    Aborted,
}

impl AdapterError {
    /// A user-initiated cancellation, not a failure.
    pub fn is_aborted(&self) -> bool {
        matches!(self, AdapterError::Aborted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_keeps_code_and_body() {
        let err = AdapterError::Status {
            status: 502,
            body: "upstream unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 502: upstream unavailable");
        assert!(!err.is_aborted());
        assert!(AdapterError::Aborted.is_aborted());
    }
}
