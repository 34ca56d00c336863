use thiserror::Error;

/// Main error type for the client.
///
/// Every variant carries a message that is safe to show to the user as-is.
/// For [`ApiError::Envelope`] the message is exactly the server-provided one,
/// so UI code can display errors without inspecting the variant.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Input rejected before any network effect (mock validation).
    #[error("{0}")]
    Validation(String),

    /// The server responded but signaled failure in its envelope, or
    /// claimed success with an absent payload.
    #[error("{0}")]
    Envelope(String),

    /// The request was rejected with 401. By the time this is raised the
    /// session has been cleared and the navigator pointed at the login path.
    #[error("{0}")]
    Unauthorized(String),

    /// The per-request deadline elapsed before a response arrived.
    #[error("request timed out")]
    Timeout,

    /// Network failure or a non-2xx response without a usable envelope.
    #[error("{0}")]
    Transport(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// True for the unauthorized variant; lets callers react to forced
    /// logout without matching on the full enum.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

/// Result type alias for the client.
pub type Result<T> = std::result::Result<T, ApiError>;
