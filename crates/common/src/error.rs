/// Distill error types
#[derive(Debug, thiserror::Error)]
pub enum DistillError {
    /// LLM related error (malformed or empty completion)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Completion API answered with a non-success status
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Summary never dropped under the length threshold
    #[error("Summary did not converge after {rounds} rounds (last length: {length} chars)")]
    NotConverged { rounds: u32, length: usize },

    /// Caller-side deadline expired
    #[error("{0}")]
    Timeout(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DistillError {
    /// Create LLM error
    pub fn llm<S: Into<String>>(msg: S) -> Self {
        Self::Llm(msg.into())
    }

    /// Create API error
    pub fn api<S: Into<String>>(status: u16, msg: S) -> Self {
        Self::Api {
            status,
            message: msg.into(),
        }
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create timeout error
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

// HTTP response conversion
impl DistillError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::Json(_) => 400,
            Self::Api { status, .. } if *status == 429 => 429,
            Self::Api { .. } => 502,
            Self::Llm(_) => 502,
            Self::Network(_) => 503,
            Self::Timeout(_) => 504,
            Self::NotConverged { .. } => 422,
            Self::Config(_) => 500,
            Self::Internal(_) => 500,
            Self::Io(_) => 500,
            Self::Other(_) => 500,
        }
    }
}
