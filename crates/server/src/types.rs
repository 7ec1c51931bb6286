use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summarize request
#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    /// Document to summarize
    pub text: String,

    /// Question the summary should answer
    pub inquiry: String,
}

/// Summarize response
#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeResponse {
    /// Request identifier, also logged
    pub request_id: String,

    /// Final summary
    pub summary: String,

    /// Rounds it took to get under the length threshold
    pub rounds: u32,

    /// Completion calls issued
    pub completion_calls: usize,

    /// Finish time
    pub completed_at: DateTime<Utc>,
}

/// Free-form question
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub prompt: String,
}

/// Answer to a free-form question
#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub request_id: String,
    pub answer: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
}

/// Error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
