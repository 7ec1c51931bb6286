use serde::{Deserialize, Serialize};

/// A single text completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model name (e.g., "gpt-3.5-turbo")
    pub model: String,

    /// Fully rendered prompt
    pub prompt: String,

    /// Sampling options
    pub options: CompletionOptions,
}

impl CompletionRequest {
    /// Create new request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, options: CompletionOptions) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            options,
        }
    }
}

/// Generation options
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CompletionOptions {
    /// Temperature (0.0 - 2.0)
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

/// OpenAI chat completion request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,

    pub messages: Vec<ChatMessage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl From<&CompletionRequest> for ChatCompletionRequest {
    fn from(request: &CompletionRequest) -> Self {
        Self {
            model: request.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(request.prompt.clone()),
            }],
            temperature: request.options.temperature,
            max_tokens: request.options.max_tokens,
        }
    }
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,

    #[serde(default)]
    pub content: Option<String>,
}

/// OpenAI chat completion response body
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if any
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|content| !content.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub index: u32,

    pub message: ChatMessage,

    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Summarization result with the path taken to reach it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryReport {
    /// Final summary text
    pub summary: String,

    /// Rounds of split/summarize/check performed
    pub rounds: u32,

    /// Chunk count of each round, in order
    pub chunks_per_round: Vec<usize>,

    /// Completion calls issued across all rounds
    pub completion_calls: usize,
}
