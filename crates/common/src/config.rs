use crate::error::DistillError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Distill application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the completion service
    #[serde(skip_serializing)]
    pub openai_api_key: String,

    /// Completion API base URL (OpenAI-compatible)
    pub openai_base_url: String,

    /// Model used for summarization
    pub llm_model: String,

    /// Model used for free-form questions
    pub ask_model: String,

    /// HTTP timeout for a single completion call (seconds)
    pub llm_timeout_secs: u64,

    /// Attempts per completion call, 1 means no retry
    pub llm_max_attempts: u32,

    /// Target chunk size in characters
    pub summary_chunk_size: usize,

    /// Overlap between adjacent chunks in characters
    pub summary_chunk_overlap: usize,

    /// Summaries longer than this are summarized again
    pub summary_length_threshold: usize,

    /// Hard cap on summarization rounds
    pub summary_max_rounds: u32,

    /// Output token budget per completion call
    pub summary_max_tokens: u32,

    /// Deadline for single-call HTTP requests such as /api/ask (seconds)
    pub request_timeout_secs: u64,

    /// Deadline for a whole multi-round /api/summarize run (seconds)
    pub summarize_timeout_secs: u64,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            llm_model: "gpt-3.5-turbo".to_string(),
            ask_model: "gpt-4".to_string(),
            llm_timeout_secs: 60,
            llm_max_attempts: 1,
            summary_chunk_size: 1000,
            summary_chunk_overlap: 200,
            summary_length_threshold: 4000,
            summary_max_rounds: 10,
            summary_max_tokens: 256,
            request_timeout_secs: 60,
            summarize_timeout_secs: 600,
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            log_dir: PathBuf::from("./log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, DistillError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let defaults = Self::default();
        let config = Self {
            openai_api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or(defaults.openai_base_url),
            llm_model: std::env::var("LLM_MODEL").unwrap_or(defaults.llm_model),
            ask_model: std::env::var("ASK_MODEL").unwrap_or(defaults.ask_model),
            llm_timeout_secs: Self::get_env_parsed("LLM_TIMEOUT_SECS")?
                .unwrap_or(defaults.llm_timeout_secs),
            llm_max_attempts: Self::get_env_parsed("LLM_MAX_ATTEMPTS")?
                .unwrap_or(defaults.llm_max_attempts),
            summary_chunk_size: Self::get_env_parsed("SUMMARY_CHUNK_SIZE")?
                .unwrap_or(defaults.summary_chunk_size),
            summary_chunk_overlap: Self::get_env_parsed("SUMMARY_CHUNK_OVERLAP")?
                .unwrap_or(defaults.summary_chunk_overlap),
            summary_length_threshold: Self::get_env_parsed("SUMMARY_LENGTH_THRESHOLD")?
                .unwrap_or(defaults.summary_length_threshold),
            summary_max_rounds: Self::get_env_parsed("SUMMARY_MAX_ROUNDS")?
                .unwrap_or(defaults.summary_max_rounds),
            summary_max_tokens: Self::get_env_parsed("SUMMARY_MAX_TOKENS")?
                .unwrap_or(defaults.summary_max_tokens),
            request_timeout_secs: Self::get_env_parsed("REQUEST_TIMEOUT_SECS")?
                .unwrap_or(defaults.request_timeout_secs),
            summarize_timeout_secs: Self::get_env_parsed("SUMMARIZE_TIMEOUT_SECS")?
                .unwrap_or(defaults.summarize_timeout_secs),
            server_host: std::env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: Self::get_env_parsed("SERVER_PORT")?.unwrap_or(defaults.server_port),
            log_dir: std::env::var("LOG_DIR")
                .ok()
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        };

        Ok(config)
    }

    /// Parse an optional environment variable, failing on garbage
    fn get_env_parsed<T: std::str::FromStr>(key: &str) -> Result<Option<T>, DistillError> {
        match std::env::var(key) {
            Ok(raw) => raw.trim().parse().map(Some).map_err(|_| {
                DistillError::config(format!("{} has an invalid value: {:?}", key, raw))
            }),
            Err(_) => Ok(None),
        }
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), DistillError> {
        if self.openai_api_key.trim().is_empty() {
            return Err(DistillError::config("OPENAI_API_KEY must be set"));
        }

        if !self.openai_base_url.starts_with("http://")
            && !self.openai_base_url.starts_with("https://")
        {
            return Err(DistillError::config(
                "Completion base URL must start with http:// or https://",
            ));
        }

        if self.server_port == 0 {
            return Err(DistillError::config("Server port cannot be 0"));
        }

        if self.summary_chunk_size == 0 {
            return Err(DistillError::config("Chunk size cannot be 0"));
        }

        if self.summary_chunk_overlap >= self.summary_chunk_size {
            return Err(DistillError::config(format!(
                "Chunk overlap ({}) must be smaller than chunk size ({})",
                self.summary_chunk_overlap, self.summary_chunk_size
            )));
        }

        if self.summary_length_threshold == 0 {
            return Err(DistillError::config("Summary length threshold cannot be 0"));
        }

        if self.summary_max_rounds == 0 {
            return Err(DistillError::config("Summary max rounds cannot be 0"));
        }

        if self.llm_max_attempts == 0 {
            return Err(DistillError::config("LLM max attempts cannot be 0"));
        }

        // A request deadline shorter than one completion call always expires first
        if self.request_timeout_secs < self.llm_timeout_secs {
            return Err(DistillError::config(format!(
                "Request timeout ({}s) must not be shorter than the LLM timeout ({}s)",
                self.request_timeout_secs, self.llm_timeout_secs
            )));
        }

        if self.summarize_timeout_secs < self.llm_timeout_secs {
            return Err(DistillError::config(format!(
                "Summarize timeout ({}s) must not be shorter than the LLM timeout ({}s)",
                self.summarize_timeout_secs, self.llm_timeout_secs
            )));
        }

        Ok(())
    }
}
